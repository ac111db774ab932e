//! Interactive screens. Each screen maps to one or two marketplace actions.

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use console::Term;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};
use marketplace_core::common::{time_ago, RequestId};
use marketplace_core::domains::auth::actions::{
    send_login_code, sign_in_with_password, sign_out, verify_login_code,
};
use marketplace_core::domains::auth::models::AuthContext;
use marketplace_core::domains::catalog::{Category, ALL_CATEGORIES, CITIES};
use marketplace_core::domains::favorites::actions::toggle_favorite;
use marketplace_core::domains::offers::actions::{delete_offer, submit_offer};
use marketplace_core::domains::offers::models::OfferForm;
use marketplace_core::domains::profiles::actions::{load_dashboard, update_profile};
use marketplace_core::domains::requests::actions::{
    browse_requests, delete_request, load_request_detail,
};
use marketplace_core::domains::requests::models::{
    attach_images, mime_for_file, ImageAttachment, Request, RequestDetails, RequestFilter,
    MAX_IMAGES,
};
use marketplace_core::domains::verification::{FlowPhase, ResendOutcome, VerificationFlow};
use marketplace_core::kernel::MarketDeps;
use marketplace_core::MarketError;

pub struct App {
    deps: MarketDeps,
    auth: AuthContext,
    term: Term,
    theme: ColorfulTheme,
}

fn report(err: &MarketError) {
    failure(&err.to_string());
}

fn failure(message: &str) {
    println!("{} {}", "✗".bright_red().bold(), message.bright_red());
}

fn success(message: &str) {
    println!("{} {}", "✓".bright_green().bold(), message.bright_green());
}

fn print_request_line(request: &Request) {
    let city = request.city.as_deref().unwrap_or("Россия, все города");
    println!(
        "  {} {} · {} · {}",
        "•".bright_cyan(),
        request.title.bold(),
        request.category.label().bright_black(),
        format!("{}, {}", city, time_ago(request.created_at, Utc::now())).bright_black()
    );
}

impl App {
    pub fn new(deps: MarketDeps, term: Term) -> Self {
        Self {
            deps,
            auth: AuthContext::anonymous(),
            term,
            theme: ColorfulTheme::default(),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.auth.is_authenticated()
    }

    fn input(&self, prompt: &str, initial: &str) -> Result<String> {
        Ok(Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text_on(&self.term)?)
    }

    fn select(&self, prompt: &str, items: &[&str]) -> Result<usize> {
        Ok(Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_on(&self.term)?)
    }

    // ---------------------------------------------------------------------
    // Feed
    // ---------------------------------------------------------------------

    fn read_filter(&self) -> Result<RequestFilter> {
        let mut categories = vec![ALL_CATEGORIES];
        categories.extend(Category::ALL.iter().map(|c| c.label()));
        let category = categories[self.select("Категория", &categories)?];
        let city = CITIES[self.select("Город", CITIES)?];
        let search = self.input("Поиск (можно пропустить)", "")?;
        Ok(RequestFilter::from_labels(category, city, &search))
    }

    pub async fn browse(&mut self) -> Result<()> {
        let filter = self.read_filter()?;
        match browse_requests(&filter, &self.deps).await {
            Ok(requests) if requests.is_empty() => println!("{}", "Запросов не найдено".yellow()),
            Ok(requests) => requests.iter().for_each(print_request_line),
            Err(e) => report(&e),
        }
        Ok(())
    }

    pub async fn open_request(&mut self) -> Result<()> {
        let requests = match browse_requests(&RequestFilter::default(), &self.deps).await {
            Ok(requests) => requests,
            Err(e) => {
                report(&e);
                return Ok(());
            }
        };
        if requests.is_empty() {
            println!("{}", "Запросов пока нет".yellow());
            return Ok(());
        }

        let titles: Vec<&str> = requests.iter().map(|r| r.title.as_str()).collect();
        let picked = &requests[self.select("Запрос", &titles)?];
        self.request_screen(picked.id).await
    }

    async fn request_screen(&mut self, request_id: RequestId) -> Result<()> {
        loop {
            let detail = match load_request_detail(request_id, &self.auth, &self.deps).await {
                Ok(detail) => detail,
                Err(e) => {
                    report(&e);
                    return Ok(());
                }
            };
            let request = &detail.request;

            println!();
            println!("{}", request.title.bright_white().bold());
            println!("{}", request.description);
            println!(
                "{} {}",
                "Категория:".bright_black(),
                request.category.label()
            );
            if let Some(budget) = &request.budget {
                println!("{} {}", "Бюджет:".bright_black(), budget);
            }
            if let Some(deadline) = &request.deadline {
                println!("{} {}", "Срок:".bright_black(), deadline);
            }
            println!("{} {}", "Предложений:".bright_black(), detail.offers.len());
            for offer in &detail.offers {
                println!(
                    "  {} {} · {} · {}",
                    "₽".bright_green(),
                    offer.company.bold(),
                    offer.price,
                    offer.contact.bright_black()
                );
            }

            let mut actions = Vec::new();
            if self.auth.is_authenticated() && !detail.is_owner {
                actions.push(if detail.is_favorite {
                    "💔 Убрать из избранного"
                } else {
                    "⭐ В избранное"
                });
                actions.push(match detail.my_offer(&self.auth) {
                    Some(_) => "🗑  Отозвать предложение",
                    None => "💬 Сделать предложение",
                });
            }
            if detail.is_owner {
                actions.push("🗑  Удалить запрос");
            }
            actions.push("↩️  Назад");

            let choice = actions[self.select("Действие", &actions)?];
            match choice {
                "⭐ В избранное" | "💔 Убрать из избранного" => {
                    match toggle_favorite(request, &self.auth, &self.deps).await {
                        Ok(outcome) => success(outcome.message()),
                        Err(e) => report(&e),
                    }
                }
                "💬 Сделать предложение" => {
                    let form = self.read_offer_form().await?;
                    match submit_offer(request, &detail.offers, &form, &self.auth, &self.deps)
                        .await
                    {
                        Ok(_) => success("Ваше предложение отправлено"),
                        Err(e) => report(&e),
                    }
                }
                "🗑  Отозвать предложение" => {
                    if let Some(offer) = detail.my_offer(&self.auth) {
                        match delete_offer(offer.id, &self.auth, &self.deps).await {
                            Ok(()) => success("Предложение удалено"),
                            Err(e) => report(&e),
                        }
                    }
                }
                "🗑  Удалить запрос" => {
                    let confirmed = Confirm::with_theme(&self.theme)
                        .with_prompt("Удалить запрос? Это действие нельзя отменить")
                        .default(false)
                        .interact_on(&self.term)?;
                    if confirmed {
                        match delete_request(request.id, &self.auth, &self.deps).await {
                            Ok(()) => {
                                success("Запрос удален");
                                return Ok(());
                            }
                            Err(e) => report(&e),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    async fn read_offer_form(&self) -> Result<OfferForm> {
        let profile = match self.auth.user_id() {
            Some(user_id) => self.deps.profiles.get(user_id).await.ok().flatten(),
            None => None,
        };
        let prefill = OfferForm::prefilled(profile.as_ref());

        Ok(OfferForm {
            company: self.input("Компания/Имя", &prefill.company)?,
            price: self.input("Цена", &prefill.price)?,
            description: self.input("Описание предложения", &prefill.description)?,
            contact: self.input("Контакт", &prefill.contact)?,
        })
    }

    // ---------------------------------------------------------------------
    // Create request
    // ---------------------------------------------------------------------

    async fn read_details(&self, initial: &RequestDetails) -> Result<RequestDetails> {
        let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        let category = labels[self.select("Категория", &labels)?];

        let details = RequestDetails::new(
            self.input("Что ищете?", &initial.title)?,
            self.input("Описание", &initial.description)?,
            category,
        )
        .with_budget(self.input("Бюджет", &initial.budget)?)
        .with_city(self.input("Город", &initial.city)?)
        .with_deadline(self.input("Срок", &initial.deadline)?);

        let images = self.read_images(&initial.images).await?;
        Ok(details.with_images(images))
    }

    /// Comma-separated file paths. An empty answer keeps `attached`.
    async fn read_images(&self, attached: &[String]) -> Result<Vec<String>> {
        let prompt = if attached.is_empty() {
            format!(
                "Фото: пути к файлам через запятую, до {} (можно пропустить)",
                MAX_IMAGES
            )
        } else {
            format!(
                "Фото: новые пути через запятую (Enter оставит {} шт.)",
                attached.len()
            )
        };

        'prompt: loop {
            let line = self.input(&prompt, "")?;
            if line.trim().is_empty() {
                return Ok(attached.to_vec());
            }

            let mut batch = Vec::new();
            for path in line.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                let bytes = match tokio::fs::read(path).await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        failure(&format!("Не удалось прочитать {}: {}", path, e));
                        continue 'prompt;
                    }
                };
                match ImageAttachment::from_bytes(mime_for_file(path), &bytes) {
                    Ok(image) => batch.push(image),
                    Err(e) => {
                        report(&e.into());
                        continue 'prompt;
                    }
                }
            }

            let mut images = Vec::new();
            match attach_images(&mut images, batch) {
                Ok(()) => {
                    success(&format!("Прикреплено фото: {}", images.len()));
                    return Ok(images);
                }
                Err(e) => report(&e.into()),
            }
        }
    }

    pub async fn create_request(&mut self) -> Result<()> {
        let mut details = self.read_details(&RequestDetails::default()).await?;
        let mut flow = VerificationFlow::new(self.deps.clone());

        if self.auth.is_authenticated() {
            match flow.publish_signed_in(&details, &self.auth).await {
                Ok(_) => success("Запрос опубликован"),
                Err(e) => report(&e),
            }
            return Ok(());
        }

        loop {
            match flow.phase() {
                FlowPhase::CollectingDetails => {
                    let phone = self.input("Телефон", "+7")?;
                    if let Err(e) = flow.request_code(details.clone(), &phone).await {
                        report(&e);
                        if !matches!(e, MarketError::CodeSend { .. }) {
                            details = self.read_details(&details).await?;
                        }
                        continue;
                    }
                    success("Код подтверждения отправлен на ваш номер");
                }
                FlowPhase::AwaitingCode => {
                    let resend_label = match flow.countdown_remaining() {
                        0 => "🔁 Отправить код повторно".to_string(),
                        secs => format!("🔁 Отправить повторно через {} сек.", secs),
                    };
                    let options = [
                        "🔑 Ввести код",
                        resend_label.as_str(),
                        "📱 Изменить номер",
                        "↩️  Отмена",
                    ];
                    match self.select("Подтверждение", &options)? {
                        0 => {
                            let code = self.input("Код из SMS", "")?;
                            match flow.verify_code_and_create(&code, &mut self.auth).await {
                                Ok(outcome) => {
                                    if outcome.profile.is_failed() {
                                        println!(
                                            "{}",
                                            "Профиль не сохранён, его можно заполнить позже"
                                                .yellow()
                                        );
                                    }
                                    success("Ваш запрос опубликован");
                                }
                                Err(e) => report(&e),
                            }
                        }
                        1 => match flow.resend().await {
                            Ok(ResendOutcome::Sent) => success("Код отправлен повторно"),
                            Ok(ResendOutcome::Throttled { remaining_secs }) => println!(
                                "{}",
                                format!("Подождите ещё {} сек.", remaining_secs).yellow()
                            ),
                            Err(e) => report(&e),
                        },
                        2 => {
                            if let Some(previous) = flow.change_number() {
                                details = previous;
                            }
                        }
                        _ => return Ok(()),
                    }
                }
                FlowPhase::Verified => return Ok(()),
            }
        }
    }

    // ---------------------------------------------------------------------
    // Auth
    // ---------------------------------------------------------------------

    pub async fn sign_in_by_sms(&mut self) -> Result<()> {
        let phone = self.input("Телефон", "+7")?;
        if let Err(e) = send_login_code(&phone, &self.deps).await {
            report(&e);
            return Ok(());
        }
        success("Код подтверждения отправлен на ваш номер");

        let code = self.input("Код из SMS", "")?;
        match verify_login_code(&phone, &code, &mut self.auth, &self.deps).await {
            Ok(outcome) => success(&outcome.welcome_message()),
            Err(e) => report(&e),
        }
        Ok(())
    }

    pub async fn sign_in_by_email(&mut self) -> Result<()> {
        let email = self.input("Email", "")?;
        let password = Password::with_theme(&self.theme)
            .with_prompt("Пароль")
            .allow_empty_password(true)
            .interact_on(&self.term)?;

        match sign_in_with_password(&email, &password, &mut self.auth, &self.deps).await {
            Ok(_) => success("Добро пожаловать"),
            Err(e) => report(&e),
        }
        Ok(())
    }

    pub async fn sign_out(&mut self) {
        if sign_out(&mut self.auth, &self.deps).await {
            success("Вы вышли из аккаунта");
        } else {
            println!("{}", "Сессия завершена локально".yellow());
        }
    }

    // ---------------------------------------------------------------------
    // Profile
    // ---------------------------------------------------------------------

    pub async fn profile(&mut self) -> Result<()> {
        let dashboard = match load_dashboard(&self.auth, &self.deps).await {
            Ok(dashboard) => dashboard,
            Err(e) => {
                report(&e);
                return Ok(());
            }
        };

        let form = &dashboard.form;
        println!();
        println!("{} {}", "Имя:".bright_black(), form.name);
        println!("{} {}", "Телефон:".bright_black(), form.phone);
        println!("{} {}", "Email:".bright_black(), form.email);
        println!("{} {}", "Город:".bright_black(), form.city);

        println!("{}", "Мои запросы".bold());
        dashboard.requests.iter().for_each(print_request_line);
        println!("{}", "Мои предложения".bold());
        for mine in &dashboard.offers {
            println!(
                "  {} {} · {}",
                "•".bright_cyan(),
                mine.request_title.as_deref().unwrap_or("запрос удалён"),
                mine.offer.price
            );
        }
        println!("{}", "Избранное".bold());
        dashboard.favorites.iter().for_each(print_request_line);

        let edit = Confirm::with_theme(&self.theme)
            .with_prompt("Изменить профиль?")
            .default(false)
            .interact_on(&self.term)?;
        if !edit {
            return Ok(());
        }

        let mut updated = form.clone();
        updated.name = self.input("Имя", &form.name)?;
        updated.phone = self.input("Телефон", &form.phone)?;
        updated.email = self.input("Email", &form.email)?;
        updated.city = self.input("Город", &form.city)?;

        match update_profile(&updated, &mut self.auth, &self.deps).await {
            Ok(_) => success("Профиль обновлен"),
            Err(e) => report(&e),
        }
        Ok(())
    }
}
