use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use console::Term;
use dialoguer::{theme::ColorfulTheme, Select};
use marketplace_core::kernel::{MarketDeps, TestDependencies, DEMO_CODE};
use marketplace_core::Config;
use supabase::SupabaseService;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod demo;

use app::App;

/// Terminal client for the NeedHub reverse marketplace
#[derive(Parser, Debug)]
#[command(name = "market", version)]
struct Args {
    /// Run against in-memory collaborators instead of Supabase
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging (stderr, so prompts stay readable)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,marketplace_core=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let term = Term::stdout();
    print_banner(&term)?;

    let deps = if args.demo {
        println!(
            "{}",
            format!("Демо-режим: подходит код {}", DEMO_CODE).bright_yellow()
        );
        let mocks = TestDependencies::new();
        demo::seed(&mocks);
        mocks.deps()
    } else {
        let config = Config::from_env()?;
        let service = SupabaseService::new(config.supabase_options())
            .context("Failed to create Supabase client")?;
        tracing::info!("Using Supabase at {}", service.base_url());
        MarketDeps::from_supabase(Arc::new(service))
            .with_resend_cooldown(config.resend_cooldown)
    };

    let mut app = App::new(deps, term.clone());

    loop {
        println!();
        let signed_in = app.is_signed_in();
        let options = vec![
            "📋 Лента запросов",
            "🔍 Открыть запрос",
            "➕ Создать запрос",
            if signed_in { "👤 Мой профиль" } else { "📱 Войти по SMS" },
            if signed_in { "🚪 Выйти из аккаунта" } else { "✉️  Войти по email" },
            "🛑 Выход",
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Что будем делать?")
            .items(&options)
            .default(0)
            .interact_on(&term)?;

        match (selection, signed_in) {
            (0, _) => app.browse().await?,
            (1, _) => app.open_request().await?,
            (2, _) => app.create_request().await?,
            (3, true) => app.profile().await?,
            (3, false) => app.sign_in_by_sms().await?,
            (4, true) => app.sign_out().await,
            (4, false) => app.sign_in_by_email().await?,
            _ => {
                println!("{}", "👋 До встречи!".bright_blue());
                break;
            }
        }
    }

    Ok(())
}

fn print_banner(term: &Term) -> Result<()> {
    term.clear_screen()?;
    println!(
        "{}",
        "╔════════════════════════════════════════╗".bright_cyan()
    );
    println!(
        "{}",
        "║     NeedHub: обратный маркетплейс      ║".bright_cyan()
    );
    println!(
        "{}",
        "╚════════════════════════════════════════╝".bright_cyan()
    );
    println!();
    Ok(())
}
