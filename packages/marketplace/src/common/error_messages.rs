//! Gateway error text → user-facing Russian phrase.
//!
//! The BaaS reports failures as free English text. Known fragments are
//! matched case-insensitively, first rule wins; anything unrecognised is
//! returned untouched so the user still sees *something* actionable.

/// Each rule fires when the message contains every fragment in the list.
const RULES: &[(&[&str], &str)] = &[
    // Password
    (
        &["password should be at least"],
        "Пароль должен содержать минимум 6 символов",
    ),
    (&["password", "weak"], "Пароль слишком слабый"),
    // Email
    (&["invalid email"], "Некорректный email адрес"),
    (&["invalid", "email"], "Некорректный email адрес"),
    (
        &["already registered"],
        "Пользователь с таким email уже зарегистрирован",
    ),
    (
        &["already exists"],
        "Пользователь с таким email уже зарегистрирован",
    ),
    (
        &["email not confirmed"],
        "Email не подтвержден. Проверьте почту и подтвердите регистрацию",
    ),
    (
        &["email rate limit"],
        "Слишком много попыток. Попробуйте позже",
    ),
    // Sign-in
    (&["invalid credentials"], "Неверный email или пароль"),
    (&["invalid login"], "Неверный email или пароль"),
    (&["email not found"], "Пользователь с таким email не найден"),
    (&["user not found"], "Пользователь не найден"),
    (&["signups disabled"], "Регистрация временно отключена"),
    // SMS / phone
    (&["phone provider"], "SMS временно недоступен"),
    (&["sms"], "SMS временно недоступен"),
    (&["invalid phone"], "Некорректный номер телефона"),
    // Transport and generic HTTP
    (
        &["network"],
        "Ошибка подключения. Проверьте интернет соединение",
    ),
    (
        &["timeout"],
        "Ошибка подключения. Проверьте интернет соединение",
    ),
    (&["rate limit"], "Слишком много попыток. Подождите немного"),
    (&["400"], "Ошибка валидации данных"),
    (&["401"], "Необходима авторизация"),
    (&["unauthorized"], "Необходима авторизация"),
    (&["403"], "Доступ запрещен"),
    (&["forbidden"], "Доступ запрещен"),
    (&["404"], "Ресурс не найден"),
    (&["not found"], "Ресурс не найден"),
    (&["500"], "Ошибка сервера. Попробуйте позже"),
    (&["server"], "Ошибка сервера. Попробуйте позже"),
];

pub fn translate_gateway_message(message: &str) -> String {
    let lower = message.to_lowercase();

    RULES
        .iter()
        .find(|(fragments, _)| fragments.iter().all(|f| lower.contains(f)))
        .map(|(_, phrase)| (*phrase).to_string())
        .unwrap_or_else(|| message.to_string())
}
