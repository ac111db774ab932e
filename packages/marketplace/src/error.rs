//! Error taxonomy for marketplace operations.
//!
//! Every variant renders as a message that can be shown to the user as-is.
//! Collaborator failures arrive as [`GatewayError`] and are translated with
//! [`translate_gateway_message`] before they reach a [`MarketError`].

use std::fmt;

use thiserror::Error;

use crate::common::translate_gateway_message;

/// Result type alias for marketplace operations.
pub type Result<T> = std::result::Result<T, MarketError>;

/// Result type alias for collaborator (gateway / store) calls.
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Form fields that may be reported as missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    Title,
    Description,
    Category,
    Phone,
    Code,
    Name,
    Email,
    Password,
    Company,
    Price,
    Contact,
}

impl RequiredField {
    pub fn label(&self) -> &'static str {
        match self {
            RequiredField::Title => "Название",
            RequiredField::Description => "Описание",
            RequiredField::Category => "Категория",
            RequiredField::Phone => "Номер телефона",
            RequiredField::Code => "Код из SMS",
            RequiredField::Name => "Имя",
            RequiredField::Email => "Email",
            RequiredField::Password => "Пароль",
            RequiredField::Company => "Компания/Имя",
            RequiredField::Price => "Цена",
            RequiredField::Contact => "Контакт",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Local input problems. Never produced after a network call was made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Пожалуйста, заполните: {}", join_labels(.0))]
    MissingFields(Vec<RequiredField>),

    #[error("Неизвестная категория: {0}")]
    UnknownCategory(String),

    #[error("Максимум {max} изображений (выбрано {count})")]
    TooManyImages { count: usize, max: usize },

    #[error("Файл не является изображением: {0}")]
    NotAnImage(String),

    #[error("Изображение слишком большое: {size} байт (максимум {max_bytes})")]
    ImageTooLarge { size: usize, max_bytes: usize },
}

impl ValidationError {
    /// Missing fields in form order; empty for the other variants.
    pub fn missing_fields(&self) -> &[RequiredField] {
        match self {
            ValidationError::MissingFields(fields) => fields,
            _ => &[],
        }
    }
}

fn join_labels(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(RequiredField::label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Failure reported by an external collaborator (auth gateway or a table).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The service answered and said no.
    #[error("{message}")]
    Rejected { status: Option<u16>, message: String },

    #[error("network error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn rejected(message: impl Into<String>) -> Self {
        GatewayError::Rejected {
            status: None,
            message: message.into(),
        }
    }

    /// User-facing translation of this failure.
    pub fn translated(&self) -> String {
        translate_gateway_message(&self.to_string())
    }
}

impl From<supabase::SupabaseError> for GatewayError {
    fn from(err: supabase::SupabaseError) -> Self {
        match err {
            supabase::SupabaseError::Api { status, message } => GatewayError::Rejected {
                status: Some(status),
                message,
            },
            supabase::SupabaseError::Http(e) => GatewayError::Transport(e.to_string()),
            supabase::SupabaseError::Decode(e) => GatewayError::Decode(e.to_string()),
            supabase::SupabaseError::Url(e) => GatewayError::Transport(e.to_string()),
        }
    }
}

/// Errors surfaced by marketplace operations.
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The identity gateway refused to send a code.
    #[error("Ошибка отправки SMS: {reason}")]
    CodeSend { reason: String },

    /// Code mismatch or expiry.
    #[error("Неверный код. Проверьте правильность введенного кода")]
    InvalidCode,

    /// Verification succeeded but the gateway no longer reports a user.
    #[error("Ошибка авторизации: пользователь не авторизован")]
    AuthState,

    #[error("Не удалось создать {resource}: {reason}")]
    ResourceCreation {
        resource: &'static str,
        reason: String,
    },

    #[error("Вы уже отправили предложение на этот запрос")]
    DuplicateOffer,

    #[error("Требуется авторизация")]
    AuthenticationRequired,

    #[error("Доступ запрещен: {0}")]
    PermissionDenied(&'static str),

    #[error("{0}: не найдено")]
    NotFound(&'static str),

    /// The operation does not apply to the flow's current state.
    #[error("Операция недоступна: {0}")]
    InvalidState(&'static str),

    /// Any other collaborator failure, already translated.
    #[error("{action}: {reason}")]
    Gateway {
        action: &'static str,
        reason: String,
    },
}

impl MarketError {
    pub fn gateway(action: &'static str, err: &GatewayError) -> Self {
        MarketError::Gateway {
            action,
            reason: err.translated(),
        }
    }

    /// A code check the gateway answered and refused is an invalid code;
    /// anything else is a failed check the user can retry as is.
    pub fn code_check(err: &GatewayError) -> Self {
        match err {
            GatewayError::Rejected { .. } => MarketError::InvalidCode,
            GatewayError::Transport(_) | GatewayError::Decode(_) => {
                MarketError::gateway("Ошибка проверки кода", err)
            }
        }
    }

    pub fn missing(fields: Vec<RequiredField>) -> Self {
        MarketError::Validation(ValidationError::MissingFields(fields))
    }
}
