use crate::common::{is_blank, non_blank};
use crate::error::RequiredField;

/// Sign-up form used when a request is published together with a new
/// account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub phone: String,
    /// Optional; a placeholder address is derived from the phone when blank.
    pub email: String,
    pub password: String,
}

impl Registration {
    pub fn missing_fields(&self) -> Vec<RequiredField> {
        [
            (RequiredField::Name, &self.name),
            (RequiredField::Phone, &self.phone),
            (RequiredField::Password, &self.password),
        ]
        .into_iter()
        .filter(|(_, value)| is_blank(value))
        .map(|(field, _)| field)
        .collect()
    }

    /// E-mail to register with: the typed one, or `{phone}@temp.local`.
    pub fn sign_up_email(&self) -> String {
        non_blank(&self.email)
            .unwrap_or_else(|| format!("{}@temp.local", self.phone.trim()))
    }

    /// E-mail to store on the profile; the placeholder address is not one.
    pub fn contact_email(&self) -> Option<String> {
        non_blank(&self.email)
    }
}
