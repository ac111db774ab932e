use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

/// A credential (anon key, access token) that never shows up in logs or
/// `Debug` output.
pub struct SecretToken(SecretBox<str>);

impl SecretToken {
    pub fn new(value: impl Into<String>) -> Self {
        let value: String = value.into();
        Self(SecretBox::new(value.into_boxed_str()))
    }

    /// Only call this where the raw value is actually sent somewhere.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for SecretToken {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretToken {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
