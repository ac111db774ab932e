use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

use supabase::SupabaseOptions;

use crate::common::SecretToken;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_anon_key: SecretToken,
    pub http_timeout: Duration,
    pub resend_cooldown: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            supabase_url: env::var("SUPABASE_URL").context("SUPABASE_URL must be set")?,
            supabase_anon_key: env::var("SUPABASE_ANON_KEY")
                .context("SUPABASE_ANON_KEY must be set")?
                .into(),
            http_timeout: Duration::from_secs(
                env::var("HTTP_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "15".to_string())
                    .parse()
                    .context("HTTP_TIMEOUT_SECS must be a valid number")?,
            ),
            resend_cooldown: Duration::from_secs(
                env::var("OTP_RESEND_COOLDOWN_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()
                    .context("OTP_RESEND_COOLDOWN_SECS must be a valid number")?,
            ),
        })
    }

    pub fn supabase_options(&self) -> SupabaseOptions {
        SupabaseOptions {
            url: self.supabase_url.clone(),
            anon_key: self.supabase_anon_key.expose().to_string(),
            timeout: self.http_timeout,
        }
    }
}
