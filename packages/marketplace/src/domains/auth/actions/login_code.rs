//! Plain sign-in by SMS code

use tracing::{info, warn};

use crate::common::{is_blank, non_blank};
use crate::domains::auth::models::{AuthContext, User};
use crate::domains::profiles::actions::{ensure_profile, ProfileWrite};
use crate::error::{MarketError, RequiredField, Result};
use crate::kernel::MarketDeps;

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub profile: ProfileWrite,
}

impl LoginOutcome {
    /// Greeting with the profile name when there is one.
    pub fn welcome_message(&self) -> String {
        match self.profile.profile().and_then(|p| non_blank(&p.name)) {
            Some(name) => format!("Добро пожаловать, {}", name),
            None => "Добро пожаловать".to_string(),
        }
    }
}

pub async fn send_login_code(phone: &str, deps: &MarketDeps) -> Result<()> {
    if is_blank(phone) {
        return Err(MarketError::missing(vec![RequiredField::Phone]));
    }
    let phone = phone.trim();

    deps.identity
        .send_verification_code(phone)
        .await
        .map_err(|e| {
            warn!("Login code send failed for {}: {}", phone, e);
            MarketError::CodeSend {
                reason: e.translated(),
            }
        })?;

    info!("Login code sent to {}", phone);
    Ok(())
}

/// Verify a login code and sign in. A profile is created on first login;
/// a failed profile write does not fail the login.
pub async fn verify_login_code(
    phone: &str,
    code: &str,
    auth: &mut AuthContext,
    deps: &MarketDeps,
) -> Result<LoginOutcome> {
    let mut missing = Vec::new();
    if is_blank(phone) {
        missing.push(RequiredField::Phone);
    }
    if is_blank(code) {
        missing.push(RequiredField::Code);
    }
    if !missing.is_empty() {
        return Err(MarketError::missing(missing));
    }
    let phone = phone.trim();

    let session = deps
        .identity
        .verify_code(phone, code.trim())
        .await
        .map_err(|e| {
            warn!("Login code rejected for {}: {}", phone, e);
            MarketError::code_check(&e)
        })?;

    let user = session.user.clone();
    auth.sign_in(session);
    info!("Signed in {} by phone", user.id);

    let profile = ensure_profile(&user, phone, None, deps).await;
    Ok(LoginOutcome { user, profile })
}
