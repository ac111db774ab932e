//! E-mail/password and OAuth sign-in

use tracing::{info, warn};

use crate::common::is_blank;
use crate::domains::auth::models::{AuthContext, User};
use crate::error::{MarketError, RequiredField, Result};
use crate::kernel::MarketDeps;

pub async fn sign_in_with_password(
    email: &str,
    password: &str,
    auth: &mut AuthContext,
    deps: &MarketDeps,
) -> Result<User> {
    let mut missing = Vec::new();
    if is_blank(email) {
        missing.push(RequiredField::Email);
    }
    if password.is_empty() {
        missing.push(RequiredField::Password);
    }
    if !missing.is_empty() {
        return Err(MarketError::missing(missing));
    }

    let session = deps
        .identity
        .sign_in_with_password(email.trim(), password)
        .await
        .map_err(|e| {
            warn!("Password sign-in failed for {}: {}", email.trim(), e);
            MarketError::gateway("Ошибка входа", &e)
        })?;

    let user = session.user.clone();
    auth.sign_in(session);
    info!("Signed in {} with password", user.id);
    Ok(user)
}

/// Finish an OAuth redirect: exchange `code` (with its PKCE `verifier`) for
/// a session.
pub async fn exchange_oauth_code(
    code: &str,
    verifier: &str,
    auth: &mut AuthContext,
    deps: &MarketDeps,
) -> Result<User> {
    if is_blank(code) {
        return Err(MarketError::missing(vec![RequiredField::Code]));
    }

    let session = deps
        .identity
        .exchange_oauth_code(code.trim(), verifier)
        .await
        .map_err(|e| {
            warn!("OAuth code exchange failed: {}", e);
            MarketError::gateway("Ошибка авторизации", &e)
        })?;

    let user = session.user.clone();
    auth.sign_in(session);
    info!("Signed in {} via OAuth", user.id);
    Ok(user)
}
