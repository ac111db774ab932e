//! Register a new account and publish a request in one go

use tracing::{info, warn};

use crate::domains::auth::models::{AuthContext, Registration, User};
use crate::domains::profiles::actions::ProfileWrite;
use crate::domains::profiles::models::Profile;
use crate::domains::requests::actions::insert_request;
use crate::domains::requests::models::{Request, RequestDetails};
use crate::error::{MarketError, Result, ValidationError};
use crate::kernel::MarketDeps;

#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    pub user: User,
    pub request: Request,
    pub profile: ProfileWrite,
}

/// Sign up, create the profile (best effort) and insert the request.
///
/// Registration fields are reported before request fields when blank. If the
/// project requires e-mail confirmation sign-up yields no session; a password
/// sign-in is attempted so the request can still be owned by the new user.
pub async fn register_and_publish(
    registration: &Registration,
    details: &RequestDetails,
    auth: &mut AuthContext,
    deps: &MarketDeps,
) -> Result<RegistrationOutcome> {
    let mut missing = registration.missing_fields();
    missing.extend(details.missing_fields());
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing).into());
    }
    details.validate()?;

    let email = registration.sign_up_email();
    let phone = registration.phone.trim();

    let signed_up = deps
        .identity
        .sign_up(&email, &registration.password)
        .await
        .map_err(|e| {
            warn!("Sign-up failed for {}: {}", email, e);
            MarketError::gateway("Ошибка регистрации", &e)
        })?;

    let session = match signed_up.session {
        Some(session) => session,
        None => deps
            .identity
            .sign_in_with_password(&email, &registration.password)
            .await
            .map_err(|e| {
                warn!("Sign-in after sign-up failed for {}: {}", email, e);
                MarketError::gateway("Ошибка регистрации", &e)
            })?,
    };

    let user = session.user.clone();
    auth.sign_in(session);
    info!("Registered {} as {}", email, user.id);

    let mut profile = Profile::placeholder(user.id, phone, details.city().as_deref());
    profile.name = registration.name.trim().to_string();
    profile.email = registration.contact_email();
    let profile = match deps.profiles.insert(&profile).await {
        Ok(profile) => ProfileWrite::Created(profile),
        Err(e) => {
            warn!("Profile insert failed for {}: {}", user.id, e);
            ProfileWrite::Failed(e)
        }
    };

    let request = insert_request(details, user.id, deps).await?;

    Ok(RegistrationOutcome {
        user,
        request,
        profile,
    })
}
