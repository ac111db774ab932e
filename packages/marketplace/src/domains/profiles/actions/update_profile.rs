//! Save the settings form

use tracing::{info, warn};

use crate::common::non_blank;
use crate::domains::auth::models::AuthContext;
use crate::domains::profiles::models::{Profile, ProfileForm};
use crate::error::{MarketError, Result};
use crate::kernel::MarketDeps;

/// Write the form to the profile row, then move the auth e-mail if the form
/// changed it. The profile write is kept even when the e-mail update fails.
pub async fn update_profile(
    form: &ProfileForm,
    auth: &mut AuthContext,
    deps: &MarketDeps,
) -> Result<Profile> {
    let user = auth.require_user()?.clone();
    let update = form.to_update();

    let existing = deps
        .profiles
        .get(user.id)
        .await
        .map_err(|e| MarketError::gateway("Не удалось обновить профиль", &e))?;

    let profile = match existing {
        Some(_) => deps.profiles.update(user.id, &update).await,
        None => {
            let mut profile = Profile::placeholder(user.id, &form.phone, None);
            update.apply(&mut profile);
            deps.profiles.insert(&profile).await
        }
    }
    .map_err(|e| MarketError::gateway("Не удалось обновить профиль", &e))?;

    info!("Profile updated for {}", user.id);

    let changed_email = non_blank(&form.email).filter(|email| Some(email) != user.email.as_ref());
    if let Some(email) = changed_email {
        match deps.identity.update_email(&email).await {
            Ok(updated) => auth.refresh_user(updated),
            Err(e) => {
                warn!("Auth email update failed for {}: {}", user.id, e);
                return Err(MarketError::gateway("Не удалось обновить email", &e));
            }
        }
    }

    Ok(profile)
}
