//! Best-effort profile upsert after a successful phone verification

use tracing::{debug, info, warn};

use crate::common::non_blank;
use crate::domains::auth::models::User;
use crate::domains::profiles::models::{Profile, ProfileUpdate};
use crate::error::GatewayError;
use crate::kernel::MarketDeps;

/// What happened to the profile. A failure is reported here instead of
/// aborting the surrounding flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileWrite {
    /// No profile existed; a placeholder was inserted.
    Created(Profile),
    /// The profile existed and its city was overwritten from the form.
    CityUpdated(Profile),
    /// The profile existed and the form had no city.
    Unchanged(Profile),
    Failed(GatewayError),
}

impl ProfileWrite {
    pub fn is_failed(&self) -> bool {
        matches!(self, ProfileWrite::Failed(_))
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            ProfileWrite::Created(p)
            | ProfileWrite::CityUpdated(p)
            | ProfileWrite::Unchanged(p) => Some(p),
            ProfileWrite::Failed(_) => None,
        }
    }
}

/// Make sure `user` has a profile.
///
/// Missing profile: insert `{placeholder name, phone, city}`. Existing
/// profile and a non-blank city: update the city only. Never errors.
pub async fn ensure_profile(
    user: &User,
    phone: &str,
    city: Option<&str>,
    deps: &MarketDeps,
) -> ProfileWrite {
    let city = city.and_then(non_blank);

    let existing = match deps.profiles.get(user.id).await {
        Ok(existing) => existing,
        Err(e) => {
            warn!("Profile lookup failed for {}: {}", user.id, e);
            return ProfileWrite::Failed(e);
        }
    };

    match (existing, city) {
        (None, city) => {
            let profile = Profile::placeholder(user.id, phone, city.as_deref());
            match deps.profiles.insert(&profile).await {
                Ok(profile) => {
                    info!("Created profile for {}", user.id);
                    ProfileWrite::Created(profile)
                }
                Err(e) => {
                    warn!("Profile insert failed for {}: {}", user.id, e);
                    ProfileWrite::Failed(e)
                }
            }
        }
        (Some(_), Some(city)) => {
            let update = ProfileUpdate::city(city);
            match deps.profiles.update(user.id, &update).await {
                Ok(profile) => {
                    debug!("Updated city for {}", user.id);
                    ProfileWrite::CityUpdated(profile)
                }
                Err(e) => {
                    warn!("Profile city update failed for {}: {}", user.id, e);
                    ProfileWrite::Failed(e)
                }
            }
        }
        (Some(profile), None) => ProfileWrite::Unchanged(profile),
    }
}
