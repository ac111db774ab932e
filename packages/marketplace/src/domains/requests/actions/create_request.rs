//! Publish a request for the signed-in user

use tracing::{error, info};

use crate::common::UserId;
use crate::domains::auth::models::AuthContext;
use crate::domains::requests::models::{Request, RequestDetails};
use crate::error::{MarketError, Result};
use crate::kernel::MarketDeps;

/// Insert `details` as a request owned by `owner`. Details must already be
/// validated by the caller's flow; validation runs again here regardless.
pub(crate) async fn insert_request(
    details: &RequestDetails,
    owner: UserId,
    deps: &MarketDeps,
) -> Result<Request> {
    let new_request = details.to_new_request(owner)?;

    let request = deps.requests.insert(&new_request).await.map_err(|e| {
        error!("Request insert failed for {}: {}", owner, e);
        MarketError::ResourceCreation {
            resource: "запрос",
            reason: e.translated(),
        }
    })?;

    info!("Request {} created by {}", request.id, owner);
    Ok(request)
}

/// Create a request as the already signed-in user (no phone verification).
pub async fn create_request(
    details: &RequestDetails,
    auth: &AuthContext,
    deps: &MarketDeps,
) -> Result<Request> {
    let user = auth.require_user()?;
    insert_request(details, user.id, deps).await
}
