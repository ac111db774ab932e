//! Favorite toggle

use tracing::debug;

use crate::common::{RequestId, UserId};
use crate::domains::auth::models::AuthContext;
use crate::domains::favorites::models::{FavoriteToggle, NewFavorite};
use crate::domains::requests::models::Request;
use crate::error::{MarketError, Result};
use crate::kernel::MarketDeps;

/// Flip the favorite flag for `(user_id, request_id)`.
///
/// Read-then-write: an existing row is deleted, otherwise one is inserted.
/// Ownership is not checked here.
pub async fn toggle(
    user_id: UserId,
    request_id: RequestId,
    deps: &MarketDeps,
) -> Result<FavoriteToggle> {
    let exists = deps
        .favorites
        .exists(user_id, request_id)
        .await
        .map_err(|e| MarketError::gateway("Не удалось обновить избранное", &e))?;

    let outcome = if exists {
        deps.favorites
            .delete(user_id, request_id)
            .await
            .map_err(|e| MarketError::gateway("Не удалось обновить избранное", &e))?;
        FavoriteToggle::Removed
    } else {
        deps.favorites
            .insert(&NewFavorite {
                user_id,
                request_id,
            })
            .await
            .map_err(|e| MarketError::gateway("Не удалось обновить избранное", &e))?;
        FavoriteToggle::Added
    };

    debug!("Favorite {:?} for {} on {}", outcome, user_id, request_id);
    Ok(outcome)
}

/// Toggle from the request page: requires a signed-in user and refuses the
/// request's own author.
pub async fn toggle_favorite(
    request: &Request,
    auth: &AuthContext,
    deps: &MarketDeps,
) -> Result<FavoriteToggle> {
    let user = auth.require_user()?;
    if request.is_owned_by(user.id) {
        return Err(MarketError::PermissionDenied(
            "нельзя добавить в избранное свой запрос",
        ));
    }
    toggle(user.id, request.id, deps).await
}
