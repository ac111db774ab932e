use tracing::info;

use crate::common::RequestId;
use crate::domains::auth::models::AuthContext;
use crate::error::{MarketError, Result};
use crate::kernel::MarketDeps;

/// Delete one of my requests. Someone else's request is `PermissionDenied`.
pub async fn delete_request(
    request_id: RequestId,
    auth: &AuthContext,
    deps: &MarketDeps,
) -> Result<()> {
    let user = auth.require_user()?;

    let request = deps
        .requests
        .get(request_id)
        .await
        .map_err(|e| MarketError::gateway("Не удалось удалить запрос", &e))?
        .ok_or(MarketError::NotFound("Запрос"))?;

    if !request.is_owned_by(user.id) {
        return Err(MarketError::PermissionDenied(
            "можно удалять только свои запросы",
        ));
    }

    let deleted = deps
        .requests
        .delete(request_id, user.id)
        .await
        .map_err(|e| MarketError::gateway("Не удалось удалить запрос", &e))?;
    if !deleted {
        return Err(MarketError::NotFound("Запрос"));
    }

    info!("Request {} deleted by {}", request_id, user.id);
    Ok(())
}
