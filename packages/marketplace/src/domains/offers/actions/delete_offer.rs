use tracing::info;

use crate::common::OfferId;
use crate::domains::auth::models::AuthContext;
use crate::error::{MarketError, Result};
use crate::kernel::MarketDeps;

/// Withdraw one of my offers. The store only matches rows owned by the
/// caller, so someone else's offer reads as `NotFound`.
pub async fn delete_offer(offer_id: OfferId, auth: &AuthContext, deps: &MarketDeps) -> Result<()> {
    let user = auth.require_user()?;

    let deleted = deps
        .offers
        .delete(offer_id, user.id)
        .await
        .map_err(|e| MarketError::gateway("Не удалось удалить предложение", &e))?;
    if !deleted {
        return Err(MarketError::NotFound("Предложение"));
    }

    info!("Offer {} withdrawn by {}", offer_id, user.id);
    Ok(())
}
