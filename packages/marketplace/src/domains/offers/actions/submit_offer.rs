//! Offer submission with the one-offer-per-seller guard

use tracing::{error, info, warn};

use crate::domains::auth::models::AuthContext;
use crate::domains::offers::models::{find_offer_by, Offer, OfferForm};
use crate::domains::requests::models::Request;
use crate::error::{MarketError, Result};
use crate::kernel::MarketDeps;

/// Submit an offer on `request`.
///
/// `existing_offers` are the offers already loaded for the request. If one of
/// them belongs to the current user the submission is refused before any
/// store call. The check is client-side only; two concurrent submissions can
/// both pass it.
pub async fn submit_offer(
    request: &Request,
    existing_offers: &[Offer],
    form: &OfferForm,
    auth: &AuthContext,
    deps: &MarketDeps,
) -> Result<Offer> {
    let user = auth.require_user()?;

    if request.is_owned_by(user.id) {
        return Err(MarketError::PermissionDenied(
            "нельзя отправить предложение на свой запрос",
        ));
    }

    if let Some(existing) = find_offer_by(existing_offers, user.id) {
        warn!(
            "Duplicate offer by {} on {} (existing {})",
            user.id, request.id, existing.id
        );
        return Err(MarketError::DuplicateOffer);
    }

    let new_offer = form.to_new_offer(request.id, user.id)?;

    let offer = deps.offers.insert(&new_offer).await.map_err(|e| {
        error!(
            "Offer insert failed for {} on {}: {}",
            user.id, request.id, e
        );
        MarketError::ResourceCreation {
            resource: "предложение",
            reason: e.translated(),
        }
    })?;

    info!("Offer {} submitted on {}", offer.id, request.id);
    Ok(offer)
}
