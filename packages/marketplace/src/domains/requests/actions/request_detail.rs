use crate::common::RequestId;
use crate::domains::auth::models::AuthContext;
use crate::domains::offers::models::{find_offer_by, Offer};
use crate::domains::requests::models::Request;
use crate::error::{MarketError, Result};
use crate::kernel::MarketDeps;

/// Everything the request page shows.
#[derive(Debug, Clone)]
pub struct RequestDetail {
    pub request: Request,
    /// Newest first.
    pub offers: Vec<Offer>,
    /// Always false for anonymous viewers.
    pub is_favorite: bool,
    pub is_owner: bool,
}

impl RequestDetail {
    /// Offer already made by `auth`'s user, if any.
    pub fn my_offer(&self, auth: &AuthContext) -> Option<&Offer> {
        auth.user_id()
            .and_then(|user_id| find_offer_by(&self.offers, user_id))
    }
}

pub async fn load_request_detail(
    request_id: RequestId,
    auth: &AuthContext,
    deps: &MarketDeps,
) -> Result<RequestDetail> {
    let request = deps
        .requests
        .get(request_id)
        .await
        .map_err(|e| MarketError::gateway("Не удалось загрузить запрос", &e))?
        .ok_or(MarketError::NotFound("Запрос"))?;

    let offers = deps
        .offers
        .list_for_request(request_id)
        .await
        .map_err(|e| MarketError::gateway("Не удалось загрузить предложения", &e))?;

    let (is_favorite, is_owner) = match auth.user_id() {
        Some(user_id) => {
            let is_favorite = deps
                .favorites
                .exists(user_id, request_id)
                .await
                .map_err(|e| MarketError::gateway("Не удалось загрузить избранное", &e))?;
            (is_favorite, request.is_owned_by(user_id))
        }
        None => (false, false),
    };

    Ok(RequestDetail {
        request,
        offers,
        is_favorite,
        is_owner,
    })
}
