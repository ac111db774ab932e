//! Personal dashboard: profile form, my requests, my offers, favorites

use tracing::debug;

use crate::common::RequestId;
use crate::domains::auth::models::AuthContext;
use crate::domains::offers::models::Offer;
use crate::domains::profiles::models::{Profile, ProfileForm};
use crate::domains::requests::models::Request;
use crate::error::{MarketError, Result};
use crate::kernel::MarketDeps;

/// An offer I made, with the title of the request it answers.
#[derive(Debug, Clone, PartialEq)]
pub struct MyOffer {
    pub offer: Offer,
    /// `None` when the request is gone.
    pub request_title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub profile: Option<Profile>,
    pub form: ProfileForm,
    pub requests: Vec<Request>,
    pub offers: Vec<MyOffer>,
    pub favorites: Vec<Request>,
}

pub async fn load_dashboard(auth: &AuthContext, deps: &MarketDeps) -> Result<Dashboard> {
    let user = auth.require_user()?;

    let profile = deps
        .profiles
        .get(user.id)
        .await
        .map_err(|e| MarketError::gateway("Не удалось загрузить профиль", &e))?;
    let form = ProfileForm::from_profile(profile.as_ref(), user.email.as_deref());

    let requests = deps
        .requests
        .list_by_owner(user.id)
        .await
        .map_err(|e| MarketError::gateway("Не удалось загрузить ваши заявки", &e))?;

    let offers = deps
        .offers
        .list_by_owner(user.id)
        .await
        .map_err(|e| MarketError::gateway("Не удалось загрузить ваши предложения", &e))?;
    let offers = attach_titles(offers, deps).await?;

    let favorite_ids: Vec<RequestId> = deps
        .favorites
        .list_by_user(user.id)
        .await
        .map_err(|e| MarketError::gateway("Не удалось загрузить избранные заявки", &e))?
        .into_iter()
        .map(|f| f.request_id)
        .collect();
    let favorites = deps
        .requests
        .list_by_ids(&favorite_ids)
        .await
        .map_err(|e| MarketError::gateway("Не удалось загрузить избранные заявки", &e))?;

    debug!(
        "Dashboard for {}: {} requests, {} offers, {} favorites",
        user.id,
        requests.len(),
        offers.len(),
        favorites.len()
    );

    Ok(Dashboard {
        profile,
        form,
        requests,
        offers,
        favorites,
    })
}

async fn attach_titles(offers: Vec<Offer>, deps: &MarketDeps) -> Result<Vec<MyOffer>> {
    let mut ids: Vec<RequestId> = offers.iter().map(|o| o.request_id).collect();
    ids.sort();
    ids.dedup();

    let requests = deps
        .requests
        .list_by_ids(&ids)
        .await
        .map_err(|e| MarketError::gateway("Не удалось загрузить ваши предложения", &e))?;

    Ok(offers
        .into_iter()
        .map(|offer| {
            let request_title = requests
                .iter()
                .find(|r| r.id == offer.request_id)
                .map(|r| r.title.clone());
            MyOffer {
                offer,
                request_title,
            }
        })
        .collect())
}
