//! Supabase-backed implementations of the kernel traits.

use std::sync::Arc;

use async_trait::async_trait;
use supabase::{Query, SupabaseService, UserAttributes};
use tracing::debug;

use crate::common::{OfferId, RequestId, UserId};
use crate::domains::auth::models::{Session, SignUp, User};
use crate::domains::favorites::models::{Favorite, NewFavorite};
use crate::domains::offers::models::{NewOffer, Offer};
use crate::domains::profiles::models::{Profile, ProfileUpdate};
use crate::domains::requests::models::{NewRequest, Request};
use crate::error::{GatewayError, GatewayResult};

use super::{
    BaseFavoriteStore, BaseIdentityGateway, BaseOfferStore, BaseProfileStore, BaseRequestStore,
};

const PROFILES: &str = "profiles";
const REQUESTS: &str = "requests";
const OFFERS: &str = "offers";
const FAVORITES: &str = "favorites";

/// Wrapper around SupabaseService that implements every Base* collaborator trait
#[derive(Clone)]
pub struct SupabaseAdapter(pub Arc<SupabaseService>);

impl SupabaseAdapter {
    pub fn new(service: Arc<SupabaseService>) -> Self {
        Self(service)
    }
}

/// Single row from a `return=representation` write.
fn single<T>(rows: Vec<T>, table: &str) -> GatewayResult<T> {
    rows.into_iter()
        .next()
        .ok_or_else(|| GatewayError::Decode(format!("{}: write returned no rows", table)))
}

// =============================================================================
// Identity
// =============================================================================

#[async_trait]
impl BaseIdentityGateway for SupabaseAdapter {
    async fn send_verification_code(&self, phone: &str) -> GatewayResult<()> {
        self.0.send_otp(phone).await?;
        Ok(())
    }

    async fn verify_code(&self, phone: &str, code: &str) -> GatewayResult<Session> {
        let session = self.0.verify_otp(phone, code).await?;
        Session::from_auth(session)
    }

    async fn current_user(&self) -> GatewayResult<Option<User>> {
        match self.0.get_user().await? {
            Some(user) => Ok(Some(User::from_auth(user)?)),
            None => Ok(None),
        }
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> GatewayResult<Session> {
        let session = self.0.sign_in_with_password(email, password).await?;
        Session::from_auth(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> GatewayResult<SignUp> {
        let response = self.0.sign_up(email, password).await?;
        let session = response
            .session()
            .cloned()
            .map(Session::from_auth)
            .transpose()?;
        let user = match &session {
            Some(session) => session.user.clone(),
            None => User::from_auth(response.user().clone())?,
        };
        Ok(SignUp { user, session })
    }

    async fn exchange_oauth_code(&self, code: &str, verifier: &str) -> GatewayResult<Session> {
        let session = self.0.exchange_code_for_session(code, verifier).await?;
        Session::from_auth(session)
    }

    async fn sign_out(&self) -> GatewayResult<()> {
        self.0.sign_out().await?;
        Ok(())
    }

    async fn update_email(&self, email: &str) -> GatewayResult<User> {
        let attributes = UserAttributes {
            email: Some(email.to_string()),
            ..Default::default()
        };
        let user = self.0.update_user(&attributes).await?;
        User::from_auth(user)
    }
}

// =============================================================================
// Tables
// =============================================================================

#[async_trait]
impl BaseProfileStore for SupabaseAdapter {
    async fn get(&self, user_id: UserId) -> GatewayResult<Option<Profile>> {
        let query = Query::new().eq("id", user_id).limit(1);
        let rows: Vec<Profile> = self.0.select(PROFILES, &query).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert(&self, profile: &Profile) -> GatewayResult<Profile> {
        let rows = self.0.insert(PROFILES, profile).await?;
        single(rows, PROFILES)
    }

    async fn update(&self, user_id: UserId, update: &ProfileUpdate) -> GatewayResult<Profile> {
        let query = Query::new().eq("id", user_id);
        let rows = self.0.update(PROFILES, &query, update).await?;
        single(rows, PROFILES)
    }
}

#[async_trait]
impl BaseRequestStore for SupabaseAdapter {
    async fn insert(&self, request: &NewRequest) -> GatewayResult<Request> {
        let rows = self.0.insert(REQUESTS, request).await?;
        single(rows, REQUESTS)
    }

    async fn get(&self, id: RequestId) -> GatewayResult<Option<Request>> {
        let query = Query::new().eq("id", id).limit(1);
        let rows: Vec<Request> = self.0.select(REQUESTS, &query).await?;
        Ok(rows.into_iter().next())
    }

    async fn list(&self) -> GatewayResult<Vec<Request>> {
        let query = Query::new().order_desc("created_at");
        Ok(self.0.select(REQUESTS, &query).await?)
    }

    async fn list_by_owner(&self, user_id: UserId) -> GatewayResult<Vec<Request>> {
        let query = Query::new()
            .eq("user_id", user_id)
            .order_desc("created_at");
        Ok(self.0.select(REQUESTS, &query).await?)
    }

    async fn list_by_ids(&self, ids: &[RequestId]) -> GatewayResult<Vec<Request>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = Query::new()
            .in_list("id", ids.iter())
            .order_desc("created_at");
        Ok(self.0.select(REQUESTS, &query).await?)
    }

    async fn delete(&self, id: RequestId, owner: UserId) -> GatewayResult<bool> {
        let query = Query::new().eq("id", id).eq("user_id", owner);
        let rows: Vec<Request> = self.0.delete(REQUESTS, &query).await?;
        debug!("deleted {} request row(s) for {}", rows.len(), id);
        Ok(!rows.is_empty())
    }
}

#[async_trait]
impl BaseOfferStore for SupabaseAdapter {
    async fn insert(&self, offer: &NewOffer) -> GatewayResult<Offer> {
        let rows = self.0.insert(OFFERS, offer).await?;
        single(rows, OFFERS)
    }

    async fn list_for_request(&self, request_id: RequestId) -> GatewayResult<Vec<Offer>> {
        let query = Query::new()
            .eq("request_id", request_id)
            .order_desc("created_at");
        Ok(self.0.select(OFFERS, &query).await?)
    }

    async fn list_by_owner(&self, user_id: UserId) -> GatewayResult<Vec<Offer>> {
        let query = Query::new()
            .eq("user_id", user_id)
            .order_desc("created_at");
        Ok(self.0.select(OFFERS, &query).await?)
    }

    async fn delete(&self, id: OfferId, owner: UserId) -> GatewayResult<bool> {
        let query = Query::new().eq("id", id).eq("user_id", owner);
        let rows: Vec<Offer> = self.0.delete(OFFERS, &query).await?;
        Ok(!rows.is_empty())
    }
}

#[async_trait]
impl BaseFavoriteStore for SupabaseAdapter {
    async fn exists(&self, user_id: UserId, request_id: RequestId) -> GatewayResult<bool> {
        let query = Query::new()
            .select("id")
            .eq("user_id", user_id)
            .eq("request_id", request_id)
            .limit(1);
        let rows: Vec<serde_json::Value> = self.0.select(FAVORITES, &query).await?;
        Ok(!rows.is_empty())
    }

    async fn insert(&self, favorite: &NewFavorite) -> GatewayResult<Favorite> {
        let rows = self.0.insert(FAVORITES, favorite).await?;
        single(rows, FAVORITES)
    }

    async fn delete(&self, user_id: UserId, request_id: RequestId) -> GatewayResult<()> {
        let query = Query::new()
            .eq("user_id", user_id)
            .eq("request_id", request_id);
        let _: Vec<Favorite> = self.0.delete(FAVORITES, &query).await?;
        Ok(())
    }

    async fn list_by_user(&self, user_id: UserId) -> GatewayResult<Vec<Favorite>> {
        let query = Query::new().eq("user_id", user_id);
        Ok(self.0.select(FAVORITES, &query).await?)
    }
}
