// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Rules like "one offer per seller" live in domain actions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseIdentityGateway, BaseOfferStore)

use async_trait::async_trait;

use crate::common::{OfferId, RequestId, UserId};
use crate::domains::auth::models::{Session, SignUp, User};
use crate::domains::favorites::models::{Favorite, NewFavorite};
use crate::domains::offers::models::{NewOffer, Offer};
use crate::domains::profiles::models::{Profile, ProfileUpdate};
use crate::domains::requests::models::{NewRequest, Request};
use crate::error::GatewayResult;

// =============================================================================
// Identity Gateway Trait (Infrastructure - OTP, passwords, sessions)
// =============================================================================

#[async_trait]
pub trait BaseIdentityGateway: Send + Sync {
    /// Send a one-time code by SMS to the phone number
    async fn send_verification_code(&self, phone: &str) -> GatewayResult<()>;

    /// Verify the code for the phone number and open a session
    async fn verify_code(&self, phone: &str, code: &str) -> GatewayResult<Session>;

    /// User behind the gateway's current session, if any
    async fn current_user(&self) -> GatewayResult<Option<User>>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> GatewayResult<Session>;

    /// Register a new user. The session is absent when e-mail confirmation
    /// is required.
    async fn sign_up(&self, email: &str, password: &str) -> GatewayResult<SignUp>;

    /// Exchange an OAuth redirect code for a session
    async fn exchange_oauth_code(&self, code: &str, verifier: &str) -> GatewayResult<Session>;

    async fn sign_out(&self) -> GatewayResult<()>;

    /// Change the e-mail of the signed-in user
    async fn update_email(&self, email: &str) -> GatewayResult<User>;
}

// =============================================================================
// Table Store Traits (Infrastructure - keyed records)
// =============================================================================

#[async_trait]
pub trait BaseProfileStore: Send + Sync {
    async fn get(&self, user_id: UserId) -> GatewayResult<Option<Profile>>;

    async fn insert(&self, profile: &Profile) -> GatewayResult<Profile>;

    async fn update(&self, user_id: UserId, update: &ProfileUpdate) -> GatewayResult<Profile>;
}

#[async_trait]
pub trait BaseRequestStore: Send + Sync {
    async fn insert(&self, request: &NewRequest) -> GatewayResult<Request>;

    async fn get(&self, id: RequestId) -> GatewayResult<Option<Request>>;

    /// All requests, newest first
    async fn list(&self) -> GatewayResult<Vec<Request>>;

    /// Requests owned by `user_id`, newest first
    async fn list_by_owner(&self, user_id: UserId) -> GatewayResult<Vec<Request>>;

    /// Requests with the given ids, newest first. Unknown ids are skipped.
    async fn list_by_ids(&self, ids: &[RequestId]) -> GatewayResult<Vec<Request>>;

    /// Delete a request owned by `owner`. Returns false when no row matched.
    async fn delete(&self, id: RequestId, owner: UserId) -> GatewayResult<bool>;
}

#[async_trait]
pub trait BaseOfferStore: Send + Sync {
    async fn insert(&self, offer: &NewOffer) -> GatewayResult<Offer>;

    /// Offers on a request, newest first
    async fn list_for_request(&self, request_id: RequestId) -> GatewayResult<Vec<Offer>>;

    /// Offers made by `user_id`, newest first
    async fn list_by_owner(&self, user_id: UserId) -> GatewayResult<Vec<Offer>>;

    async fn delete(&self, id: OfferId, owner: UserId) -> GatewayResult<bool>;
}

#[async_trait]
pub trait BaseFavoriteStore: Send + Sync {
    async fn exists(&self, user_id: UserId, request_id: RequestId) -> GatewayResult<bool>;

    async fn insert(&self, favorite: &NewFavorite) -> GatewayResult<Favorite>;

    async fn delete(&self, user_id: UserId, request_id: RequestId) -> GatewayResult<()>;

    async fn list_by_user(&self, user_id: UserId) -> GatewayResult<Vec<Favorite>>;
}
