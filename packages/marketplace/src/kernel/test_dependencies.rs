// TestDependencies - in-memory implementations for tests and demo mode
//
// Provides a scripted identity gateway and a table store that can be injected
// into MarketDeps. Every call is recorded so tests can assert on what was (and
// was not) sent to the collaborators.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use super::{
    BaseFavoriteStore, BaseIdentityGateway, BaseOfferStore, BaseProfileStore, BaseRequestStore,
    MarketDeps,
};
use crate::common::{FavoriteId, OfferId, RequestId, SecretToken, UserId};
use crate::domains::auth::models::{Session, SignUp, User};
use crate::domains::favorites::models::{Favorite, NewFavorite};
use crate::domains::offers::models::{NewOffer, Offer};
use crate::domains::profiles::models::{Profile, ProfileUpdate};
use crate::domains::requests::models::{NewRequest, Request};
use crate::error::{GatewayError, GatewayResult};

/// Code accepted by [`MockIdentityGateway::new`].
pub const DEMO_CODE: &str = "123456";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn rejected(status: u16, message: &str) -> GatewayError {
    GatewayError::Rejected {
        status: Some(status),
        message: message.to_string(),
    }
}

fn session_for(user: &User) -> Session {
    Session {
        user: user.clone(),
        access_token: SecretToken::new(format!("access-{}", user.id)),
        refresh_token: Some(SecretToken::new(format!("refresh-{}", user.id))),
        expires_at: Some(Utc::now() + Duration::hours(1)),
    }
}

// =============================================================================
// Mock Identity Gateway
// =============================================================================

#[derive(Default)]
struct IdentityState {
    valid_code: String,
    reject_all_codes: bool,
    verify_outage: Option<String>,
    send_failure: Option<String>,
    forget_session: bool,
    require_email_confirmation: bool,
    fail_sign_out: bool,
    users_by_phone: HashMap<String, User>,
    accounts: HashMap<String, (String, User)>,
    oauth_codes: HashMap<String, String>,
    current: Option<User>,
    sent_codes: Vec<String>,
    verify_calls: Vec<(String, String)>,
    sign_up_calls: Vec<String>,
    sign_out_calls: usize,
}

#[derive(Clone)]
pub struct MockIdentityGateway {
    state: Arc<Mutex<IdentityState>>,
}

impl Default for MockIdentityGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockIdentityGateway {
    /// Gateway that sends every code and accepts [`DEMO_CODE`].
    pub fn new() -> Self {
        let state = IdentityState {
            valid_code: DEMO_CODE.to_string(),
            ..Default::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn with_valid_code(self, code: &str) -> Self {
        lock(&self.state).valid_code = code.to_string();
        self
    }

    /// Every verification attempt is rejected.
    pub fn rejecting_codes(self) -> Self {
        lock(&self.state).reject_all_codes = true;
        self
    }

    /// `verify_code` fails at the transport level with `message`.
    pub fn with_verify_outage(self, message: &str) -> Self {
        lock(&self.state).verify_outage = Some(message.to_string());
        self
    }

    /// Sending fails with `message`.
    pub fn with_send_failure(self, message: &str) -> Self {
        lock(&self.state).send_failure = Some(message.to_string());
        self
    }

    /// `current_user` reports nobody, even after a successful verification.
    pub fn forgetting_session(self) -> Self {
        lock(&self.state).forget_session = true;
        self
    }

    /// Sign-ups return a user but no session.
    pub fn requiring_email_confirmation(self) -> Self {
        lock(&self.state).require_email_confirmation = true;
        self
    }

    pub fn with_sign_out_failure(self) -> Self {
        lock(&self.state).fail_sign_out = true;
        self
    }

    /// Pre-registered e-mail/password account.
    pub fn add_account(&self, email: &str, password: &str) -> User {
        let user = User {
            id: UserId::new(),
            phone: None,
            email: Some(email.to_string()),
        };
        lock(&self.state)
            .accounts
            .insert(email.to_string(), (password.to_string(), user.clone()));
        user
    }

    /// OAuth code that exchanges into a session for `email`.
    pub fn with_oauth_code(self, code: &str, email: &str) -> Self {
        lock(&self.state)
            .oauth_codes
            .insert(code.to_string(), email.to_string());
        self
    }

    /// Phones a code was sent to, in order.
    pub fn sent_codes(&self) -> Vec<String> {
        lock(&self.state).sent_codes.clone()
    }

    pub fn send_count(&self) -> usize {
        lock(&self.state).sent_codes.len()
    }

    /// `(phone, code)` pairs passed to `verify_code`.
    pub fn verify_calls(&self) -> Vec<(String, String)> {
        lock(&self.state).verify_calls.clone()
    }

    pub fn sign_up_calls(&self) -> Vec<String> {
        lock(&self.state).sign_up_calls.clone()
    }

    pub fn sign_out_calls(&self) -> usize {
        lock(&self.state).sign_out_calls
    }

    /// User behind the gateway session, ignoring `forgetting_session`.
    pub fn current(&self) -> Option<User> {
        lock(&self.state).current.clone()
    }

    /// User previously verified with `phone`.
    pub fn user_for_phone(&self, phone: &str) -> Option<User> {
        lock(&self.state).users_by_phone.get(phone).cloned()
    }
}

#[async_trait]
impl BaseIdentityGateway for MockIdentityGateway {
    async fn send_verification_code(&self, phone: &str) -> GatewayResult<()> {
        let mut state = lock(&self.state);
        if let Some(message) = &state.send_failure {
            return Err(rejected(500, message));
        }
        state.sent_codes.push(phone.to_string());
        Ok(())
    }

    async fn verify_code(&self, phone: &str, code: &str) -> GatewayResult<Session> {
        let mut state = lock(&self.state);
        state
            .verify_calls
            .push((phone.to_string(), code.to_string()));

        if let Some(message) = &state.verify_outage {
            return Err(GatewayError::Transport(message.clone()));
        }
        if state.reject_all_codes || code != state.valid_code {
            return Err(rejected(403, "Token has expired or is invalid"));
        }

        let user = state
            .users_by_phone
            .entry(phone.to_string())
            .or_insert_with(|| User {
                id: UserId::new(),
                phone: Some(phone.to_string()),
                email: None,
            })
            .clone();
        state.current = Some(user.clone());

        Ok(session_for(&user))
    }

    async fn current_user(&self) -> GatewayResult<Option<User>> {
        let state = lock(&self.state);
        if state.forget_session {
            return Ok(None);
        }
        Ok(state.current.clone())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> GatewayResult<Session> {
        let mut state = lock(&self.state);
        let user = match state.accounts.get(email) {
            Some((stored, user)) if stored == password => user.clone(),
            _ => return Err(rejected(400, "Invalid login credentials")),
        };
        state.current = Some(user.clone());
        Ok(session_for(&user))
    }

    async fn sign_up(&self, email: &str, password: &str) -> GatewayResult<SignUp> {
        let mut state = lock(&self.state);
        state.sign_up_calls.push(email.to_string());

        if state.accounts.contains_key(email) {
            return Err(rejected(422, "User already registered"));
        }
        if password.len() < 6 {
            return Err(rejected(
                422,
                "Password should be at least 6 characters",
            ));
        }

        let user = User {
            id: UserId::new(),
            phone: None,
            email: Some(email.to_string()),
        };
        state
            .accounts
            .insert(email.to_string(), (password.to_string(), user.clone()));

        if state.require_email_confirmation {
            return Ok(SignUp {
                user,
                session: None,
            });
        }

        state.current = Some(user.clone());
        Ok(SignUp {
            session: Some(session_for(&user)),
            user,
        })
    }

    async fn exchange_oauth_code(&self, code: &str, _verifier: &str) -> GatewayResult<Session> {
        let mut state = lock(&self.state);
        let email = state
            .oauth_codes
            .remove(code)
            .ok_or_else(|| rejected(400, "invalid flow state, no valid flow state found"))?;

        let user = User {
            id: UserId::new(),
            phone: None,
            email: Some(email),
        };
        state.current = Some(user.clone());
        Ok(session_for(&user))
    }

    async fn sign_out(&self) -> GatewayResult<()> {
        let mut state = lock(&self.state);
        state.sign_out_calls += 1;
        state.current = None;
        if state.fail_sign_out {
            return Err(GatewayError::Transport("connection reset".to_string()));
        }
        Ok(())
    }

    async fn update_email(&self, email: &str) -> GatewayResult<User> {
        let mut state = lock(&self.state);
        let user = state
            .current
            .as_mut()
            .ok_or_else(|| rejected(401, "Unauthorized"))?;
        user.email = Some(email.to_string());
        Ok(user.clone())
    }
}

// =============================================================================
// In-memory table store
// =============================================================================

/// Store operations that can be counted and made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    ProfileGet,
    ProfileInsert,
    ProfileUpdate,
    RequestInsert,
    RequestGet,
    RequestList,
    RequestDelete,
    OfferInsert,
    OfferList,
    OfferDelete,
    FavoriteExists,
    FavoriteInsert,
    FavoriteDelete,
    FavoriteList,
}

#[derive(Default)]
struct Tables {
    profiles: Vec<Profile>,
    requests: Vec<Request>,
    offers: Vec<Offer>,
    favorites: Vec<Favorite>,
    calls: HashMap<StoreOp, usize>,
    failures: HashMap<StoreOp, String>,
}

impl Tables {
    /// Count the call, then fail it if a failure was scripted.
    fn enter(&mut self, op: StoreOp) -> GatewayResult<()> {
        *self.calls.entry(op).or_default() += 1;
        match self.failures.get(&op) {
            Some(message) => Err(rejected(400, message)),
            None => Ok(()),
        }
    }
}

/// All four marketplace tables in memory. Rows are kept in insertion order;
/// listings return them newest first.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call of `op` fail with `message`.
    pub fn fail_on(&self, op: StoreOp, message: &str) {
        lock(&self.tables)
            .failures
            .insert(op, message.to_string());
    }

    pub fn recover(&self, op: StoreOp) {
        lock(&self.tables).failures.remove(&op);
    }

    pub fn calls(&self, op: StoreOp) -> usize {
        lock(&self.tables).calls.get(&op).copied().unwrap_or(0)
    }

    pub fn seed_profile(&self, profile: Profile) {
        lock(&self.tables).profiles.push(profile);
    }

    pub fn seed_request(&self, request: Request) {
        lock(&self.tables).requests.push(request);
    }

    pub fn seed_offer(&self, offer: Offer) {
        lock(&self.tables).offers.push(offer);
    }

    pub fn profile(&self, user_id: UserId) -> Option<Profile> {
        lock(&self.tables)
            .profiles
            .iter()
            .find(|p| p.id == user_id)
            .cloned()
    }

    pub fn profiles(&self) -> Vec<Profile> {
        lock(&self.tables).profiles.clone()
    }

    pub fn requests(&self) -> Vec<Request> {
        lock(&self.tables).requests.clone()
    }

    pub fn offers(&self) -> Vec<Offer> {
        lock(&self.tables).offers.clone()
    }

    pub fn favorites(&self) -> Vec<Favorite> {
        lock(&self.tables).favorites.clone()
    }
}

fn newest_first<T>(rows: impl DoubleEndedIterator<Item = T>) -> Vec<T> {
    rows.rev().collect()
}

#[async_trait]
impl BaseProfileStore for MemoryStore {
    async fn get(&self, user_id: UserId) -> GatewayResult<Option<Profile>> {
        let mut tables = lock(&self.tables);
        tables.enter(StoreOp::ProfileGet)?;
        Ok(tables.profiles.iter().find(|p| p.id == user_id).cloned())
    }

    async fn insert(&self, profile: &Profile) -> GatewayResult<Profile> {
        let mut tables = lock(&self.tables);
        tables.enter(StoreOp::ProfileInsert)?;
        if tables.profiles.iter().any(|p| p.id == profile.id) {
            return Err(rejected(
                409,
                "duplicate key value violates unique constraint \"profiles_pkey\"",
            ));
        }
        tables.profiles.push(profile.clone());
        Ok(profile.clone())
    }

    async fn update(&self, user_id: UserId, update: &ProfileUpdate) -> GatewayResult<Profile> {
        let mut tables = lock(&self.tables);
        tables.enter(StoreOp::ProfileUpdate)?;
        let profile = tables
            .profiles
            .iter_mut()
            .find(|p| p.id == user_id)
            .ok_or_else(|| GatewayError::Decode("profiles: write returned no rows".to_string()))?;
        update.apply(profile);
        Ok(profile.clone())
    }
}

#[async_trait]
impl BaseRequestStore for MemoryStore {
    async fn insert(&self, request: &NewRequest) -> GatewayResult<Request> {
        let mut tables = lock(&self.tables);
        tables.enter(StoreOp::RequestInsert)?;
        let row = Request {
            id: RequestId::new(),
            user_id: request.user_id,
            title: request.title.clone(),
            description: request.description.clone(),
            category: request.category,
            budget: request.budget.clone(),
            city: request.city.clone(),
            deadline: request.deadline.clone(),
            images: request.images.clone().unwrap_or_default(),
            created_at: Utc::now(),
        };
        tables.requests.push(row.clone());
        Ok(row)
    }

    async fn get(&self, id: RequestId) -> GatewayResult<Option<Request>> {
        let mut tables = lock(&self.tables);
        tables.enter(StoreOp::RequestGet)?;
        Ok(tables.requests.iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self) -> GatewayResult<Vec<Request>> {
        let mut tables = lock(&self.tables);
        tables.enter(StoreOp::RequestList)?;
        Ok(newest_first(tables.requests.iter().cloned()))
    }

    async fn list_by_owner(&self, user_id: UserId) -> GatewayResult<Vec<Request>> {
        let mut tables = lock(&self.tables);
        tables.enter(StoreOp::RequestList)?;
        Ok(newest_first(
            tables
                .requests
                .iter()
                .filter(|r| r.user_id == user_id)
                .cloned(),
        ))
    }

    async fn list_by_ids(&self, ids: &[RequestId]) -> GatewayResult<Vec<Request>> {
        let mut tables = lock(&self.tables);
        tables.enter(StoreOp::RequestList)?;
        Ok(newest_first(
            tables
                .requests
                .iter()
                .filter(|r| ids.contains(&r.id))
                .cloned(),
        ))
    }

    async fn delete(&self, id: RequestId, owner: UserId) -> GatewayResult<bool> {
        let mut tables = lock(&self.tables);
        tables.enter(StoreOp::RequestDelete)?;
        let before = tables.requests.len();
        tables
            .requests
            .retain(|r| !(r.id == id && r.user_id == owner));
        let deleted = tables.requests.len() < before;
        if deleted {
            // Offers and favorites reference the request (ON DELETE CASCADE).
            tables.offers.retain(|o| o.request_id != id);
            tables.favorites.retain(|f| f.request_id != id);
        }
        Ok(deleted)
    }
}

#[async_trait]
impl BaseOfferStore for MemoryStore {
    async fn insert(&self, offer: &NewOffer) -> GatewayResult<Offer> {
        let mut tables = lock(&self.tables);
        tables.enter(StoreOp::OfferInsert)?;
        let row = Offer {
            id: OfferId::new(),
            request_id: offer.request_id,
            user_id: offer.user_id,
            company: offer.company.clone(),
            price: offer.price.clone(),
            description: offer.description.clone(),
            contact: offer.contact.clone(),
            created_at: Utc::now(),
        };
        tables.offers.push(row.clone());
        Ok(row)
    }

    async fn list_for_request(&self, request_id: RequestId) -> GatewayResult<Vec<Offer>> {
        let mut tables = lock(&self.tables);
        tables.enter(StoreOp::OfferList)?;
        Ok(newest_first(
            tables
                .offers
                .iter()
                .filter(|o| o.request_id == request_id)
                .cloned(),
        ))
    }

    async fn list_by_owner(&self, user_id: UserId) -> GatewayResult<Vec<Offer>> {
        let mut tables = lock(&self.tables);
        tables.enter(StoreOp::OfferList)?;
        Ok(newest_first(
            tables
                .offers
                .iter()
                .filter(|o| o.user_id == user_id)
                .cloned(),
        ))
    }

    async fn delete(&self, id: OfferId, owner: UserId) -> GatewayResult<bool> {
        let mut tables = lock(&self.tables);
        tables.enter(StoreOp::OfferDelete)?;
        let before = tables.offers.len();
        tables.offers.retain(|o| !(o.id == id && o.user_id == owner));
        Ok(tables.offers.len() < before)
    }
}

#[async_trait]
impl BaseFavoriteStore for MemoryStore {
    async fn exists(&self, user_id: UserId, request_id: RequestId) -> GatewayResult<bool> {
        let mut tables = lock(&self.tables);
        tables.enter(StoreOp::FavoriteExists)?;
        Ok(tables
            .favorites
            .iter()
            .any(|f| f.user_id == user_id && f.request_id == request_id))
    }

    async fn insert(&self, favorite: &NewFavorite) -> GatewayResult<Favorite> {
        let mut tables = lock(&self.tables);
        tables.enter(StoreOp::FavoriteInsert)?;
        if tables
            .favorites
            .iter()
            .any(|f| f.user_id == favorite.user_id && f.request_id == favorite.request_id)
        {
            return Err(rejected(
                409,
                "duplicate key value violates unique constraint \"favorites_user_id_request_id_key\"",
            ));
        }
        let row = Favorite {
            id: FavoriteId::new(),
            user_id: favorite.user_id,
            request_id: favorite.request_id,
        };
        tables.favorites.push(row.clone());
        Ok(row)
    }

    async fn delete(&self, user_id: UserId, request_id: RequestId) -> GatewayResult<()> {
        let mut tables = lock(&self.tables);
        tables.enter(StoreOp::FavoriteDelete)?;
        tables
            .favorites
            .retain(|f| !(f.user_id == user_id && f.request_id == request_id));
        Ok(())
    }

    async fn list_by_user(&self, user_id: UserId) -> GatewayResult<Vec<Favorite>> {
        let mut tables = lock(&self.tables);
        tables.enter(StoreOp::FavoriteList)?;
        Ok(newest_first(
            tables
                .favorites
                .iter()
                .filter(|f| f.user_id == user_id)
                .cloned(),
        ))
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Mock collaborators plus the [`MarketDeps`] built from them.
#[derive(Clone)]
pub struct TestDependencies {
    pub identity: MockIdentityGateway,
    pub store: MemoryStore,
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            identity: MockIdentityGateway::new(),
            store: MemoryStore::new(),
        }
    }

    pub fn with_identity(mut self, identity: MockIdentityGateway) -> Self {
        self.identity = identity;
        self
    }

    pub fn deps(&self) -> MarketDeps {
        let store = Arc::new(self.store.clone());
        MarketDeps::new(
            Arc::new(self.identity.clone()),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
        )
    }
}
