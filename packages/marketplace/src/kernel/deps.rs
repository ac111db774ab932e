//! Marketplace dependencies for domain actions (using traits for testability)
//!
//! Every collaborator is a trait object so actions and the verification flow
//! run unchanged against Supabase or against the in-memory doubles.

use std::sync::Arc;
use std::time::Duration;

use supabase::SupabaseService;

use super::{
    BaseFavoriteStore, BaseIdentityGateway, BaseOfferStore, BaseProfileStore, BaseRequestStore,
    SupabaseAdapter,
};

/// Cooldown before a verification code may be requested again.
pub const DEFAULT_RESEND_COOLDOWN: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct MarketDeps {
    pub identity: Arc<dyn BaseIdentityGateway>,
    pub profiles: Arc<dyn BaseProfileStore>,
    pub requests: Arc<dyn BaseRequestStore>,
    pub offers: Arc<dyn BaseOfferStore>,
    pub favorites: Arc<dyn BaseFavoriteStore>,
    pub resend_cooldown: Duration,
}

impl MarketDeps {
    pub fn new(
        identity: Arc<dyn BaseIdentityGateway>,
        profiles: Arc<dyn BaseProfileStore>,
        requests: Arc<dyn BaseRequestStore>,
        offers: Arc<dyn BaseOfferStore>,
        favorites: Arc<dyn BaseFavoriteStore>,
    ) -> Self {
        Self {
            identity,
            profiles,
            requests,
            offers,
            favorites,
            resend_cooldown: DEFAULT_RESEND_COOLDOWN,
        }
    }

    /// All collaborators backed by one Supabase client (shared session).
    pub fn from_supabase(service: Arc<SupabaseService>) -> Self {
        let adapter = Arc::new(SupabaseAdapter::new(service));
        Self::new(
            adapter.clone(),
            adapter.clone(),
            adapter.clone(),
            adapter.clone(),
            adapter,
        )
    }

    pub fn with_resend_cooldown(mut self, cooldown: Duration) -> Self {
        self.resend_cooldown = cooldown;
        self
    }
}
