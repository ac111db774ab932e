use tracing::{info, warn};

use crate::domains::auth::models::AuthContext;
use crate::kernel::MarketDeps;

/// Sign out. The local context is cleared whatever the gateway says;
/// returns whether the server-side sign-out succeeded.
pub async fn sign_out(auth: &mut AuthContext, deps: &MarketDeps) -> bool {
    let user_id = auth.user_id();
    let result = deps.identity.sign_out().await;
    auth.clear();

    match result {
        Ok(()) => {
            if let Some(user_id) = user_id {
                info!("Signed out {}", user_id);
            }
            true
        }
        Err(e) => {
            warn!(
                "Server sign-out failed, local session cleared anyway: {}",
                e
            );
            false
        }
    }
}
