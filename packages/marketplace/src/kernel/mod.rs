//! Kernel module - collaborator traits, adapters and dependencies.

pub mod deps;
pub mod supabase_adapter;
pub mod test_dependencies;
pub mod traits;

pub use deps::{MarketDeps, DEFAULT_RESEND_COOLDOWN};
pub use supabase_adapter::SupabaseAdapter;
pub use test_dependencies::{MemoryStore, MockIdentityGateway, StoreOp, TestDependencies, DEMO_CODE};
pub use traits::*;
