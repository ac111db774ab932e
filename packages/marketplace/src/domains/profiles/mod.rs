pub mod actions;
pub mod models;

pub use actions::{ensure_profile, ProfileWrite};
pub use models::Profile;
