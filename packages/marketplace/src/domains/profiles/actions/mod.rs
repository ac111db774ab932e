//! Profile domain actions

mod dashboard;
mod ensure_profile;
mod update_profile;

pub use dashboard::{load_dashboard, Dashboard, MyOffer};
pub use ensure_profile::{ensure_profile, ProfileWrite};
pub use update_profile::update_profile;
