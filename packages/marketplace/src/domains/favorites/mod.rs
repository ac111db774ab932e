pub mod actions;
pub mod models;

pub use actions::toggle;
pub use models::FavoriteToggle;
