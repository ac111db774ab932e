pub mod actions;
pub mod models;

pub use actions::submit_offer;
pub use models::{Offer, OfferForm};
