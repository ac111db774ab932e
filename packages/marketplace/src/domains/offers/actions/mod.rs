//! Offer domain actions

mod delete_offer;
mod submit_offer;

pub use delete_offer::delete_offer;
pub use submit_offer::submit_offer;
