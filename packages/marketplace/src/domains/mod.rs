pub mod auth;
pub mod catalog;
pub mod favorites;
pub mod offers;
pub mod profiles;
pub mod requests;
pub mod verification;
