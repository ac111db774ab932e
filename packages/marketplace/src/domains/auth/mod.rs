pub mod actions;
pub mod models;

pub use models::{AuthContext, Registration, Session, User};
