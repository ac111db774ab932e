//! Auth domain actions - business logic functions
//!
//! Every action takes the caller's `AuthContext` explicitly.

mod login_code;
mod register;
mod sign_in;
mod sign_out;

pub use login_code::{send_login_code, verify_login_code, LoginOutcome};
pub use register::{register_and_publish, RegistrationOutcome};
pub use sign_in::{exchange_oauth_code, sign_in_with_password};
pub use sign_out::sign_out;
