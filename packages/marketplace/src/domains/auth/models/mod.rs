mod registration;
mod session;
mod user;

pub use registration::Registration;
pub use session::AuthContext;
pub use user::{Session, SignUp, User};
