//! Request domain actions

mod browse;
mod create_request;
mod delete_request;
mod request_detail;

pub use browse::browse_requests;
pub use create_request::create_request;
pub(crate) use create_request::insert_request;
pub use delete_request::delete_request;
pub use request_detail::{load_request_detail, RequestDetail};
