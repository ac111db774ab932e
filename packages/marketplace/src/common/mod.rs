pub mod entity_ids;
pub mod error_messages;
pub mod id;
pub mod secret;
pub mod text;
pub mod time_ago;

pub use entity_ids::*;
pub use error_messages::translate_gateway_message;
pub use secret::SecretToken;
pub use text::{is_blank, non_blank};
pub use time_ago::time_ago;
