mod toggle;

pub use toggle::{toggle, toggle_favorite};
