//! Typed ids for every marketplace table.

pub use super::id::Id;

/// Marker for auth users (and their one-to-one profiles).
pub struct User;

/// Marker for buyer requests.
pub struct MarketRequest;

/// Marker for seller offers.
pub struct Offer;

/// Marker for favorite rows.
pub struct Favorite;

pub type UserId = Id<User>;
pub type RequestId = Id<MarketRequest>;
pub type OfferId = Id<Offer>;
pub type FavoriteId = Id<Favorite>;
