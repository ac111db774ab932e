mod favorite;

pub use favorite::{Favorite, FavoriteToggle, NewFavorite};
