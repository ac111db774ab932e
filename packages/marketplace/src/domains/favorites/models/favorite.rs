use serde::{Deserialize, Serialize};

use crate::common::{FavoriteId, RequestId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub request_id: RequestId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NewFavorite {
    pub user_id: UserId,
    pub request_id: RequestId,
}

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteToggle {
    Added,
    Removed,
}

impl FavoriteToggle {
    /// Whether the request is a favorite after the toggle.
    pub fn is_favorite(self) -> bool {
        matches!(self, FavoriteToggle::Added)
    }

    pub fn message(self) -> &'static str {
        match self {
            FavoriteToggle::Added => "Добавлено в избранное",
            FavoriteToggle::Removed => "Удалено из избранного",
        }
    }
}
