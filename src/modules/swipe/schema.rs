use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "swipe_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SwipeStatus {
    Liked,
    Disliked,
}

/// One directional swipe decision. Immutable: there is no update or delete
/// path, and the (liker_id, liked_id) primary key forbids a second decision.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SwipeEntity {
    pub liker_id: Uuid,
    pub liked_id: Uuid,
    pub status: SwipeStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A mutually-confirmed pairing. (user_a, user_b) is the canonical pair
/// (user_a < user_b), unique per unordered pair of users.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MatchEntity {
    pub id: Uuid,
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl MatchEntity {
    pub fn involves(&self, user_id: &Uuid) -> bool {
        self.user_a == *user_id || self.user_b == *user_id
    }

    pub fn other_user(&self, user_id: &Uuid) -> Uuid {
        if self.user_a == *user_id { self.user_b } else { self.user_a }
    }
}
