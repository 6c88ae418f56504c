use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// A chat message inside a match. `is_read` flips when the other participant
/// fetches the conversation; it never flips back.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MessageEntity {
    pub id: Uuid,
    pub match_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
