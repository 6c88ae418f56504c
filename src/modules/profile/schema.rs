use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEntity {
    pub user_id: Uuid,
    pub name: String,
    pub bio: String,
    pub picture_url: Option<String>,
    pub gender: String,
    pub interests: Vec<String>,
    pub birth_date: chrono::NaiveDate,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
