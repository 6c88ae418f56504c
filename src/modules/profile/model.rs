use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProfileModel {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: String,
    pub picture_url: Option<String>,
    #[validate(length(min = 1, message = "Gender cannot be empty"))]
    pub gender: String,
    pub interests: Vec<String>,
    pub birth_date: chrono::NaiveDate,
}

pub struct UpsertProfile {
    pub user_id: Uuid,
    pub name: String,
    pub bio: String,
    pub picture_url: Option<String>,
    pub gender: String,
    pub interests: Vec<String>,
    pub birth_date: chrono::NaiveDate,
}

/// Profile joined with the owning user's public identity attributes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCard {
    pub user_id: Uuid,
    pub username: String,
    pub name: String,
    pub bio: String,
    pub picture_url: Option<String>,
    pub gender: String,
    pub interests: Vec<String>,
    pub birth_date: chrono::NaiveDate,
}
