use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::message::schema::MessageEntity;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageModel {
    #[validate(length(min = 1, message = "Message content cannot be empty"))]
    pub content: String,
    /// Client-side correlation token, echoed back verbatim so the sender can
    /// reconcile the optimistic message with the stored one.
    #[validate(length(min = 1, message = "tempId is required"))]
    pub temp_id: String,
}

/// Stored message plus the sender's correlation token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageWithTemp {
    #[serde(flatten)]
    pub message: MessageEntity,
    pub temp_id: String,
}

pub struct NewMessage {
    pub match_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
}
