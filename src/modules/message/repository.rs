use uuid::Uuid;

use crate::{
    api::error,
    modules::message::{model::NewMessage, schema::MessageEntity},
};

#[async_trait::async_trait]
pub trait MessageRepository {
    async fn create(&self, message: &NewMessage) -> Result<MessageEntity, error::SystemError>;

    /// Full conversation in creation order (created_at, then id as the
    /// tie-breaker for equal timestamps).
    async fn find_by_match(
        &self,
        match_id: &Uuid,
    ) -> Result<Vec<MessageEntity>, error::SystemError>;

    /// Marks every unread message in the match NOT sent by `viewer_id` as
    /// read. Returns the number of rows flipped.
    async fn mark_read_from_others(
        &self,
        match_id: &Uuid,
        viewer_id: &Uuid,
    ) -> Result<u64, error::SystemError>;
}
