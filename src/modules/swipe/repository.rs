use uuid::Uuid;

use crate::{
    api::error,
    modules::swipe::{
        model::{MatchDetailRow, NewSwipe},
        schema::{MatchEntity, SwipeEntity},
    },
};

#[async_trait::async_trait]
pub trait SwipeRepository {
    async fn find_swipe(
        &self,
        liker_id: &Uuid,
        liked_id: &Uuid,
    ) -> Result<Option<SwipeEntity>, error::SystemError>;

    /// Inserts the swipe. The composite primary key is the authoritative
    /// guard: a concurrent duplicate gets `Conflict`, never a second row.
    async fn create(&self, swipe: &NewSwipe) -> Result<SwipeEntity, error::SystemError>;
}

#[async_trait::async_trait]
pub trait MatchRepository {
    async fn find_by_id(
        &self,
        match_id: &Uuid,
    ) -> Result<Option<MatchEntity>, error::SystemError>;

    /// Expects the canonical pair (low, high).
    async fn find_by_pair(
        &self,
        user_a: &Uuid,
        user_b: &Uuid,
    ) -> Result<Option<MatchEntity>, error::SystemError>;

    /// Conditional insert for the canonical pair. Returns `None` when the
    /// unique constraint swallowed the insert (a concurrent creator won).
    async fn try_create(
        &self,
        user_a: &Uuid,
        user_b: &Uuid,
    ) -> Result<Option<MatchEntity>, error::SystemError>;

    async fn find_matches_for(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<MatchDetailRow>, error::SystemError>;
}
