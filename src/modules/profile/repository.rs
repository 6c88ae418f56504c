use uuid::Uuid;

use crate::{
    api::error,
    modules::profile::{
        model::{ProfileCard, UpsertProfile},
        schema::ProfileEntity,
    },
};

#[async_trait::async_trait]
pub trait ProfileRepository {
    async fn find_by_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Option<ProfileEntity>, error::SystemError>;

    async fn find_card_by_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Option<ProfileCard>, error::SystemError>;

    async fn upsert(&self, profile: &UpsertProfile) -> Result<ProfileEntity, error::SystemError>;

    /// Random profiles the user has not yet swiped on, excluding the user.
    async fn find_undecided(
        &self,
        user_id: &Uuid,
        limit: i64,
    ) -> Result<Vec<ProfileCard>, error::SystemError>;

    /// Profiles the user has liked.
    async fn find_liked_by(&self, user_id: &Uuid)
    -> Result<Vec<ProfileCard>, error::SystemError>;

    /// Profiles of users who liked this user and are still undecided-on.
    async fn find_likers_of(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<ProfileCard>, error::SystemError>;
}
