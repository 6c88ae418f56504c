use std::sync::Arc;
use uuid::Uuid;

use crate::{
    api::error,
    modules::profile::{
        model::{ProfileCard, UpsertProfile, UpsertProfileModel},
        repository::ProfileRepository,
        schema::ProfileEntity,
    },
};

const DISCOVER_BATCH_SIZE: i64 = 10;

#[derive(Clone)]
pub struct ProfileService<P>
where
    P: ProfileRepository + Send + Sync,
{
    profile_repo: Arc<P>,
}

impl<P> ProfileService<P>
where
    P: ProfileRepository + Send + Sync,
{
    pub fn with_dependencies(profile_repo: Arc<P>) -> Self {
        ProfileService { profile_repo }
    }

    pub async fn upsert_profile(
        &self,
        user_id: Uuid,
        model: UpsertProfileModel,
    ) -> Result<ProfileEntity, error::SystemError> {
        let profile = UpsertProfile {
            user_id,
            name: model.name,
            bio: model.bio,
            picture_url: model.picture_url,
            gender: model.gender,
            interests: model.interests,
            birth_date: model.birth_date,
        };

        self.profile_repo.upsert(&profile).await
    }

    pub async fn get_own_profile(
        &self,
        user_id: Uuid,
    ) -> Result<ProfileCard, error::SystemError> {
        self.profile_repo
            .find_card_by_user(&user_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Profile not found"))
    }

    /// Random batch of profiles the user has not swiped on yet.
    pub async fn discover(&self, user_id: Uuid) -> Result<Vec<ProfileCard>, error::SystemError> {
        let cards = self.profile_repo.find_undecided(&user_id, DISCOVER_BATCH_SIZE).await?;

        if cards.is_empty() {
            return Err(error::SystemError::not_found(
                "No more profiles found. Check back later!",
            ));
        }

        Ok(cards)
    }

    pub async fn liked_profiles(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ProfileCard>, error::SystemError> {
        self.profile_repo.find_liked_by(&user_id).await
    }

    pub async fn profiles_that_liked_me(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ProfileCard>, error::SystemError> {
        self.profile_repo.find_likers_of(&user_id).await
    }
}
