use actix::Addr;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error::{self, DbErrorMeta};
use crate::modules::profile::{model::ProfileCard, repository::ProfileRepository};
use crate::modules::realtime::events::SendToUser;
use crate::modules::realtime::message::{MatchedUser, ServerMessage};
use crate::modules::realtime::server::RealtimeServer;
use crate::modules::swipe::model::{
    MatchCreation, MatchDetailRow, NewSwipe, SwipeModel, SwipeOutcome, canonical_pair,
};
use crate::modules::swipe::repository::{MatchRepository, SwipeRepository};
use crate::modules::swipe::schema::{MatchEntity, SwipeStatus};

#[derive(Clone)]
pub struct SwipeService<S, M, P>
where
    S: SwipeRepository + Send + Sync,
    M: MatchRepository + Send + Sync,
    P: ProfileRepository + Send + Sync,
{
    swipe_repo: Arc<S>,
    match_repo: Arc<M>,
    profile_repo: Arc<P>,
    ws_server: Arc<Addr<RealtimeServer>>,
}

impl<S, M, P> SwipeService<S, M, P>
where
    S: SwipeRepository + Send + Sync,
    M: MatchRepository + Send + Sync,
    P: ProfileRepository + Send + Sync,
{
    pub fn with_dependencies(
        swipe_repo: Arc<S>,
        match_repo: Arc<M>,
        profile_repo: Arc<P>,
        ws_server: Arc<Addr<RealtimeServer>>,
    ) -> Self {
        SwipeService { swipe_repo, match_repo, profile_repo, ws_server }
    }

    /// Records a swipe decision and, for a like, runs match detection.
    ///
    /// The decision is permanent: a second swipe on the same profile gets
    /// `Conflict` — checked optimistically here, enforced by the composite
    /// primary key under concurrency.
    pub async fn swipe(
        &self,
        liker_id: Uuid,
        model: SwipeModel,
    ) -> Result<SwipeOutcome, error::SystemError> {
        if liker_id == model.liked_user_id {
            return Err(error::SystemError::bad_request("You cannot swipe on yourself"));
        }

        if self.profile_repo.find_card_by_user(&model.liked_user_id).await?.is_none() {
            return Err(error::SystemError::not_found("Profile not found"));
        }

        if self.swipe_repo.find_swipe(&liker_id, &model.liked_user_id).await?.is_some() {
            return Err(error::SystemError::Conflict(Some(DbErrorMeta {
                code: None,
                constraint: Some("swipes_pkey".to_string()),
                message: "swipe already recorded for this pair".to_string(),
            })));
        }

        let swipe = self
            .swipe_repo
            .create(&NewSwipe {
                liker_id,
                liked_id: model.liked_user_id,
                status: model.action,
            })
            .await?;

        if swipe.status == SwipeStatus::Disliked {
            // A dislike never triggers detection, and permanently forecloses
            // a match for this pair: no decision-change path exists.
            log::debug!("User {} disliked user {}", liker_id, model.liked_user_id);
            return Ok(SwipeOutcome { swipe, match_creation: None });
        }

        let match_creation = self.on_liked(liker_id, model.liked_user_id).await?;

        if let Some(MatchCreation::Created(record)) = &match_creation {
            log::info!(
                "Match {} created for users {} and {}",
                record.id,
                record.user_a,
                record.user_b
            );
            self.notify_new_match(record).await;
        }
        // AlreadyExists is the benign race where the mirroring request created
        // the match first: same match comes back, no second notification.

        Ok(SwipeOutcome { swipe, match_creation })
    }

    /// Match detection for a freshly recorded like.
    ///
    /// Returns `None` for a one-sided like. Both racing callers converge on
    /// the same match identity; the unique constraint on the canonical pair
    /// picks the single winner.
    pub(crate) async fn on_liked(
        &self,
        liker_id: Uuid,
        liked_id: Uuid,
    ) -> Result<Option<MatchCreation>, error::SystemError> {
        let mirror = self.swipe_repo.find_swipe(&liked_id, &liker_id).await?;

        match mirror {
            Some(swipe) if swipe.status == SwipeStatus::Liked => {}
            _ => return Ok(None),
        }

        let (low, high) = canonical_pair(liker_id, liked_id);

        if let Some(existing) = self.match_repo.find_by_pair(&low, &high).await? {
            return Ok(Some(MatchCreation::AlreadyExists(existing)));
        }

        match self.match_repo.try_create(&low, &high).await? {
            Some(created) => Ok(Some(MatchCreation::Created(created))),
            None => {
                // Lost the creation race; the winner's row must exist now.
                let existing =
                    self.match_repo.find_by_pair(&low, &high).await?.ok_or_else(|| {
                        error::SystemError::DatabaseError(
                            "match row missing after conflicting insert".into(),
                        )
                    })?;
                Ok(Some(MatchCreation::AlreadyExists(existing)))
            }
        }
    }

    /// Fire-and-forget push to both participants. Never fails the request:
    /// the match is already durable and the match list stays authoritative
    /// for anyone offline right now.
    async fn notify_new_match(&self, record: &MatchEntity) {
        let card_a = self.profile_repo.find_card_by_user(&record.user_a).await.unwrap_or(None);
        let card_b = self.profile_repo.find_card_by_user(&record.user_b).await.unwrap_or(None);

        let user_a = matched_user(record.user_a, card_a);
        let user_b = matched_user(record.user_b, card_b);

        self.ws_server.do_send(SendToUser {
            user_id: record.user_a,
            message: ServerMessage::NewMatch {
                match_id: record.id,
                message: format!("You have a new match with {}!", user_b.display_name),
                other_user: user_b,
            },
        });

        self.ws_server.do_send(SendToUser {
            user_id: record.user_b,
            message: ServerMessage::NewMatch {
                match_id: record.id,
                message: format!("You have a new match with {}!", user_a.display_name),
                other_user: user_a,
            },
        });
    }

    pub async fn get_matches(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<MatchDetailRow>, error::SystemError> {
        self.match_repo.find_matches_for(&user_id).await
    }
}

fn matched_user(user_id: Uuid, card: Option<ProfileCard>) -> MatchedUser {
    match card {
        Some(card) => MatchedUser {
            id: user_id,
            display_name: card.name,
            picture_url: card.picture_url,
        },
        None => MatchedUser { id: user_id, display_name: "A user".to_string(), picture_url: None },
    }
}
