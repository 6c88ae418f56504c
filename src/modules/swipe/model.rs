use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::modules::swipe::schema::{MatchEntity, SwipeEntity, SwipeStatus};

/// Canonical order-independent identity of a user pair. Every code path that
/// reads or writes a match must go through this so (A,B) and (B,A) always
/// collide on the same row.
pub fn canonical_pair(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b { (a, b) } else { (b, a) }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SwipeModel {
    pub liked_user_id: Uuid,
    pub action: SwipeStatus,
}

/// Outcome of a match-creation attempt. `AlreadyExists` is the benign result
/// of both sides racing through detection at once, never an error.
#[derive(Debug)]
pub enum MatchCreation {
    Created(MatchEntity),
    AlreadyExists(MatchEntity),
}

impl MatchCreation {
    pub fn into_match(self) -> MatchEntity {
        match self {
            MatchCreation::Created(m) | MatchCreation::AlreadyExists(m) => m,
        }
    }
}

/// Service-level result of a swipe: the recorded decision plus the match
/// detection outcome, still tagged with whether this request created it.
#[derive(Debug)]
pub struct SwipeOutcome {
    pub swipe: SwipeEntity,
    pub match_creation: Option<MatchCreation>,
}

impl SwipeOutcome {
    pub fn match_created(&self) -> bool {
        matches!(self.match_creation, Some(MatchCreation::Created(_)))
    }

    pub fn into_response(self) -> SwipeResponse {
        let match_record = self.match_creation.map(MatchCreation::into_match);
        SwipeResponse { swipe: self.swipe, matched: match_record.is_some(), match_record }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeResponse {
    pub swipe: SwipeEntity,
    pub matched: bool,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_record: Option<MatchEntity>,
}

pub struct NewSwipe {
    pub liker_id: Uuid,
    pub liked_id: Uuid,
    pub status: SwipeStatus,
}

/// One row of the caller's match list: the match joined with the other
/// participant's profile card and the latest message, if any.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetailRow {
    pub match_id: Uuid,
    pub matched_at: chrono::DateTime<chrono::Utc>,
    pub other_user_id: Uuid,
    pub other_username: String,
    pub other_name: String,
    pub other_picture_url: Option<String>,
    pub last_message_content: Option<String>,
    pub last_message_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_pair_orders_both_ways() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        assert_eq!(canonical_pair(a, b), canonical_pair(b, a));

        let (low, high) = canonical_pair(a, b);
        assert!(low <= high);
    }

    #[test]
    fn test_canonical_pair_same_id() {
        let a = Uuid::now_v7();
        assert_eq!(canonical_pair(a, a), (a, a));
    }

    fn outcome(match_creation: Option<MatchCreation>) -> SwipeOutcome {
        let (a, b) = canonical_pair(Uuid::now_v7(), Uuid::now_v7());
        SwipeOutcome {
            swipe: SwipeEntity {
                liker_id: a,
                liked_id: b,
                status: SwipeStatus::Liked,
                created_at: chrono::Utc::now(),
            },
            match_creation,
        }
    }

    fn record() -> MatchEntity {
        let (a, b) = canonical_pair(Uuid::now_v7(), Uuid::now_v7());
        MatchEntity { id: Uuid::now_v7(), user_a: a, user_b: b, created_at: chrono::Utc::now() }
    }

    #[test]
    fn test_outcome_response_carries_match_both_ways() {
        // Created and AlreadyExists serialize identically; only the HTTP
        // status distinguishes them.
        for creation in [MatchCreation::Created(record()), MatchCreation::AlreadyExists(record())]
        {
            let response = outcome(Some(creation)).into_response();
            assert!(response.matched);
            assert!(response.match_record.is_some());
        }

        let response = outcome(None).into_response();
        assert!(!response.matched);
        assert!(response.match_record.is_none());
    }

    #[test]
    fn test_only_created_counts_as_new() {
        assert!(outcome(Some(MatchCreation::Created(record()))).match_created());
        assert!(!outcome(Some(MatchCreation::AlreadyExists(record()))).match_created());
        assert!(!outcome(None).match_created());
    }
}
