use uuid::Uuid;

use crate::{
    api::error,
    modules::swipe::{
        model::{MatchDetailRow, NewSwipe},
        repository::{MatchRepository, SwipeRepository},
        schema::{MatchEntity, SwipeEntity},
    },
};

#[derive(Clone)]
pub struct SwipeRepositoryPg {
    pool: sqlx::PgPool,
}

impl SwipeRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SwipeRepository for SwipeRepositoryPg {
    async fn find_swipe(
        &self,
        liker_id: &Uuid,
        liked_id: &Uuid,
    ) -> Result<Option<SwipeEntity>, error::SystemError> {
        let swipe = sqlx::query_as::<_, SwipeEntity>(
            "SELECT * FROM swipes WHERE liker_id = $1 AND liked_id = $2",
        )
        .bind(liker_id)
        .bind(liked_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(swipe)
    }

    async fn create(&self, swipe: &NewSwipe) -> Result<SwipeEntity, error::SystemError> {
        let entity = sqlx::query_as::<_, SwipeEntity>(
            r#"
            INSERT INTO swipes (liker_id, liked_id, status)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(swipe.liker_id)
        .bind(swipe.liked_id)
        .bind(swipe.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity)
    }
}

#[derive(Clone)]
pub struct MatchRepositoryPg {
    pool: sqlx::PgPool,
}

impl MatchRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MatchRepository for MatchRepositoryPg {
    async fn find_by_id(
        &self,
        match_id: &Uuid,
    ) -> Result<Option<MatchEntity>, error::SystemError> {
        let record = sqlx::query_as::<_, MatchEntity>("SELECT * FROM matches WHERE id = $1")
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    async fn find_by_pair(
        &self,
        user_a: &Uuid,
        user_b: &Uuid,
    ) -> Result<Option<MatchEntity>, error::SystemError> {
        let record = sqlx::query_as::<_, MatchEntity>(
            "SELECT * FROM matches WHERE user_a = $1 AND user_b = $2",
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn try_create(
        &self,
        user_a: &Uuid,
        user_b: &Uuid,
    ) -> Result<Option<MatchEntity>, error::SystemError> {
        let id = Uuid::now_v7();

        // ON CONFLICT DO NOTHING + RETURNING: no row back means the unique
        // constraint arbitrated a concurrent creation and the other writer won.
        let record = sqlx::query_as::<_, MatchEntity>(
            r#"
            INSERT INTO matches (id, user_a, user_b)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_a, user_b) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_a)
        .bind(user_b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_matches_for(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<MatchDetailRow>, error::SystemError> {
        let rows = sqlx::query_as::<_, MatchDetailRow>(
            r#"
            SELECT
                m.id AS match_id,
                m.created_at AS matched_at,
                u.id AS other_user_id,
                u.username AS other_username,
                COALESCE(p.name, u.username) AS other_name,
                p.picture_url AS other_picture_url,
                lm.content AS last_message_content,
                lm.created_at AS last_message_at
            FROM matches m
            JOIN users u
                ON u.id = CASE WHEN m.user_a = $1 THEN m.user_b ELSE m.user_a END
            LEFT JOIN profiles p ON p.user_id = u.id
            LEFT JOIN LATERAL (
                SELECT content, created_at
                FROM messages
                WHERE match_id = m.id
                ORDER BY created_at DESC, id DESC
                LIMIT 1
            ) lm ON true
            WHERE m.user_a = $1 OR m.user_b = $1
            ORDER BY COALESCE(lm.created_at, m.created_at) DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
