use uuid::Uuid;

use crate::{
    api::error,
    modules::profile::{
        model::{ProfileCard, UpsertProfile},
        repository::ProfileRepository,
        schema::ProfileEntity,
    },
};

#[derive(Clone)]
pub struct ProfileRepositoryPg {
    pool: sqlx::PgPool,
}

impl ProfileRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

const CARD_COLUMNS: &str = r#"
    p.user_id,
    u.username,
    p.name,
    p.bio,
    p.picture_url,
    p.gender,
    p.interests,
    p.birth_date
"#;

#[async_trait::async_trait]
impl ProfileRepository for ProfileRepositoryPg {
    async fn find_by_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Option<ProfileEntity>, error::SystemError> {
        let profile =
            sqlx::query_as::<_, ProfileEntity>("SELECT * FROM profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(profile)
    }

    async fn find_card_by_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Option<ProfileCard>, error::SystemError> {
        let card = sqlx::query_as::<_, ProfileCard>(&format!(
            r#"
            SELECT {CARD_COLUMNS}
            FROM profiles p
            JOIN users u ON u.id = p.user_id
            WHERE p.user_id = $1
            "#
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(card)
    }

    async fn upsert(&self, profile: &UpsertProfile) -> Result<ProfileEntity, error::SystemError> {
        let entity = sqlx::query_as::<_, ProfileEntity>(
            r#"
            INSERT INTO profiles (user_id, name, bio, picture_url, gender, interests, birth_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE SET
                name        = EXCLUDED.name,
                bio         = EXCLUDED.bio,
                picture_url = COALESCE(EXCLUDED.picture_url, profiles.picture_url),
                gender      = EXCLUDED.gender,
                interests   = EXCLUDED.interests,
                birth_date  = EXCLUDED.birth_date,
                updated_at  = NOW()
            RETURNING *
            "#,
        )
        .bind(profile.user_id)
        .bind(&profile.name)
        .bind(&profile.bio)
        .bind(&profile.picture_url)
        .bind(&profile.gender)
        .bind(&profile.interests)
        .bind(profile.birth_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(entity)
    }

    async fn find_undecided(
        &self,
        user_id: &Uuid,
        limit: i64,
    ) -> Result<Vec<ProfileCard>, error::SystemError> {
        let cards = sqlx::query_as::<_, ProfileCard>(&format!(
            r#"
            SELECT {CARD_COLUMNS}
            FROM profiles p
            JOIN users u ON u.id = p.user_id
            WHERE p.user_id <> $1
              AND NOT EXISTS (
                  SELECT 1 FROM swipes s
                  WHERE s.liker_id = $1 AND s.liked_id = p.user_id
              )
            ORDER BY random()
            LIMIT $2
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(cards)
    }

    async fn find_liked_by(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<ProfileCard>, error::SystemError> {
        let cards = sqlx::query_as::<_, ProfileCard>(&format!(
            r#"
            SELECT {CARD_COLUMNS}
            FROM swipes s
            JOIN profiles p ON p.user_id = s.liked_id
            JOIN users u ON u.id = p.user_id
            WHERE s.liker_id = $1 AND s.status = 'liked'
            ORDER BY s.created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(cards)
    }

    async fn find_likers_of(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<ProfileCard>, error::SystemError> {
        // Hide likers the user has already decided on, either direction.
        let cards = sqlx::query_as::<_, ProfileCard>(&format!(
            r#"
            SELECT {CARD_COLUMNS}
            FROM swipes s
            JOIN profiles p ON p.user_id = s.liker_id
            JOIN users u ON u.id = p.user_id
            WHERE s.liked_id = $1
              AND s.status = 'liked'
              AND NOT EXISTS (
                  SELECT 1 FROM swipes mine
                  WHERE mine.liker_id = $1 AND mine.liked_id = s.liker_id
              )
            ORDER BY s.created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(cards)
    }
}
