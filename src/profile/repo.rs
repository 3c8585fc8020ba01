use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// One-to-one extension record of a user. `avatar` is the object
/// storage key of the uploaded image.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub city: String,
    pub gender: String,
    pub avatar: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Profile {
    pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, user_id, city, gender, avatar, created_at, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(profile)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        city: &str,
        gender: &str,
        avatar: &str,
    ) -> anyhow::Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (user_id, city, gender, avatar)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, city, gender, avatar, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(city)
        .bind(gender)
        .bind(avatar)
        .fetch_one(db)
        .await?;
        Ok(profile)
    }

    /// Update city and gender; the avatar key only when a new one is
    /// supplied (NULL keeps the stored key).
    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        city: &str,
        gender: &str,
        avatar: Option<&str>,
    ) -> anyhow::Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET city = $2, gender = $3, avatar = COALESCE($4, avatar), updated_at = now()
            WHERE user_id = $1
            RETURNING id, user_id, city, gender, avatar, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(city)
        .bind(gender)
        .bind(avatar)
        .fetch_one(db)
        .await?;
        Ok(profile)
    }
}
