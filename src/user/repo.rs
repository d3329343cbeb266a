use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::user::dto::CompleteProfileRequest;

/// Profile row, one per user, created lazily on completion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub student: bool,
    pub fresher: bool,
    pub yoe: i32,
    pub college: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub created_at: OffsetDateTime,
}

impl UserProfile {
    pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT user_id, first_name, last_name, bio, profile_picture_url, github_url,
                   linkedin_url, student, fresher, yoe, college, city, country, created_at
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(profile)
    }

    /// Insert or replace the caller's profile inside an open transaction.
    pub async fn upsert_tx(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        body: &CompleteProfileRequest,
    ) -> anyhow::Result<UserProfile> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO user_profiles
                (user_id, first_name, last_name, bio, profile_picture_url, github_url,
                 linkedin_url, student, fresher, yoe, college, city, country)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (user_id) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                bio = EXCLUDED.bio,
                profile_picture_url = EXCLUDED.profile_picture_url,
                github_url = EXCLUDED.github_url,
                linkedin_url = EXCLUDED.linkedin_url,
                student = EXCLUDED.student,
                fresher = EXCLUDED.fresher,
                yoe = EXCLUDED.yoe,
                college = EXCLUDED.college,
                city = EXCLUDED.city,
                country = EXCLUDED.country
            RETURNING user_id, first_name, last_name, bio, profile_picture_url, github_url,
                      linkedin_url, student, fresher, yoe, college, city, country, created_at
            "#,
        )
        .bind(user_id)
        .bind(&body.first_name)
        .bind(&body.last_name)
        .bind(&body.bio)
        .bind(&body.profile_picture_url)
        .bind(&body.github_url)
        .bind(&body.linkedin_url)
        .bind(body.student)
        .bind(body.fresher)
        .bind(body.yoe)
        .bind(&body.college)
        .bind(&body.city)
        .bind(&body.country)
        .fetch_one(&mut **tx)
        .await?;
        Ok(profile)
    }
}

pub async fn mark_profile_complete_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> anyhow::Result<()> {
    sqlx::query("UPDATE users SET profile_complete = TRUE WHERE id = $1")
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
