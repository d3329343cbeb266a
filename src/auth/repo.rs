use anyhow::Context;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>, // absent for GitHub-only accounts
    #[serde(skip_serializing)]
    pub github_token: Option<String>,
    pub profile_complete: bool,
    pub created_at: OffsetDateTime,
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, github_token, profile_complete, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a password-backed account. One transaction per create.
    pub async fn create_local(
        db: &PgPool,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let mut tx = db.begin().await.context("begin tx")?;
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, github_token, profile_complete, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await.context("commit tx")?;
        Ok(user)
    }

    /// Create a GitHub-linked account with no password hash.
    pub async fn create_github(
        db: &PgPool,
        email: &str,
        github_token: &str,
    ) -> anyhow::Result<User> {
        let mut tx = db.begin().await.context("begin tx")?;
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, github_token)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, github_token, profile_complete, created_at
            "#,
        )
        .bind(email)
        .bind(github_token)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await.context("commit tx")?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@b.com".into(),
            password_hash: Some("$argon2id$...".into()),
            github_token: Some("gho_secret".into()),
            profile_complete: false,
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("gho_secret"));
        assert!(json.contains("a@b.com"));
    }
}
