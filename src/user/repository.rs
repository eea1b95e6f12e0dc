//! Handle database requests for users.

use sqlx::SqlitePool;

use crate::error::{Result, ServerError};
use crate::user::User;

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new [`UserRepository`].
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert [`User`] into database. A duplicate email, racing past the
    /// handler's own uniqueness check, is mapped to a conflict.
    pub async fn insert(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO users (id, name, email, password, bio, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.bio)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|err| match err.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                ServerError::Conflict("Email is already registered")
            },
            _ => ServerError::Sql(err),
        })?;

        Ok(())
    }

    /// Find a user using the `id` field.
    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<User>> {
        let user =
            sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = $1"#)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }

    /// Find a user using the `email` field. Callers must lowercase the email
    /// beforehand; storage is case-normalized.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT * FROM users WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update the owner-mutable profile fields.
    pub async fn update_profile(
        &self,
        user_id: &str,
        name: &str,
        bio: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"UPDATE users SET name = $1, bio = $2 WHERE id = $3"#,
        )
        .bind(name)
        .bind(bio)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
