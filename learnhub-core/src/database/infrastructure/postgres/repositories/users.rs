use async_trait::async_trait;
use chrono::{DateTime, Utc};
use learnhub_model::{NewUser, User};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::database::ports::users::UsersRepository;
use crate::error::{CoreError, Result};

/// PostgreSQL-backed implementation of the `UsersRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresUsersRepository {
    pool: PgPool,
}

impl PostgresUsersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UsersRepository for PostgresUsersRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to load user: {}", e)))?;

        Ok(row.map(User::from))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            CoreError::Internal(format!("Failed to load user by email: {}", e))
        })?;

        Ok(row.map(User::from))
    }

    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            RETURNING id, name, email, created_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error()
                && db_err.is_unique_violation()
            {
                return CoreError::InvalidInput(format!(
                    "Email {} already exists",
                    user.email
                ));
            }
            CoreError::Internal(format!("Failed to create user: {}", e))
        })?;

        Ok(row.into())
    }

    async fn ensure_user(&self, user: &NewUser) -> Result<User> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
            RETURNING id, name, email, created_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .fetch_one(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to ensure user: {}", e)))?;

        info!(user_id = %row.id, email = %row.email, "user ensured");
        Ok(row.into())
    }
}
