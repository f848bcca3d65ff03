use async_trait::async_trait;
use learnhub_model::{Progress, ProgressPercentage, ProgressStatus};
use sqlx::PgPool;
use uuid::Uuid;

use super::rows::{PROGRESS_COLUMNS, ProgressRow, collect_progress};
use crate::database::ports::progress::ProgressRepository;
use crate::error::{CoreError, Result};

#[derive(Clone, Debug)]
pub struct PostgresProgressRepository {
    pool: PgPool,
}

impl PostgresProgressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProgressRepository for PostgresProgressRepository {
    async fn update_progress(
        &self,
        user_id: Uuid,
        content_id: Uuid,
        status: ProgressStatus,
        percentage: ProgressPercentage,
    ) -> Result<Progress> {
        let row = sqlx::query_as::<_, ProgressRow>(&format!(
            r#"
            INSERT INTO progress (user_id, content_id, status, progress_percentage)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, content_id) DO UPDATE SET
                status = EXCLUDED.status,
                progress_percentage = EXCLUDED.progress_percentage,
                last_updated = NOW()
            RETURNING {PROGRESS_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(content_id)
        .bind(status)
        .bind(i32::from(percentage))
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error()
                && db_err.is_foreign_key_violation()
            {
                return CoreError::content_not_found();
            }
            CoreError::Internal(format!("Failed to update progress: {}", e))
        })?;

        row.try_into()
    }

    async fn get_user_progress(&self, user_id: Uuid) -> Result<Vec<Progress>> {
        let rows = sqlx::query_as::<_, ProgressRow>(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM progress WHERE user_id = $1 \
             ORDER BY last_updated DESC, id"
        ))
        .bind(user_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            CoreError::Internal(format!("Failed to load progress: {}", e))
        })?;

        collect_progress(rows)
    }

    async fn get_content_progress(
        &self,
        user_id: Uuid,
        content_id: Uuid,
    ) -> Result<Option<Progress>> {
        let row = sqlx::query_as::<_, ProgressRow>(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM progress \
             WHERE user_id = $1 AND content_id = $2"
        ))
        .bind(user_id)
        .bind(content_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            CoreError::Internal(format!(
                "Failed to load content progress: {}",
                e
            ))
        })?;

        row.map(Progress::try_from).transpose()
    }

    async fn get_progress_for_contents(
        &self,
        user_id: Uuid,
        content_ids: &[Uuid],
    ) -> Result<Vec<Progress>> {
        if content_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ProgressRow>(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM progress \
             WHERE user_id = $1 AND content_id = ANY($2)"
        ))
        .bind(user_id)
        .bind(content_ids)
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            CoreError::Internal(format!("Failed to load progress batch: {}", e))
        })?;

        collect_progress(rows)
    }
}
