use async_trait::async_trait;
use chrono::{DateTime, Utc};
use learnhub_model::{
    Content, ContentWithProgress, Progress, ProgressStatus, SavedContent,
};
use sqlx::PgPool;
use uuid::Uuid;

use super::rows::{CONTENT_COLUMNS_QUALIFIED, ContentRow, ProgressRow};
use crate::database::ports::saved_content::SavedContentRepository;
use crate::error::{CoreError, Result};

#[derive(Clone, Debug)]
pub struct PostgresSavedContentRepository {
    pool: PgPool,
}

impl PostgresSavedContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(sqlx::FromRow)]
struct SavedContentRow {
    id: Uuid,
    user_id: Uuid,
    content_id: Uuid,
    saved_at: DateTime<Utc>,
}

impl From<SavedContentRow> for SavedContent {
    fn from(row: SavedContentRow) -> Self {
        SavedContent {
            id: row.id,
            user_id: row.user_id,
            content_id: row.content_id,
            saved_at: row.saved_at,
        }
    }
}

/// Saved item joined with its (optional) progress row.
#[derive(sqlx::FromRow)]
struct SavedWithProgressRow {
    #[sqlx(flatten)]
    content: ContentRow,
    progress_id: Option<Uuid>,
    progress_status: Option<ProgressStatus>,
    progress_percentage: Option<i32>,
    progress_last_updated: Option<DateTime<Utc>>,
}

impl SavedWithProgressRow {
    fn into_item(self, user_id: Uuid) -> Result<ContentWithProgress> {
        let content = Content::try_from(self.content)?;
        let progress = match (
            self.progress_id,
            self.progress_status,
            self.progress_percentage,
            self.progress_last_updated,
        ) {
            (Some(id), Some(status), Some(pct), Some(last_updated)) => {
                Some(Progress::try_from(ProgressRow {
                    id,
                    user_id,
                    content_id: content.id,
                    status,
                    progress_percentage: pct,
                    last_updated,
                })?)
            }
            _ => None,
        };

        Ok(ContentWithProgress {
            content,
            progress,
            is_saved: true,
        })
    }
}

#[async_trait]
impl SavedContentRepository for PostgresSavedContentRepository {
    async fn save_content(
        &self,
        user_id: Uuid,
        content_id: Uuid,
    ) -> Result<SavedContent> {
        let row = sqlx::query_as::<_, SavedContentRow>(
            r#"
            INSERT INTO saved_content (user_id, content_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, content_id) DO NOTHING
            RETURNING id, user_id, content_id, saved_at
            "#,
        )
        .bind(user_id)
        .bind(content_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error()
                && db_err.is_foreign_key_violation()
            {
                return CoreError::content_not_found();
            }
            CoreError::Internal(format!("Failed to save content: {}", e))
        })?;

        row.map(SavedContent::from).ok_or(CoreError::AlreadySaved)
    }

    async fn unsave_content(
        &self,
        user_id: Uuid,
        content_id: Uuid,
    ) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM saved_content WHERE user_id = $1 AND content_id = $2",
        )
        .bind(user_id)
        .bind(content_id)
        .execute(self.pool())
        .await
        .map_err(|e| {
            CoreError::Internal(format!("Failed to unsave content: {}", e))
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_saved_content(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ContentWithProgress>> {
        let rows = sqlx::query_as::<_, SavedWithProgressRow>(&format!(
            r#"
            SELECT
                {CONTENT_COLUMNS_QUALIFIED},
                p.id AS progress_id,
                p.status AS progress_status,
                p.progress_percentage AS progress_percentage,
                p.last_updated AS progress_last_updated
            FROM saved_content s
            JOIN content c ON c.id = s.content_id
            LEFT JOIN progress p
                ON p.content_id = s.content_id AND p.user_id = s.user_id
            WHERE s.user_id = $1
            ORDER BY s.saved_at DESC, s.id
            "#
        ))
        .bind(user_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            CoreError::Internal(format!("Failed to load saved content: {}", e))
        })?;

        rows.into_iter().map(|row| row.into_item(user_id)).collect()
    }

    async fn is_content_saved(
        &self,
        user_id: Uuid,
        content_id: Uuid,
    ) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM saved_content
                WHERE user_id = $1 AND content_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(content_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            CoreError::Internal(format!("Failed to check saved state: {}", e))
        })
    }

    async fn saved_content_ids(
        &self,
        user_id: Uuid,
        content_ids: &[Uuid],
    ) -> Result<Vec<Uuid>> {
        if content_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT content_id FROM saved_content
            WHERE user_id = $1 AND content_id = ANY($2)
            "#,
        )
        .bind(user_id)
        .bind(content_ids)
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            CoreError::Internal(format!("Failed to load saved ids: {}", e))
        })
    }

    async fn count_saved(&self, user_id: Uuid) -> Result<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM saved_content WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            CoreError::Internal(format!("Failed to count saved content: {}", e))
        })?;

        Ok(count.max(0) as u64)
    }
}
