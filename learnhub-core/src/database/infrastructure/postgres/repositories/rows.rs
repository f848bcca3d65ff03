//! Row shapes shared by the PostgreSQL repositories.

use chrono::{DateTime, Utc};
use learnhub_model::{
    Category, Content, ContentType, Progress, ProgressPercentage,
    ProgressStatus, Rating,
};
use uuid::Uuid;

use crate::error::{CoreError, Result};

/// Column list matching [`ContentRow`]. `rating` is read as `float8` since
/// the column is `NUMERIC(3,2)`.
pub(crate) const CONTENT_COLUMNS: &str = "id, title, description, url, \
    image_url, source, external_id, content_type, category, \
    rating::float8 AS rating, author, created_at";

/// Same as [`CONTENT_COLUMNS`] qualified with the `c` alias.
pub(crate) const CONTENT_COLUMNS_QUALIFIED: &str = "c.id, c.title, \
    c.description, c.url, c.image_url, c.source, c.external_id, \
    c.content_type, c.category, c.rating::float8 AS rating, c.author, \
    c.created_at";

pub(crate) const PROGRESS_COLUMNS: &str =
    "id, user_id, content_id, status, progress_percentage, last_updated";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ContentRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub source: String,
    pub external_id: Option<String>,
    pub content_type: ContentType,
    pub category: Option<Category>,
    pub rating: Option<f64>,
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ContentRow> for Content {
    type Error = CoreError;

    fn try_from(row: ContentRow) -> Result<Self> {
        let rating = row
            .rating
            .map(Rating::from_f64)
            .transpose()
            .map_err(|e| {
                CoreError::Internal(format!(
                    "Stored rating for content {} is invalid: {}",
                    row.id, e
                ))
            })?;

        Ok(Content {
            id: row.id,
            title: row.title,
            description: row.description,
            url: row.url,
            image_url: row.image_url,
            source: row.source,
            external_id: row.external_id,
            content_type: row.content_type,
            category: row.category,
            rating,
            author: row.author,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProgressRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content_id: Uuid,
    pub status: ProgressStatus,
    pub progress_percentage: i32,
    pub last_updated: DateTime<Utc>,
}

impl TryFrom<ProgressRow> for Progress {
    type Error = CoreError;

    fn try_from(row: ProgressRow) -> Result<Self> {
        let progress_percentage =
            ProgressPercentage::new(i64::from(row.progress_percentage))
                .map_err(|e| {
                    CoreError::Internal(format!(
                        "Stored progress {} is invalid: {}",
                        row.id, e
                    ))
                })?;

        Ok(Progress {
            id: row.id,
            user_id: row.user_id,
            content_id: row.content_id,
            status: row.status,
            progress_percentage,
            last_updated: row.last_updated,
        })
    }
}

pub(crate) fn collect_content(rows: Vec<ContentRow>) -> Result<Vec<Content>> {
    rows.into_iter().map(Content::try_from).collect()
}

pub(crate) fn collect_progress(
    rows: Vec<ProgressRow>,
) -> Result<Vec<Progress>> {
    rows.into_iter().map(Progress::try_from).collect()
}
