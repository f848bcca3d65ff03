use async_trait::async_trait;
use learnhub_model::{Content, ContentFilters, NewContent, SortBy};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::rows::{CONTENT_COLUMNS, ContentRow, collect_content};
use crate::database::ports::content::ContentRepository;
use crate::error::{CoreError, Result};

/// Default page size when the caller does not specify one.
const DEFAULT_LIMIT: u32 = 20;

#[derive(Clone, Debug)]
pub struct PostgresContentRepository {
    pool: PgPool,
}

impl PostgresContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`.
pub fn escape_like_literal(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '%' => out.push_str("\\%"),
            '_' => out.push_str("\\_"),
            other => out.push(other),
        }
    }
    out
}

fn push_search_predicate(
    builder: &mut QueryBuilder<'_, Postgres>,
    query: &str,
    filters: &ContentFilters,
) {
    let pattern = format!("%{}%", escape_like_literal(query.trim()));

    builder.push(" WHERE (title ILIKE ");
    builder.push_bind(pattern.clone());
    builder.push(" OR description ILIKE ");
    builder.push_bind(pattern.clone());
    builder.push(" OR author ILIKE ");
    builder.push_bind(pattern);
    builder.push(")");

    if let Some(category) = filters.category {
        builder.push(" AND category = ");
        builder.push_bind(category);
    }

    if let Some(content_type) = filters.content_type {
        builder.push(" AND content_type = ");
        builder.push_bind(content_type);
    }
}

/// ORDER BY clause for a sort key; `id` breaks ties so pages are stable.
pub fn order_clause(sort_by: Option<SortBy>) -> &'static str {
    match sort_by {
        Some(SortBy::Rating) => " ORDER BY rating DESC NULLS LAST, id",
        Some(SortBy::Title) => " ORDER BY title ASC, id",
        Some(SortBy::Date) | Some(SortBy::Relevance) | None => {
            " ORDER BY created_at DESC, id"
        }
    }
}

#[async_trait]
impl ContentRepository for PostgresContentRepository {
    async fn get_content(&self, id: Uuid) -> Result<Option<Content>> {
        let row = sqlx::query_as::<_, ContentRow>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM content WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            CoreError::Internal(format!("Failed to load content: {}", e))
        })?;

        row.map(Content::try_from).transpose()
    }

    async fn search_content(
        &self,
        query: &str,
        filters: &ContentFilters,
    ) -> Result<Vec<Content>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {CONTENT_COLUMNS} FROM content"
        ));
        push_search_predicate(&mut builder, query, filters);
        builder.push(order_clause(filters.sort_by));

        builder.push(" LIMIT ");
        builder.push_bind(i64::from(filters.limit.unwrap_or(DEFAULT_LIMIT)));
        builder.push(" OFFSET ");
        builder.push_bind(i64::from(filters.offset.unwrap_or(0)));

        let rows = builder
            .build_query_as::<ContentRow>()
            .fetch_all(self.pool())
            .await
            .map_err(|e| {
                CoreError::Internal(format!("Failed to search content: {}", e))
            })?;

        collect_content(rows)
    }

    async fn count_content(
        &self,
        query: &str,
        filters: &ContentFilters,
    ) -> Result<u64> {
        let mut builder =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM content");
        push_search_predicate(&mut builder, query, filters);

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(|e| {
                CoreError::Internal(format!("Failed to count content: {}", e))
            })?;

        Ok(count.max(0) as u64)
    }

    async fn create_content(&self, content: &NewContent) -> Result<Content> {
        let row = sqlx::query_as::<_, ContentRow>(&format!(
            r#"
            INSERT INTO content (
                title, description, url, image_url, source, external_id,
                content_type, category, rating, author
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8,
                CAST($9::float8 AS NUMERIC(3, 2)), $10
            )
            RETURNING {CONTENT_COLUMNS}
            "#
        ))
        .bind(&content.title)
        .bind(&content.description)
        .bind(&content.url)
        .bind(&content.image_url)
        .bind(&content.source)
        .bind(&content.external_id)
        .bind(content.content_type)
        .bind(content.category)
        .bind(content.rating.map(|r| r.as_f64()))
        .bind(&content.author)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error()
                && db_err.is_unique_violation()
            {
                return CoreError::InvalidInput(format!(
                    "Content from {} with external id {} already exists",
                    content.source,
                    content.external_id.as_deref().unwrap_or_default()
                ));
            }
            CoreError::Internal(format!("Failed to create content: {}", e))
        })?;

        row.try_into()
    }

    async fn get_content_by_external_id(
        &self,
        external_id: &str,
        source: &str,
    ) -> Result<Option<Content>> {
        let row = sqlx::query_as::<_, ContentRow>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM content \
             WHERE external_id = $1 AND source = $2"
        ))
        .bind(external_id)
        .bind(source)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            CoreError::Internal(format!(
                "Failed to load content by external id: {}",
                e
            ))
        })?;

        row.map(Content::try_from).transpose()
    }

    async fn upsert_external_content(
        &self,
        content: &NewContent,
    ) -> Result<Content> {
        if content.external_id.is_none() {
            return Err(CoreError::InvalidInput(
                "External content requires an external id".to_string(),
            ));
        }

        let row = sqlx::query_as::<_, ContentRow>(&format!(
            r#"
            INSERT INTO content (
                title, description, url, image_url, source, external_id,
                content_type, category, rating, author
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8,
                CAST($9::float8 AS NUMERIC(3, 2)), $10
            )
            ON CONFLICT (source, external_id) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                url = EXCLUDED.url,
                image_url = EXCLUDED.image_url,
                content_type = EXCLUDED.content_type,
                category = EXCLUDED.category,
                rating = EXCLUDED.rating,
                author = EXCLUDED.author
            RETURNING {CONTENT_COLUMNS}
            "#
        ))
        .bind(&content.title)
        .bind(&content.description)
        .bind(&content.url)
        .bind(&content.image_url)
        .bind(&content.source)
        .bind(&content.external_id)
        .bind(content.content_type)
        .bind(content.category)
        .bind(content.rating.map(|r| r.as_f64()))
        .bind(&content.author)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            CoreError::Internal(format!(
                "Failed to upsert external content: {}",
                e
            ))
        })?;

        row.try_into()
    }
}
