use std::sync::Arc;

use learnhub_model::{Content, ContentWithProgress, NewContent, SOURCE_MANUAL};
use tracing::info;
use uuid::Uuid;

use super::search::annotate_for_user;
use super::unit_of_work::AppUnitOfWork;
use crate::error::{CoreError, Result};

/// Single-item reads and manual content creation.
#[derive(Debug, Clone)]
pub struct ContentService {
    uow: Arc<AppUnitOfWork>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ContentService {
    pub fn new(uow: Arc<AppUnitOfWork>) -> Self {
        Self { uow }
    }

    pub async fn get(
        &self,
        user_id: Uuid,
        content_id: Uuid,
    ) -> Result<ContentWithProgress> {
        let content = self
            .uow
            .content
            .get_content(content_id)
            .await?
            .ok_or_else(CoreError::content_not_found)?;

        annotate_for_user(&self.uow, user_id, vec![content])
            .await?
            .pop()
            .ok_or_else(CoreError::content_not_found)
    }

    pub async fn create_manual(&self, content: NewContent) -> Result<Content> {
        let title = content.title.trim().to_string();
        if title.is_empty() {
            return Err(CoreError::InvalidInput("Title is required".into()));
        }
        let source = match content.source.trim() {
            "" => SOURCE_MANUAL.to_string(),
            other => other.to_string(),
        };

        let normalized = NewContent {
            title,
            description: trimmed(content.description),
            url: trimmed(content.url),
            image_url: trimmed(content.image_url),
            source,
            external_id: trimmed(content.external_id),
            author: trimmed(content.author),
            ..content
        };

        let created = self.uow.content.create_content(&normalized).await?;
        info!(content_id = %created.id, source = %created.source, "content created");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::unit_of_work::test_support::Mocks;
    use chrono::Utc;
    use learnhub_model::{Category, ContentType, Rating};

    fn new_content(title: &str) -> NewContent {
        NewContent {
            title: title.into(),
            description: Some("   ".into()),
            url: Some(" https://example.test/course ".into()),
            image_url: None,
            source: "  ".into(),
            external_id: None,
            content_type: ContentType::Course,
            category: Some(Category::Design),
            rating: Some(Rating::from_f64(4.2).unwrap()),
            author: Some("Jane Doe".into()),
        }
    }

    fn stored(new: &NewContent) -> Content {
        Content {
            id: Uuid::new_v4(),
            title: new.title.clone(),
            description: new.description.clone(),
            url: new.url.clone(),
            image_url: new.image_url.clone(),
            source: new.source.clone(),
            external_id: new.external_id.clone(),
            content_type: new.content_type,
            category: new.category,
            rating: new.rating,
            author: new.author.clone(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_manual_rejects_blank_title() {
        let mut mocks = Mocks::default();
        mocks.content.expect_create_content().never();
        let service = ContentService::new(mocks.build());

        let err = service.create_manual(new_content("  ")).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(ref m) if m == "Title is required"));
    }

    #[tokio::test]
    async fn create_manual_normalizes_fields() {
        let mut mocks = Mocks::default();
        mocks
            .content
            .expect_create_content()
            .withf(|new| {
                new.title == "UX Foundations"
                    && new.source == SOURCE_MANUAL
                    && new.description.is_none()
                    && new.url.as_deref() == Some("https://example.test/course")
            })
            .times(1)
            .returning(|new| Ok(stored(new)));
        let service = ContentService::new(mocks.build());

        let created = service
            .create_manual(new_content(" UX Foundations "))
            .await
            .unwrap();
        assert_eq!(created.source, SOURCE_MANUAL);
        assert_eq!(created.rating.map(|r| r.to_string()).as_deref(), Some("4.20"));
    }

    #[tokio::test]
    async fn get_missing_content_is_not_found() {
        let mut mocks = Mocks::default();
        mocks.content.expect_get_content().returning(|_| Ok(None));
        let service = ContentService::new(mocks.build());

        let err = service.get(Uuid::nil(), Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { entity: "Content" }));
    }

    #[tokio::test]
    async fn get_annotates_saved_flag() {
        let mut mocks = Mocks::default();
        mocks
            .content
            .expect_get_content()
            .returning(|id| Ok(Some(Content { id, ..stored(&new_content("Saved")) })));
        mocks
            .saved_content
            .expect_saved_content_ids()
            .returning(|_, ids| Ok(ids.to_vec()));
        mocks
            .progress
            .expect_get_progress_for_contents()
            .returning(|_, _| Ok(Vec::new()));
        let service = ContentService::new(mocks.build());

        let id = Uuid::new_v4();
        let item = service.get(Uuid::nil(), id).await.unwrap();
        assert_eq!(item.content.id, id);
        assert!(item.is_saved);
        assert!(item.progress.is_none());
    }
}
