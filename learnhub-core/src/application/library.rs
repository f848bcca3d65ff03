use std::sync::Arc;

use learnhub_model::{
    ContentWithProgress, Progress, ProgressPercentage, ProgressStats,
    ProgressStatus, SavedContent,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::unit_of_work::AppUnitOfWork;
use crate::error::{CoreError, Result};

/// Body of a progress update. The percentage is kept wide so that
/// out-of-range values reach validation instead of failing to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdateRequest {
    pub status: ProgressStatus,
    pub progress_percentage: i64,
}

/// Bookmarks and progress tracking for a single user.
#[derive(Debug, Clone)]
pub struct LibraryService {
    uow: Arc<AppUnitOfWork>,
}

impl LibraryService {
    pub fn new(uow: Arc<AppUnitOfWork>) -> Self {
        Self { uow }
    }

    async fn require_content(&self, content_id: Uuid) -> Result<()> {
        match self.uow.content.get_content(content_id).await? {
            Some(_) => Ok(()),
            None => Err(CoreError::content_not_found()),
        }
    }

    pub async fn save(
        &self,
        user_id: Uuid,
        content_id: Uuid,
    ) -> Result<SavedContent> {
        self.require_content(content_id).await?;
        let saved =
            self.uow.saved_content.save_content(user_id, content_id).await?;
        info!(%content_id, "content saved");
        Ok(saved)
    }

    /// Removing a bookmark that does not exist is not an error.
    pub async fn unsave(&self, user_id: Uuid, content_id: Uuid) -> Result<()> {
        let removed = self
            .uow
            .saved_content
            .unsave_content(user_id, content_id)
            .await?;
        debug!(%content_id, removed, "content unsaved");
        Ok(())
    }

    pub async fn saved(&self, user_id: Uuid) -> Result<Vec<ContentWithProgress>> {
        self.uow.saved_content.get_saved_content(user_id).await
    }

    pub async fn progress(&self, user_id: Uuid) -> Result<Vec<Progress>> {
        self.uow.progress.get_user_progress(user_id).await
    }

    pub async fn update_progress(
        &self,
        user_id: Uuid,
        content_id: Uuid,
        request: ProgressUpdateRequest,
    ) -> Result<Progress> {
        let percentage = ProgressPercentage::new(request.progress_percentage)?;
        self.require_content(content_id).await?;

        let progress = self
            .uow
            .progress
            .update_progress(user_id, content_id, request.status, percentage)
            .await?;
        info!(
            %content_id,
            status = %progress.status,
            percentage = progress.progress_percentage.value(),
            "progress updated"
        );
        Ok(progress)
    }

    pub async fn stats(&self, user_id: Uuid) -> Result<ProgressStats> {
        let progress = self.uow.progress.get_user_progress(user_id).await?;
        let saved = self.uow.saved_content.count_saved(user_id).await?;
        Ok(ProgressStats::from_progress(&progress, saved))
    }
}
