pub mod content;
pub mod progress;
pub mod system;

use uuid::Uuid;

use crate::infra::errors::{AppError, AppResult};

/// Path ids that are not UUIDs cannot name stored content.
pub(crate) fn parse_content_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found("Content not found"))
}
