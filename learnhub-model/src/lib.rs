//! Data model shared by the LearnHub crates.
#![allow(missing_docs)]

pub mod content;
pub mod error;
pub mod progress;
pub mod query;
pub mod rating;
pub mod user;

pub use content::{
    Category, Content, ContentType, ContentWithProgress, NewContent,
    SOURCE_MANUAL, SOURCE_OPENLIBRARY,
};
pub use error::ModelError;
pub use progress::{
    Progress, ProgressPercentage, ProgressStats, ProgressStatus,
};
pub use query::{ContentFilters, SortBy, parse_optional};
pub use rating::Rating;
pub use user::{NewUser, SavedContent, User};
