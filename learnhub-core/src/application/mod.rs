pub mod content;
pub mod demo_user;
pub mod library;
pub mod search;
pub mod unit_of_work;

pub use content::ContentService;
pub use demo_user::ensure_demo_user;
pub use library::{LibraryService, ProgressUpdateRequest};
pub use search::{
    ContentSearchService, SearchRequest, SearchResponse, SearchSettings,
};
pub use unit_of_work::{AppUnitOfWork, AppUnitOfWorkBuilder};
