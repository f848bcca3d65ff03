pub mod content;
pub mod progress;
pub mod rows;
pub mod saved_content;
pub mod users;
