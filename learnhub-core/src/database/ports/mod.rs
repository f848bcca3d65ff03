pub mod content;
pub mod progress;
pub mod saved_content;
pub mod users;
