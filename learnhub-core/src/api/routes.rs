//! Route path constants shared by the router and integration tests.
//!
//! Paths use axum's `{param}` capture syntax.

macro_rules! api_path {
    ($path:literal) => {
        concat!("/api", $path)
    };
}

pub const API_ROOT: &str = "/api";

pub mod content {
    pub const SEARCH: &str = api_path!("/content/search");
    pub const SAVED: &str = api_path!("/content/saved");
    pub const COLLECTION: &str = api_path!("/content");
    pub const ITEM: &str = api_path!("/content/{id}");

    pub mod item {
        pub const SAVE: &str = api_path!("/content/{id}/save");
        pub const PROGRESS: &str = api_path!("/content/{id}/progress");
    }
}

pub mod progress {
    pub const LIST: &str = api_path!("/progress");
    pub const STATS: &str = api_path!("/progress/stats");
}

pub mod system {
    pub const PING: &str = "/ping";
    pub const HEALTH: &str = "/health";
}

pub mod utils {
    /// Replace a single path parameter (e.g. `"{id}"`) with the provided value.
    pub fn replace_param(
        route: &str,
        param: &str,
        value: impl AsRef<str>,
    ) -> String {
        route.replace(param, value.as_ref())
    }

    /// Shorthand for the common `{id}` capture.
    pub fn with_id(route: &str, id: impl std::fmt::Display) -> String {
        replace_param(route, "{id}", id.to_string())
    }
}
