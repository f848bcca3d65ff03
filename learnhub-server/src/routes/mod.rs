use axum::{
    Router, middleware,
    routing::{get, post},
};
use learnhub_core::api::routes::{content, progress};

use crate::{
    AppState,
    handlers::{content as content_handlers, progress as progress_handlers},
    infra::middleware::demo_user_middleware,
};

/// Create the `/api` router. Every route runs as the demo user.
pub fn create_api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            content::SEARCH,
            get(content_handlers::search_content_handler),
        )
        .route(content::SAVED, get(content_handlers::saved_content_handler))
        .route(
            content::COLLECTION,
            post(content_handlers::create_content_handler),
        )
        .route(content::ITEM, get(content_handlers::get_content_handler))
        .route(
            content::item::SAVE,
            post(content_handlers::save_content_handler)
                .delete(content_handlers::unsave_content_handler),
        )
        .route(
            content::item::PROGRESS,
            post(content_handlers::update_progress_handler),
        )
        .route(progress::LIST, get(progress_handlers::list_progress_handler))
        .route(
            progress::STATS,
            get(progress_handlers::progress_stats_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            demo_user_middleware,
        ))
}
