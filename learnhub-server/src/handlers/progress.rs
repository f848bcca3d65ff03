use axum::{Extension, Json, extract::State};
use learnhub_model::{Progress, ProgressStats, User};

use crate::infra::app_state::AppState;
use crate::infra::errors::AppResult;

/// All progress rows for the user, most recently updated first.
pub async fn list_progress_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> AppResult<Json<Vec<Progress>>> {
    Ok(Json(state.library.progress(user.id).await?))
}

pub async fn progress_stats_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> AppResult<Json<ProgressStats>> {
    Ok(Json(state.library.stats(user.id).await?))
}
