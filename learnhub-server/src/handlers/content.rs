use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use learnhub_core::application::{
    ProgressUpdateRequest, SearchRequest, SearchResponse,
};
use learnhub_model::{
    Category, Content, ContentType, ContentWithProgress, NewContent, Progress,
    SavedContent, SortBy, User, parse_optional,
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::parse_content_id;
use crate::infra::app_state::AppState;
use crate::infra::errors::{AppError, AppResult};

/// Raw search query string. Everything arrives as text so that blank values
/// can be treated as absent and bad values reported as 400.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub content_type: Option<String>,
    pub sort_by: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl TryFrom<SearchParams> for SearchRequest {
    type Error = AppError;

    fn try_from(params: SearchParams) -> Result<Self, Self::Error> {
        let limit = parse_optional::<u32>(params.limit.as_deref())
            .map_err(|_| AppError::bad_request("Invalid limit"))?;
        let offset = parse_optional::<u32>(params.offset.as_deref())
            .map_err(|_| AppError::bad_request("Invalid offset"))?;

        Ok(SearchRequest {
            query: params.q,
            category: parse_optional::<Category>(params.category.as_deref())?,
            content_type: parse_optional::<ContentType>(
                params.content_type.as_deref(),
            )?,
            sort_by: parse_optional::<SortBy>(params.sort_by.as_deref())?,
            limit,
            offset,
        })
    }
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}

/// Search local content and the external catalog.
///
/// `GET /api/content/search?q=rust&category=programming&sortBy=rating`
///
/// Responds with `{ content, total, hasMore }`. A missing `q` or an
/// unparseable filter is a 400.
pub async fn search_content_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> AppResult<Json<SearchResponse>> {
    let request = SearchRequest::try_from(query_params(params)?)?;
    let response = state.search.search(user.id, request).await?;
    Ok(Json(response))
}

pub async fn saved_content_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> AppResult<Json<Vec<ContentWithProgress>>> {
    Ok(Json(state.library.saved(user.id).await?))
}

pub async fn create_content_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewContent>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Content>)> {
    let new_content = json_body(payload)?;
    let created = state.content.create_manual(new_content).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_content_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> AppResult<Json<ContentWithProgress>> {
    let content_id = parse_content_id(&id)?;
    Ok(Json(state.content.get(user.id, content_id).await?))
}

pub async fn save_content_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> AppResult<Json<SavedContent>> {
    let content_id = parse_content_id(&id)?;
    Ok(Json(state.library.save(user.id, content_id).await?))
}

/// Remove a bookmark. An id that is not a UUID names no bookmark, so there
/// is nothing to delete.
pub async fn unsave_content_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    if let Ok(content_id) = parse_content_id(&id) {
        state.library.unsave(user.id, content_id).await?;
    }
    Ok(Json(json!({ "message": "Content unsaved successfully" })))
}

/// Upsert the user's progress on one item.
///
/// Body: `{ "status": "in_progress", "progressPercentage": 40 }`. An
/// unknown status or a percentage outside 0..=100 is a 400; unknown
/// content is a 404.
pub async fn update_progress_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    payload: Result<Json<ProgressUpdateRequest>, JsonRejection>,
) -> AppResult<Json<Progress>> {
    let content_id = parse_content_id(&id)?;
    let request = json_body(payload)?;
    let progress = state
        .library
        .update_progress(user.id, content_id, request)
        .await?;
    Ok(Json(progress))
}
