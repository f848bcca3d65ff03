use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use learnhub_model::User;

use crate::infra::app_state::AppState;

/// Attach the demo user to the request so handlers can take
/// `Extension<User>` the same way they would behind real authentication.
pub async fn demo_user_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let user: User = state.demo_user.as_ref().clone();
    request.extensions_mut().insert(user);
    next.run(request).await
}
