use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::infra::app_state::AppState;

pub async fn ping_handler() -> Json<Value> {
    debug!("Ping endpoint called");
    Json(json!({
        "status": "ok",
        "message": "LearnHub server is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Database round-trip plus pool and catalog details; 503 when the
/// database cannot be reached.
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<Value>) {
    let mut health_status = json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {}
    });

    let mut is_unhealthy = false;

    match state.postgres.health_check().await {
        Ok(()) => {
            let pool = state.postgres.pool_stats();
            health_status["checks"]["database"] = json!({
                "status": "healthy",
                "pool_size": pool.size,
                "idle_connections": pool.idle,
                "max_connections": pool.max_size
            });
        }
        Err(err) => {
            error!(error = %err, "health check failed");
            health_status["checks"]["database"] = json!({
                "status": "unhealthy"
            });
            is_unhealthy = true;
        }
    }

    health_status["checks"]["catalog"] = json!({
        "enabled": state.config().catalog.enabled,
        "base_url": state.config().catalog.base_url.as_str()
    });

    if is_unhealthy {
        health_status["status"] = json!("unhealthy");
        (StatusCode::SERVICE_UNAVAILABLE, Json(health_status))
    } else {
        (StatusCode::OK, Json(health_status))
    }
}
