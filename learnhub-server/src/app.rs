use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method},
    routing::get,
};
use learnhub_config::{ClientConfig, CorsConfig};
use learnhub_core::api::routes::system;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;

use crate::{
    AppState,
    handlers::system::{health_handler, ping_handler},
    routes,
};

/// Permissive in dev mode, allow-list otherwise. Entries were validated
/// when the configuration was loaded.
fn cors_layer(cors: &CorsConfig, dev_mode: bool) -> CorsLayer {
    if dev_mode {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter(|origin| origin.trim() != "*")
        .filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
        .collect();
    let allow_origin = if origins.is_empty() || cors.is_wildcard_included() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|m| Method::from_bytes(m.trim().as_bytes()).ok())
        .collect();

    let headers: Vec<HeaderName> = cors
        .allowed_headers
        .iter()
        .filter_map(|h| HeaderName::from_bytes(h.trim().as_bytes()).ok())
        .collect();

    let mut layer = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::list(methods))
        .allow_headers(AllowHeaders::list(headers));

    // tower-http rejects credentials combined with a wildcard origin.
    if cors.allow_credentials && !cors.is_wildcard_included() {
        layer = layer.allow_credentials(true);
    }

    layer
}

fn with_client_bundle(app: Router, client: &ClientConfig) -> Router {
    let Some(dir) = client.dir.as_ref() else {
        return app;
    };

    info!(dir = %dir.display(), "serving frontend bundle");
    let index = ServeFile::new(dir.join("index.html"));
    app.fallback_service(ServeDir::new(dir).fallback(index))
}

pub fn create_app(state: AppState) -> Router {
    let api = routes::create_api_router(state.clone());
    let config = state.config();

    let app = Router::new()
        .route(system::PING, get(ping_handler))
        .route(system::HEALTH, get(health_handler))
        .merge(api)
        .with_state(state.clone());

    with_client_bundle(app, &config.client)
        // Outer to inner: CORS, then tracing.
        .layer(cors_layer(&config.cors, config.dev_mode))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cors(origins: &[&str], credentials: bool) -> CorsConfig {
        CorsConfig {
            allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
            allowed_methods: vec!["GET".into(), "POST".into()],
            allowed_headers: vec!["Content-Type".into()],
            allow_credentials: credentials,
        }
    }

    fn apply(layer: CorsLayer) {
        use axum::{body::Body, http::Request, response::Response};
        use tower::Layer;

        // tower-http validates the rule combination when the layer wraps a
        // service and panics on invalid ones.
        let _service = layer.layer(tower::service_fn(
            |_req: Request<Body>| async {
                Ok::<_, std::convert::Infallible>(Response::new(Body::empty()))
            },
        ));
    }

    #[test]
    fn cors_layer_is_usable_in_every_mode() {
        apply(cors_layer(&cors(&["http://localhost:5173"], true), false));
        apply(cors_layer(&cors(&["*"], true), false));
        apply(cors_layer(&cors(&[], false), true));
    }
}
