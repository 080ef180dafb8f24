//! Route configuration and setup

use crate::error::panic_response;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Json, Router,
};
use blobdrop_core::Config;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa_rapidoc::RapiDoc;

const OPENAPI_JSON_PATH: &str = "/api/openapi.json";

/// Setup all application routes
///
/// Upload and health live under the configured prefix. API docs are only
/// mounted outside production.
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let prefix = config.route_prefix.as_str();

    let mut app = Router::new()
        .route(
            &format!("{}/upload", prefix),
            post(handlers::files::upload_file),
        )
        .route(&format!("{}/health", prefix), get(handlers::files::health));

    if !config.is_production() {
        let spec = crate::api_doc::get_openapi_spec(prefix);
        app = app
            .route(OPENAPI_JSON_PATH, get(move || async move { Json(spec) }))
            .merge(RapiDoc::new(OPENAPI_JSON_PATH).path("/docs"));
        tracing::info!(docs = "/docs", openapi = OPENAPI_JSON_PATH, "API docs enabled");
    }

    let show_detailed_errors = config.show_detailed_errors;

    // Whole-request cap only; the per-file 2MB rule lives in the handler.
    let app = app
        .layer(DefaultBodyLimit::disable())
        .layer(CatchPanicLayer::custom(
            move |payload: Box<dyn Any + Send + 'static>| {
                panic_response(show_detailed_errors, payload)
            },
        ))
        .layer(RequestBodyLimitLayer::new(config.max_request_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Only configured origins, any method or header they ask for, with credentials.
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", origin, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}
