//! OpenAPI documentation.
//! Paths in handler annotations use the placeholder prefix /api/files; they are
//! rewritten at runtime to the configured `ROUTE_PREFIX`.

use utoipa::OpenApi;

use crate::handlers;
use blobdrop_core::models;

/// Prefix used in handler path annotations (utoipa requires compile-time literals).
const OPENAPI_PATH_PLACEHOLDER: &str = "/api/files";

/// Rewrites path keys from the placeholder prefix to the configured one.
fn transform_openapi_paths(spec: &mut utoipa::openapi::OpenApi, prefix: &str) {
    if OPENAPI_PATH_PLACEHOLDER == prefix {
        return;
    }
    let path_map = std::mem::take(&mut spec.paths.paths);
    for (key, item) in path_map {
        let new_key = key.replacen(OPENAPI_PATH_PLACEHOLDER, prefix, 1);
        spec.paths.paths.insert(new_key, item);
    }
}

/// Returns the OpenAPI spec with paths under `prefix`.
pub fn get_openapi_spec(prefix: &str) -> utoipa::openapi::OpenApi {
    let mut spec = ApiDoc::openapi();
    transform_openapi_paths(&mut spec, prefix);
    spec
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blobdrop API",
        version = "0.1.0",
        description = "Image upload API. Validates JPG, PNG and GIF files up to 2MB and stores them in blob storage under timestamped names."
    ),
    paths(handlers::files::upload_file, handlers::files::health),
    components(schemas(
        models::UploadResponse,
        models::FailureResponse,
        models::HealthResponse,
    )),
    tags(
        (name = "files", description = "Image upload and health")
    )
)]
pub struct ApiDoc;
