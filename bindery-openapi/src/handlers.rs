use std::sync::Arc;

use bindery_core::http::routing::get;
use bindery_core::http::{Json, Router};
use bindery_core::RouteDoc;
use serde_json::Value;
use tracing::info;

use crate::builder::{build_spec, OpenApiConfig};

/// Router serving the OpenAPI document for `routes` at `config.path`.
///
/// The document is built once, here.
pub fn openapi_routes<S: Clone + Send + Sync + 'static>(
    config: &OpenApiConfig,
    routes: &[RouteDoc],
) -> Router<S> {
    let spec: Arc<Value> = Arc::new(build_spec(config, routes));
    info!(path = %config.path, operations = routes.len(), "serving OpenAPI document");
    Router::new().route(
        &config.path,
        get(move || {
            let spec = spec.clone();
            async move { Json(spec.as_ref().clone()) }
        }),
    )
}
