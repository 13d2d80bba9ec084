use bindery_core::http::Router;
use bindery_core::DocumentedRouter;

use crate::{openapi_routes, OpenApiConfig};

/// Mount the OpenAPI document next to a router's own routes.
///
/// # Example
///
/// ```ignore
/// use bindery_openapi::{OpenApiConfig, OpenApiExt};
///
/// let app = DocumentedRouter::new()
///     .get("/users/{id}", get_user)
///     .with_openapi(OpenApiConfig::new("Users", "1.0.0"));
/// ```
pub trait OpenApiExt<S> {
    fn with_openapi(self, config: OpenApiConfig) -> Router<S>;
}

impl<S> OpenApiExt<S> for DocumentedRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_openapi(self, config: OpenApiConfig) -> Router<S> {
        let (router, routes) = self.into_parts();
        router.merge(openapi_routes(&config, &routes))
    }
}
