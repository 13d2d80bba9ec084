use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::doc::{default_operation_id, OperationDoc};
use crate::handler::{BindHandler, BindOptions, DocumentedHandler, ParamList};
use crate::http::routing::{self, MethodFilter, MethodRouter};
use crate::http::{Method, Router};
use crate::layers::default_trace;

/// Documentation of one registered route.
#[derive(Debug, Clone, Serialize)]
pub struct RouteDoc {
    pub method: String,
    pub path: String,
    pub operation: Arc<OperationDoc>,
}

/// An axum `Router` that also collects the documentation of every
/// [`DocumentedHandler`] registered through it.
///
/// Paths use axum's syntax (`/users/{id}`), which is also OpenAPI's.
pub struct DocumentedRouter<S = ()> {
    router: Router<S>,
    routes: Vec<RouteDoc>,
    options: Arc<BindOptions>,
}

impl<S> Default for DocumentedRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> DocumentedRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            routes: Vec::new(),
            options: Arc::new(BindOptions::default()),
        }
    }

    /// Binding options applied to every handler registered afterwards.
    pub fn with_options(mut self, options: BindOptions) -> Self {
        self.options = Arc::new(options);
        self
    }

    /// Register `handler` for `method` on `path`.
    ///
    /// # Panics
    ///
    /// Panics when axum cannot route `method` (extension methods such as
    /// `PURGE`), like axum's own registration errors.
    pub fn route<P, H>(
        mut self,
        method: Method,
        path: &str,
        handler: DocumentedHandler<P, H>,
    ) -> Self
    where
        P: ParamList,
        H: BindHandler<P>,
    {
        let filter = MethodFilter::try_from(method.clone()).unwrap_or_else(|_| {
            panic!("cannot register `{method} {path}`: axum does not route the `{method}` method")
        });

        let handler = handler.with_options(self.options.clone());
        self.routes.push(route_doc(&method, path, handler.doc()));

        let method_router: MethodRouter<S> = routing::on(filter, handler);
        self.router = self.router.route(path, method_router);
        self
    }

    pub fn get<P: ParamList, H: BindHandler<P>>(
        self,
        path: &str,
        handler: DocumentedHandler<P, H>,
    ) -> Self {
        self.route(Method::GET, path, handler)
    }

    pub fn post<P: ParamList, H: BindHandler<P>>(
        self,
        path: &str,
        handler: DocumentedHandler<P, H>,
    ) -> Self {
        self.route(Method::POST, path, handler)
    }

    pub fn put<P: ParamList, H: BindHandler<P>>(
        self,
        path: &str,
        handler: DocumentedHandler<P, H>,
    ) -> Self {
        self.route(Method::PUT, path, handler)
    }

    pub fn patch<P: ParamList, H: BindHandler<P>>(
        self,
        path: &str,
        handler: DocumentedHandler<P, H>,
    ) -> Self {
        self.route(Method::PATCH, path, handler)
    }

    pub fn delete<P: ParamList, H: BindHandler<P>>(
        self,
        path: &str,
        handler: DocumentedHandler<P, H>,
    ) -> Self {
        self.route(Method::DELETE, path, handler)
    }

    /// Mount an undocumented axum route, e.g. a health check.
    pub fn route_service(mut self, path: &str, method_router: MethodRouter<S>) -> Self {
        self.router = self.router.route(path, method_router);
        self
    }

    /// Combine two routers and their documentation.
    pub fn merge(mut self, other: DocumentedRouter<S>) -> Self {
        self.router = self.router.merge(other.router);
        self.routes.extend(other.routes);
        self
    }

    /// Wrap every route registered so far in a `tower-http` trace layer.
    pub fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(default_trace());
        self
    }

    /// Documentation collected so far, in registration order.
    pub fn routes(&self) -> &[RouteDoc] {
        &self.routes
    }

    pub fn into_parts(self) -> (Router<S>, Vec<RouteDoc>) {
        (self.router, self.routes)
    }

    pub fn into_router(self) -> Router<S> {
        self.router
    }
}

fn route_doc(method: &Method, path: &str, doc: &OperationDoc) -> RouteDoc {
    let mut operation = doc.clone();
    if operation.operation_id.is_none() {
        operation.operation_id = Some(default_operation_id(method.as_str(), path));
    }
    debug!(
        method = %method,
        path,
        params = operation.params.len(),
        responses = operation.responses.len(),
        "registered documented route"
    );
    RouteDoc {
        method: method.as_str().to_string(),
        path: path.to_string(),
        operation: Arc::new(operation),
    }
}
