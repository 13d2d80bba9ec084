//! Documented handlers.
//!
//! [`documented`] pairs an ordered tuple of descriptors with business
//! logic. The documentation is built once; each request binds every
//! descriptor in declared order and only then calls the logic with the
//! bound values.
//!
//! ```ignore
//! use bindery_core::prelude::*;
//!
//! async fn search(_ctx: RequestContext, page: i32, q: Option<String>) -> Json<Vec<Hit>> {
//!     ...
//! }
//!
//! let handler = documented(
//!     (query::<i32>("page").default_value(0), query::<String>("q").nullable()),
//!     |doc| { doc.summary("Search").tag("search"); },
//!     search,
//!     |results| { results.json::<Vec<Hit>>(200); },
//! );
//! let app = Router::new().route("/search", get(handler));
//! ```

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use tracing::debug;

use crate::config::BinderyConfig;
use crate::context::RequestContext;
use crate::doc::OperationDoc;
use crate::error::BindError;
use crate::http::{Handler, IntoResponse, Request, Response};
use crate::param::{Descriptor, ParamLocation, ParamSpec};
use crate::results::Results;

/// Request-time binding settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindOptions {
    /// Maximum size of an urlencoded form body, in bytes.
    pub form_body_limit: usize,
    /// Name the failing parameter and its location in error bodies.
    pub expose_details: bool,
}

impl BindOptions {
    pub const DEFAULT_FORM_BODY_LIMIT: usize = 2 * 1024 * 1024;

    /// Read `bindery.form.limit` and `bindery.errors.detail`, falling back
    /// to the defaults for missing keys.
    pub fn from_config(config: &BinderyConfig) -> Self {
        let defaults = Self::default();
        Self {
            form_body_limit: config.get_or("bindery.form.limit", defaults.form_body_limit),
            expose_details: config.get_or("bindery.errors.detail", defaults.expose_details),
        }
    }
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            form_body_limit: Self::DEFAULT_FORM_BODY_LIMIT,
            expose_details: true,
        }
    }
}

/// An ordered list of descriptors, bound left to right.
///
/// Implemented for `()` and tuples of up to ten descriptors.
pub trait ParamList: Send + Sync + 'static {
    /// Tuple of the descriptors' outputs.
    type Values: Send + 'static;

    fn specs(&self) -> Vec<ParamSpec>;

    /// Whether any descriptor reads the form body.
    fn reads_form(&self) -> bool;

    /// Bind every descriptor in order, stopping at the first failure.
    fn bind(&self, ctx: &RequestContext) -> Result<Self::Values, BindError>;
}

/// Business logic taking the request context plus one argument per descriptor.
pub trait BindHandler<P: ParamList>: Clone + Send + Sync + 'static {
    fn call(&self, ctx: RequestContext, values: P::Values) -> BoxFuture<'static, Response>;
}

macro_rules! impl_param_list {
    ($($ty:ident => $v:ident),*) => {
        #[allow(non_snake_case, unused_variables)]
        impl<$($ty: Descriptor,)*> ParamList for ($($ty,)*) {
            type Values = ($(<$ty as Descriptor>::Output,)*);

            fn specs(&self) -> Vec<ParamSpec> {
                let ($($v,)*) = self;
                vec![$($v.spec(),)*]
            }

            fn reads_form(&self) -> bool {
                let ($($v,)*) = self;
                false $(|| $v.location() == ParamLocation::Form)*
            }

            fn bind(&self, ctx: &RequestContext) -> Result<Self::Values, BindError> {
                let ($($v,)*) = self;
                Ok(($($v.bind(ctx)?,)*))
            }
        }

        #[allow(non_snake_case, unused_variables)]
        impl<F, Fut, R, $($ty,)*> BindHandler<($($ty,)*)> for F
        where
            F: Fn(RequestContext, $(<$ty as Descriptor>::Output,)*) -> Fut
                + Clone
                + Send
                + Sync
                + 'static,
            Fut: Future<Output = R> + Send + 'static,
            R: IntoResponse,
            $($ty: Descriptor,)*
        {
            fn call(
                &self,
                ctx: RequestContext,
                values: <($($ty,)*) as ParamList>::Values,
            ) -> BoxFuture<'static, Response> {
                let ($($v,)*) = values;
                let fut = (self)(ctx, $($v,)*);
                Box::pin(async move { fut.await.into_response() })
            }
        }
    };
}

impl_param_list!();
impl_param_list!(D1 => d1);
impl_param_list!(D1 => d1, D2 => d2);
impl_param_list!(D1 => d1, D2 => d2, D3 => d3);
impl_param_list!(D1 => d1, D2 => d2, D3 => d3, D4 => d4);
impl_param_list!(D1 => d1, D2 => d2, D3 => d3, D4 => d4, D5 => d5);
impl_param_list!(D1 => d1, D2 => d2, D3 => d3, D4 => d4, D5 => d5, D6 => d6);
impl_param_list!(D1 => d1, D2 => d2, D3 => d3, D4 => d4, D5 => d5, D6 => d6, D7 => d7);
impl_param_list!(D1 => d1, D2 => d2, D3 => d3, D4 => d4, D5 => d5, D6 => d6, D7 => d7, D8 => d8);
impl_param_list!(
    D1 => d1, D2 => d2, D3 => d3, D4 => d4, D5 => d5, D6 => d6, D7 => d7, D8 => d8, D9 => d9
);
impl_param_list!(
    D1 => d1, D2 => d2, D3 => d3, D4 => d4, D5 => d5, D6 => d6, D7 => d7, D8 => d8, D9 => d9,
    D10 => d10
);

/// Build a documented handler.
///
/// `configure` edits the operation documentation, `declare` lists the
/// possible responses. Both run exactly once, here.
pub fn documented<P, H>(
    params: P,
    configure: impl FnOnce(&mut OperationDoc),
    logic: H,
    declare: impl FnOnce(&mut Results),
) -> DocumentedHandler<P, H>
where
    P: ParamList,
    H: BindHandler<P>,
{
    let doc = OperationDoc::build(configure, declare, params.specs());
    DocumentedHandler {
        reads_form: params.reads_form(),
        params: Arc::new(params),
        logic,
        doc: Arc::new(doc),
        options: Arc::new(BindOptions::default()),
    }
}

/// A handler carrying its own documentation.
///
/// Implements axum's [`Handler`], so it plugs into `get(..)`, `post(..)`
/// and friends, or into a [`DocumentedRouter`](crate::router::DocumentedRouter)
/// to have the documentation collected.
pub struct DocumentedHandler<P, H> {
    params: Arc<P>,
    logic: H,
    doc: Arc<OperationDoc>,
    options: Arc<BindOptions>,
    reads_form: bool,
}

impl<P, H: Clone> Clone for DocumentedHandler<P, H> {
    fn clone(&self) -> Self {
        Self {
            params: self.params.clone(),
            logic: self.logic.clone(),
            doc: self.doc.clone(),
            options: self.options.clone(),
            reads_form: self.reads_form,
        }
    }
}

impl<P, H> DocumentedHandler<P, H>
where
    P: ParamList,
    H: BindHandler<P>,
{
    pub fn doc(&self) -> &OperationDoc {
        &self.doc
    }

    pub fn options(&self) -> &BindOptions {
        &self.options
    }

    pub fn with_options(mut self, options: impl Into<Arc<BindOptions>>) -> Self {
        self.options = options.into();
        self
    }

    /// Bind the request and run the business logic.
    ///
    /// A binding failure short-circuits into an error response; the logic
    /// is not called.
    pub async fn handle<S: Send + Sync>(&self, request: Request, state: &S) -> Response {
        let ctx = match RequestContext::from_request(request, state, &self.options, self.reads_form)
            .await
        {
            Ok(ctx) => ctx,
            Err(err) => return self.reject(err),
        };
        let values = match self.params.bind(&ctx) {
            Ok(values) => values,
            Err(err) => return self.reject(err),
        };
        self.logic.call(ctx, values).await
    }

    fn reject(&self, err: BindError) -> Response {
        debug!(error = %err, status = %err.status(), "binding aborted request");
        err.to_response(self.options.expose_details)
    }
}

#[doc(hidden)]
pub struct Bound;

impl<P, H, S> Handler<(Bound,), S> for DocumentedHandler<P, H>
where
    P: ParamList,
    H: BindHandler<P>,
    S: Send + Sync + 'static,
{
    type Future = BoxFuture<'static, Response>;

    fn call(self, req: Request, state: S) -> Self::Future {
        Box::pin(async move { self.handle(req, &state).await })
    }
}
