//! Everything a route module needs, with a single `use`.
//!
//! ```ignore
//! use bindery_core::prelude::*;
//!
//! async fn get_user(_ctx: RequestContext, id: i64) -> Json<User> { ... }
//!
//! let app = DocumentedRouter::new().get(
//!     "/users/{id}",
//!     documented(
//!         (path::<i64>("id"),),
//!         |doc| { doc.summary("Fetch a user"); },
//!         get_user,
//!         |results| { results.json::<User>(200).empty(404); },
//!     ),
//! );
//! ```

pub use crate::context::RequestContext;
pub use crate::doc::OperationDoc;
pub use crate::error::BindError;
pub use crate::handler::{documented, BindOptions, DocumentedHandler};
pub use crate::http::{IntoResponse, Json, Response, Router, StatusCode};
pub use crate::param::{form, form_as, path, path_as, query, query_as};
pub use crate::results::Results;
pub use crate::router::DocumentedRouter;
pub use schemars::JsonSchema;
