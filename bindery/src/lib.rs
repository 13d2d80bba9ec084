//! bindery: typed request parameters and self-documenting handlers for axum.
//!
//! A handler is built from an ordered list of parameter descriptors, a
//! documentation block, the business logic and its declared results. The
//! descriptors are bound on every request before the logic runs; the
//! documentation is built once and can be rendered as OpenAPI.
//!
//! ```ignore
//! use bindery::prelude::*;
//!
//! async fn search(_ctx: RequestContext, page: i32, q: Option<String>) -> Json<Vec<Hit>> {
//!     ...
//! }
//!
//! let app = DocumentedRouter::new()
//!     .get(
//!         "/search",
//!         documented(
//!             (query::<i32>("page").default_value(0), query::<String>("q").nullable()),
//!             |doc| { doc.summary("Full-text search"); },
//!             search,
//!             |results| { results.json::<Vec<Hit>>(200); },
//!         ),
//!     )
//!     .with_openapi(OpenApiConfig::new("Search", "1.0.0"));
//! ```
//!
//! # Feature flags
//!
//! | Feature   | Default | Crate             |
//! |-----------|---------|-------------------|
//! | `openapi` | **yes** | `bindery-openapi` |

pub extern crate bindery_core;

pub use bindery_core::*;

#[cfg(feature = "openapi")]
pub use bindery_openapi;

/// Unified prelude: `use bindery::prelude::*`.
pub mod prelude {
    pub use bindery_core::prelude::*;

    #[cfg(feature = "openapi")]
    pub use bindery_openapi::{OpenApiConfig, OpenApiExt};
}
