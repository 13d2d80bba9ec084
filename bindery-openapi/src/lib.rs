mod builder;
mod ext;
mod handlers;
pub mod schema;

pub use builder::{build_spec, OpenApiConfig, FORM_URLENCODED};
pub use ext::OpenApiExt;
pub use handlers::openapi_routes;
pub use schema::SchemaRegistry;
