pub mod config;
pub mod context;
pub mod doc;
pub mod error;
pub mod handler;
pub mod http;
pub mod layers;
pub mod param;
pub mod prelude;
pub mod results;
pub mod router;
pub mod scalar;

pub use config::{BinderyConfig, ConfigError, ConfigValue, FromConfigValue};
pub use context::RequestContext;
pub use doc::OperationDoc;
pub use error::{error_response, BindError};
pub use handler::{documented, BindHandler, BindOptions, DocumentedHandler, ParamList};
pub use layers::{default_trace, init_tracing};
pub use param::{
    form, form_as, path, path_as, query, query_as, Descriptor, Nullable, Param, ParamLocation,
    ParamSpec, PathParam, Required,
};
pub use results::{PayloadSchema, ResultDeclaration, Results};
pub use router::{DocumentedRouter, RouteDoc};
pub use scalar::{Binder, Scalar, ScalarKind};

pub use schemars;
