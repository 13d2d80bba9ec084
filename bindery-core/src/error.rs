use crate::http::{IntoResponse, Json, Response, StatusCode};
use crate::param::ParamLocation;

/// Helper to create a JSON error response with a standard `{ "error": message }` body.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::json!({ "error": message.into() });
    (status, Json(body)).into_response()
}

/// A hard binding failure.
///
/// Produced when a required parameter cannot be resolved, when a delegated
/// (serde-bound) value is rejected, or when the form body cannot be read.
/// Binding stops at the first failure and the business logic never runs.
#[derive(Debug, Clone, PartialEq)]
pub enum BindError {
    /// A required parameter was absent from the request.
    Missing {
        name: String,
        location: ParamLocation,
    },
    /// A required scalar parameter was present but did not parse.
    Malformed {
        name: String,
        location: ParamLocation,
        expected: &'static str,
    },
    /// A delegated parameter was rejected by its deserializer.
    Invalid {
        name: String,
        location: ParamLocation,
        reason: String,
    },
    /// The urlencoded form body could not be read.
    Body(String),
    /// The urlencoded form body exceeded the configured limit.
    BodyTooLarge { limit: usize },
}

impl BindError {
    /// HTTP status this failure maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            BindError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            BindError::Missing { .. }
            | BindError::Malformed { .. }
            | BindError::Invalid { .. }
            | BindError::Body(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Name and location of the offending parameter, if the failure is tied to one.
    pub fn parameter(&self) -> Option<(&str, ParamLocation)> {
        match self {
            BindError::Missing { name, location }
            | BindError::Malformed { name, location, .. }
            | BindError::Invalid { name, location, .. } => Some((name.as_str(), *location)),
            BindError::Body(_) | BindError::BodyTooLarge { .. } => None,
        }
    }

    /// Render the failure as a JSON response.
    ///
    /// With `detailed`, the body also names the parameter and its location.
    pub fn to_response(&self, detailed: bool) -> Response {
        match (detailed, self.parameter()) {
            (true, Some((name, location))) => {
                let body = serde_json::json!({
                    "error": self.to_string(),
                    "parameter": name,
                    "in": location.as_str(),
                });
                (self.status(), Json(body)).into_response()
            }
            _ => error_response(self.status(), self.to_string()),
        }
    }
}

impl std::fmt::Display for BindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BindError::Missing { name, location } => {
                write!(f, "Missing {location} parameter '{name}'")
            }
            BindError::Malformed {
                name,
                location,
                expected,
            } => write!(f, "Invalid {location} parameter '{name}': expected {expected}"),
            BindError::Invalid {
                name,
                location,
                reason,
            } => write!(f, "Invalid {location} parameter '{name}': {reason}"),
            BindError::Body(reason) => write!(f, "Failed to read form body: {reason}"),
            BindError::BodyTooLarge { limit } => {
                write!(f, "Form body exceeds the limit of {limit} bytes")
            }
        }
    }
}

impl std::error::Error for BindError {}

impl IntoResponse for BindError {
    fn into_response(self) -> Response {
        self.to_response(true)
    }
}
