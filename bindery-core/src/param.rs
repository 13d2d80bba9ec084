//! Parameter descriptors.
//!
//! A descriptor names one request value (its location and wire key), how
//! to coerce it, and what to do when it is missing. Descriptors are built
//! once when a route is registered and are read-only afterwards.
//!
//! ```ignore
//! use bindery_core::param::{path, query};
//!
//! let id = path::<i64>("id");
//! let page = query::<i32>("page").default_value(0);
//! let search = query::<String>("q").nullable().description("Free-text filter");
//! ```

use std::marker::PhantomData;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::context::RequestContext;
use crate::error::BindError;
use crate::scalar::{Binder, Scalar};

/// Where a parameter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Path,
    Query,
    Form,
}

impl ParamLocation {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamLocation::Path => "path",
            ParamLocation::Query => "query",
            ParamLocation::Form => "form",
        }
    }
}

impl std::fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Documentation projection of a descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSpec {
    pub name: String,
    pub location: ParamLocation,
    pub schema: Value,
    /// Non-nullable and without a default.
    pub required: bool,
    pub nullable: bool,
    pub default: Option<Value>,
    pub description: Option<String>,
}

/// A bound request parameter.
pub trait Descriptor: Send + Sync + 'static {
    /// The value handed to business logic.
    type Output: Send + 'static;

    fn location(&self) -> ParamLocation;

    /// Documentation for this parameter.
    fn spec(&self) -> ParamSpec;

    /// Resolve the parameter against a request.
    fn bind(&self, ctx: &RequestContext) -> Result<Self::Output, BindError>;
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Required {}
    impl Sealed for super::Nullable {}
}

/// Marker: the parameter resolves to `T`.
#[derive(Debug, Clone, Copy)]
pub struct Required;

/// Marker: the parameter resolves to `Option<T>`.
#[derive(Debug, Clone, Copy)]
pub struct Nullable;

/// How a resolved (or absent) value becomes the output type.
pub trait Nullability: sealed::Sealed + Send + Sync + 'static {
    const NULLABLE: bool;

    type Output<T: Send + 'static>: Send + 'static;

    /// Apply the default/nullable rules. `None` is a hard failure.
    fn resolve<T: Clone + Send + 'static>(
        value: Option<T>,
        default: Option<&T>,
    ) -> Option<Self::Output<T>>;
}

impl Nullability for Required {
    const NULLABLE: bool = false;

    type Output<T: Send + 'static> = T;

    fn resolve<T: Clone + Send + 'static>(
        value: Option<T>,
        default: Option<&T>,
    ) -> Option<Self::Output<T>> {
        value.or_else(|| default.cloned())
    }
}

impl Nullability for Nullable {
    const NULLABLE: bool = true;

    type Output<T: Send + 'static> = Option<T>;

    fn resolve<T: Clone + Send + 'static>(
        value: Option<T>,
        default: Option<&T>,
    ) -> Option<Self::Output<T>> {
        Some(value.or_else(|| default.cloned()))
    }
}

/// A query or form parameter descriptor.
pub struct Param<T, N = Required> {
    name: String,
    location: ParamLocation,
    binder: Binder<T>,
    default: Option<T>,
    description: Option<String>,
    _nullability: PhantomData<fn() -> N>,
}

impl<T: Clone, N> Clone for Param<T, N> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            location: self.location,
            binder: self.binder.clone(),
            default: self.default.clone(),
            description: self.description.clone(),
            _nullability: PhantomData,
        }
    }
}

impl<T: std::fmt::Debug, N: Nullability> std::fmt::Debug for Param<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Param")
            .field("name", &self.name)
            .field("location", &self.location)
            .field("nullable", &N::NULLABLE)
            .field("default", &self.default)
            .finish()
    }
}

impl<T> Param<T, Required> {
    fn new(location: ParamLocation, name: impl Into<String>, binder: Binder<T>) -> Self {
        Self {
            name: name.into(),
            location,
            binder,
            default: None,
            description: None,
            _nullability: PhantomData,
        }
    }

    /// Resolve to `Option<T>` instead of failing when the value is absent.
    pub fn nullable(self) -> Param<T, Nullable> {
        Param {
            name: self.name,
            location: self.location,
            binder: self.binder,
            default: self.default,
            description: self.description,
            _nullability: PhantomData,
        }
    }
}

impl<T, N> Param<T, N> {
    /// Value used when the request does not carry a usable one.
    pub fn default_value(mut self, value: T) -> Self {
        self.default = Some(value);
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T, N> Descriptor for Param<T, N>
where
    T: Clone + Send + Sync + 'static,
    N: Nullability,
{
    type Output = N::Output<T>;

    fn location(&self) -> ParamLocation {
        self.location
    }

    fn spec(&self) -> ParamSpec {
        ParamSpec {
            name: self.name.clone(),
            location: self.location,
            schema: self.binder.schema().clone(),
            required: !N::NULLABLE && self.default.is_none(),
            nullable: N::NULLABLE,
            default: self.default.as_ref().map(|d| self.binder.document(d)),
            description: self.description.clone(),
        }
    }

    fn bind(&self, ctx: &RequestContext) -> Result<Self::Output, BindError> {
        if let (ParamLocation::Path, Some(reason)) = (self.location, ctx.path_rejection()) {
            warn!(param = %self.name, %reason, "path segment rejected");
            return Err(BindError::Invalid {
                name: self.name.clone(),
                location: self.location,
                reason: reason.to_string(),
            });
        }

        let raw = ctx.raw(self.location, &self.name);
        let value = match raw {
            Some(raw) => match self.binder.coerce(raw) {
                Ok(value) => value,
                Err(reason) => {
                    warn!(param = %self.name, location = %self.location, %reason, "parameter rejected");
                    return Err(BindError::Invalid {
                        name: self.name.clone(),
                        location: self.location,
                        reason,
                    });
                }
            },
            None => None,
        };

        if value.is_none() {
            debug!(
                param = %self.name,
                location = %self.location,
                present = raw.is_some(),
                "parameter absent, applying default/nullable rules"
            );
        }

        N::resolve(value, self.default.as_ref()).ok_or_else(|| {
            let err = match raw {
                Some(_) => BindError::Malformed {
                    name: self.name.clone(),
                    location: self.location,
                    expected: self.binder.expected(),
                },
                None => BindError::Missing {
                    name: self.name.clone(),
                    location: self.location,
                },
            };
            warn!(param = %self.name, location = %self.location, error = %err, "required parameter unresolved");
            err
        })
    }
}

/// A path parameter descriptor. Always required, never defaulted.
pub struct PathParam<T> {
    inner: Param<T, Required>,
}

impl<T: Clone> Clone for PathParam<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for PathParam<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathParam")
            .field("name", &self.inner.name)
            .finish()
    }
}

impl<T> PathParam<T> {
    pub fn description(self, text: impl Into<String>) -> Self {
        Self {
            inner: self.inner.description(text),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }
}

impl<T: Clone + Send + Sync + 'static> Descriptor for PathParam<T> {
    type Output = T;

    fn location(&self) -> ParamLocation {
        ParamLocation::Path
    }

    fn spec(&self) -> ParamSpec {
        self.inner.spec()
    }

    fn bind(&self, ctx: &RequestContext) -> Result<T, BindError> {
        self.inner.bind(ctx)
    }
}

// ── Constructors ────────────────────────────────────────────────────────

/// Scalar path parameter.
pub fn path<T: Scalar>(name: impl Into<String>) -> PathParam<T> {
    PathParam {
        inner: Param::new(ParamLocation::Path, name, Binder::scalar()),
    }
}

/// Scalar query parameter.
pub fn query<T: Scalar>(name: impl Into<String>) -> Param<T> {
    Param::new(ParamLocation::Query, name, Binder::scalar())
}

/// Scalar urlencoded form parameter.
pub fn form<T: Scalar>(name: impl Into<String>) -> Param<T> {
    Param::new(ParamLocation::Form, name, Binder::scalar())
}

/// Serde-bound path parameter. Deserialization failures are hard errors.
pub fn path_as<T>(name: impl Into<String>) -> PathParam<T>
where
    T: DeserializeOwned + Serialize + JsonSchema + Clone + Send + Sync + 'static,
{
    PathParam {
        inner: Param::new(ParamLocation::Path, name, Binder::delegated()),
    }
}

/// Serde-bound query parameter. Deserialization failures are hard errors.
pub fn query_as<T>(name: impl Into<String>) -> Param<T>
where
    T: DeserializeOwned + Serialize + JsonSchema + Clone + Send + Sync + 'static,
{
    Param::new(ParamLocation::Query, name, Binder::delegated())
}

/// Serde-bound form parameter. Deserialization failures are hard errors.
pub fn form_as<T>(name: impl Into<String>) -> Param<T>
where
    T: DeserializeOwned + Serialize + JsonSchema + Clone + Send + Sync + 'static,
{
    Param::new(ParamLocation::Form, name, Binder::delegated())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_without_default_fails_on_absence() {
        assert_eq!(Required::resolve(Some(3), None), Some(3));
        assert_eq!(Required::resolve::<i32>(None, None), None);
    }

    #[test]
    fn required_with_default_falls_back() {
        assert_eq!(Required::resolve(None, Some(&10)), Some(10));
        assert_eq!(Required::resolve(Some(4), Some(&10)), Some(4));
    }

    #[test]
    fn nullable_never_fails() {
        assert_eq!(Nullable::resolve::<i32>(None, None), Some(None));
        assert_eq!(Nullable::resolve(None, Some(&"x".to_string())), Some(Some("x".to_string())));
        assert_eq!(Nullable::resolve(Some(1), Some(&2)), Some(Some(1)));
    }

    #[test]
    fn spec_marks_required_only_without_default_or_nullability() {
        assert!(path::<i32>("id").spec().required);
        assert!(query::<i32>("page").spec().required);
        assert!(!query::<i32>("page").default_value(0).spec().required);
        assert!(!query::<String>("q").nullable().spec().required);
        assert!(!form::<bool>("agree").nullable().default_value(true).spec().required);
    }

    #[test]
    fn spec_carries_schema_default_and_description() {
        let spec = query::<i64>("limit")
            .default_value(50)
            .description("Page size")
            .spec();
        assert_eq!(spec.name, "limit");
        assert_eq!(spec.location, ParamLocation::Query);
        assert_eq!(spec.schema, json!({ "type": "integer", "format": "int64" }));
        assert_eq!(spec.default, Some(json!(50)));
        assert_eq!(spec.description.as_deref(), Some("Page size"));
        assert!(!spec.nullable);
    }

    #[test]
    fn location_display() {
        assert_eq!(ParamLocation::Form.to_string(), "form");
        assert_eq!(serde_json::to_value(ParamLocation::Path).unwrap(), json!("path"));
    }
}
