//! Value coercion for bound parameters.
//!
//! Two strategies exist. Scalars (`String`, `i32`, `i64`, `bool`, `f32`,
//! `f64`) are parsed directly and a failed parse is a soft absence.
//! Every other type goes through serde (see [`Binder::delegated`]) and a
//! failed deserialization is a hard error.
//!
//! The strategy is picked once, when the descriptor is built, and stored
//! as plain function pointers in the [`Binder`].

use schemars::JsonSchema;
use serde::de::value::StrDeserializer;
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::Serialize;
use serde_json::{json, Value};

/// The closed set of directly-parsed scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Text,
    Int32,
    Int64,
    Bool,
    Float32,
    Float64,
}

impl ScalarKind {
    /// OpenAPI `type` keyword.
    pub fn openapi_type(self) -> &'static str {
        match self {
            ScalarKind::Text => "string",
            ScalarKind::Int32 | ScalarKind::Int64 => "integer",
            ScalarKind::Bool => "boolean",
            ScalarKind::Float32 | ScalarKind::Float64 => "number",
        }
    }

    /// OpenAPI `format` keyword, when the type needs one.
    pub fn openapi_format(self) -> Option<&'static str> {
        match self {
            ScalarKind::Text | ScalarKind::Bool => None,
            ScalarKind::Int32 => Some("int32"),
            ScalarKind::Int64 => Some("int64"),
            ScalarKind::Float32 => Some("float"),
            ScalarKind::Float64 => Some("double"),
        }
    }

    /// Schema fragment for this scalar.
    pub fn schema(self) -> Value {
        match self.openapi_format() {
            Some(format) => json!({ "type": self.openapi_type(), "format": format }),
            None => json!({ "type": self.openapi_type() }),
        }
    }

    /// Human-readable description used in error messages.
    pub fn expected(self) -> &'static str {
        match self {
            ScalarKind::Text => "text",
            ScalarKind::Int32 => "a 32-bit integer",
            ScalarKind::Int64 => "a 64-bit integer",
            ScalarKind::Bool => "a boolean (true or false)",
            ScalarKind::Float32 => "a 32-bit float",
            ScalarKind::Float64 => "a 64-bit float",
        }
    }
}

/// A type bound by direct string parsing.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a scalar parameter type",
    label = "not a scalar",
    note = "scalars are String, i32, i64, bool, f32 and f64; use `path_as`, `query_as` or `form_as` for serde-bound types"
)]
pub trait Scalar: Sized + Clone + Send + Sync + 'static {
    const KIND: ScalarKind;

    /// Parse a raw request value. `None` means the value is malformed.
    fn parse(raw: &str) -> Option<Self>;

    /// JSON form of a value, used to document defaults.
    fn to_json(&self) -> Value;
}

impl Scalar for String {
    const KIND: ScalarKind = ScalarKind::Text;

    fn parse(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }

    fn to_json(&self) -> Value {
        Value::String(self.clone())
    }
}

impl Scalar for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn parse(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }

    fn to_json(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! impl_scalar_from_str {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(
            impl Scalar for $ty {
                const KIND: ScalarKind = ScalarKind::$kind;

                fn parse(raw: &str) -> Option<Self> {
                    raw.parse().ok()
                }

                fn to_json(&self) -> Value {
                    json!(self)
                }
            }
        )+
    };
}

impl_scalar_from_str!(
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
);

enum Strategy<T> {
    Scalar {
        kind: ScalarKind,
        parse: fn(&str) -> Option<T>,
    },
    Delegated {
        deserialize: fn(&str) -> Result<T, String>,
    },
}

/// Coercion strategy, schema and default renderer for one value type.
pub struct Binder<T> {
    strategy: Strategy<T>,
    schema: Value,
    document: fn(&T) -> Value,
}

impl<T> Clone for Binder<T> {
    fn clone(&self) -> Self {
        Self {
            strategy: match self.strategy {
                Strategy::Scalar { kind, parse } => Strategy::Scalar { kind, parse },
                Strategy::Delegated { deserialize } => Strategy::Delegated { deserialize },
            },
            schema: self.schema.clone(),
            document: self.document,
        }
    }
}

impl<T> std::fmt::Debug for Binder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let strategy = match self.strategy {
            Strategy::Scalar { kind, .. } => format!("Scalar({kind:?})"),
            Strategy::Delegated { .. } => "Delegated".to_string(),
        };
        f.debug_struct("Binder")
            .field("strategy", &strategy)
            .field("schema", &self.schema)
            .finish()
    }
}

impl<T: Scalar> Binder<T> {
    /// Direct-parse binder for a scalar type.
    pub fn scalar() -> Self {
        Self {
            strategy: Strategy::Scalar {
                kind: T::KIND,
                parse: T::parse,
            },
            schema: T::KIND.schema(),
            document: T::to_json,
        }
    }
}

impl<T> Binder<T>
where
    T: DeserializeOwned + Serialize + JsonSchema,
{
    /// Serde-backed binder.
    ///
    /// The raw value is first deserialized as a plain string (enums, ids,
    /// dates), then as a JSON literal (numbers, objects).
    pub fn delegated() -> Self {
        let mut schema =
            serde_json::to_value(schemars::schema_for!(T)).unwrap_or_else(|_| json!({}));
        if let Some(obj) = schema.as_object_mut() {
            obj.remove("$schema");
        }
        Self {
            strategy: Strategy::Delegated {
                deserialize: deserialize_raw::<T>,
            },
            schema,
            document: document_serialized::<T>,
        }
    }
}

impl<T> Binder<T> {
    /// Coerce a raw value.
    ///
    /// `Ok(None)` is a soft absence (a scalar that failed to parse),
    /// `Err` is a delegated rejection.
    pub fn coerce(&self, raw: &str) -> Result<Option<T>, String> {
        match self.strategy {
            Strategy::Scalar { parse, .. } => Ok(parse(raw)),
            Strategy::Delegated { deserialize } => deserialize(raw).map(Some),
        }
    }

    /// The scalar kind, or `None` for delegated binders.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self.strategy {
            Strategy::Scalar { kind, .. } => Some(kind),
            Strategy::Delegated { .. } => None,
        }
    }

    /// What a well-formed value looks like, for error messages.
    pub fn expected(&self) -> &'static str {
        match self.strategy {
            Strategy::Scalar { kind, .. } => kind.expected(),
            Strategy::Delegated { .. } => "a valid value",
        }
    }

    /// Schema fragment describing the value type.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// JSON rendering of a value, used for documented defaults.
    pub fn document(&self, value: &T) -> Value {
        (self.document)(value)
    }
}

fn deserialize_raw<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    let plain: StrDeserializer<'_, serde::de::value::Error> = raw.into_deserializer();
    match T::deserialize(plain) {
        Ok(value) => Ok(value),
        Err(plain_err) => serde_json::from_str(raw).map_err(|_| plain_err.to_string()),
    }
}

fn document_serialized<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
    #[serde(rename_all = "lowercase")]
    enum Order {
        Asc,
        Desc,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
    struct Window {
        from: u32,
        to: u32,
    }

    #[test]
    fn well_formed_scalars_parse_exactly() {
        assert_eq!(String::parse("hello"), Some("hello".to_string()));
        assert_eq!(i32::parse("-42"), Some(-42));
        assert_eq!(i64::parse("9007199254740993"), Some(9_007_199_254_740_993));
        assert_eq!(bool::parse("true"), Some(true));
        assert_eq!(bool::parse("false"), Some(false));
        assert_eq!(f32::parse("1.5"), Some(1.5));
        assert_eq!(f64::parse("-0.25"), Some(-0.25));
    }

    #[test]
    fn malformed_scalars_are_absent() {
        assert_eq!(i32::parse("abc"), None);
        assert_eq!(i32::parse("4294967296"), None);
        assert_eq!(i64::parse("1.0"), None);
        assert_eq!(bool::parse("yes"), None);
        assert_eq!(f32::parse("one"), None);
        assert_eq!(f64::parse(""), None);
    }

    #[test]
    fn scalar_binder_is_soft() {
        let binder = Binder::<i32>::scalar();
        assert_eq!(binder.coerce("7"), Ok(Some(7)));
        assert_eq!(binder.coerce("seven"), Ok(None));
        assert_eq!(binder.scalar_kind(), Some(ScalarKind::Int32));
        assert_eq!(binder.schema(), &json!({ "type": "integer", "format": "int32" }));
    }

    #[test]
    fn delegated_binder_reads_plain_strings() {
        let binder = Binder::<Order>::delegated();
        assert_eq!(binder.coerce("desc"), Ok(Some(Order::Desc)));
        assert!(binder.coerce("sideways").is_err());
        assert_eq!(binder.scalar_kind(), None);
    }

    #[test]
    fn delegated_binder_falls_back_to_json() {
        let binder = Binder::<Window>::delegated();
        assert_eq!(
            binder.coerce(r#"{"from":1,"to":5}"#),
            Ok(Some(Window { from: 1, to: 5 }))
        );
        assert!(binder.coerce("1..5").is_err());
        assert!(binder.schema().get("$schema").is_none());
    }

    #[test]
    fn defaults_render_as_json() {
        assert_eq!(Binder::<i64>::scalar().document(&3), json!(3));
        assert_eq!(Binder::<Order>::delegated().document(&Order::Asc), json!("asc"));
    }
}
