//! Declared response shapes.

use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{json, Value};

pub const APPLICATION_JSON: &str = "application/json";
pub const TEXT_PLAIN: &str = "text/plain";

/// Schema of a response payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadSchema {
    /// Schema name, used as the component key when the schema is not inline.
    pub name: String,
    pub schema: Value,
    /// Whether the schema is embedded instead of referenced.
    pub inline: bool,
}

impl PayloadSchema {
    pub fn of<T: JsonSchema>() -> Self {
        let mut schema =
            serde_json::to_value(schemars::schema_for!(T)).unwrap_or_else(|_| json!({}));
        if let Some(obj) = schema.as_object_mut() {
            obj.remove("$schema");
        }
        Self {
            name: T::schema_name().into_owned(),
            schema,
            inline: T::inline_schema(),
        }
    }
}

/// One documented possible response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultDeclaration {
    MimeTyped {
        status: u16,
        mime: String,
        /// `None` for responses without a body.
        payload: Option<PayloadSchema>,
    },
}

impl ResultDeclaration {
    pub fn status(&self) -> u16 {
        match self {
            ResultDeclaration::MimeTyped { status, .. } => *status,
        }
    }
}

/// Fluent accumulator of result declarations.
///
/// Keeps declaration order and allows duplicates; when the same status and
/// MIME type are declared twice, the later declaration wins once projected.
///
/// ```ignore
/// |r: &mut Results| {
///     r.json::<User>(200).json::<ErrorBody>(404).empty(204);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Results {
    declarations: Vec<ResultDeclaration>,
}

impl Results {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a `status` response of `mime` carrying a `T`.
    pub fn mime<T: JsonSchema>(&mut self, status: u16, mime: impl Into<String>) -> &mut Self {
        self.declarations.push(ResultDeclaration::MimeTyped {
            status,
            mime: mime.into(),
            payload: Some(PayloadSchema::of::<T>()),
        });
        self
    }

    /// Declare a JSON response carrying a `T`.
    pub fn json<T: JsonSchema>(&mut self, status: u16) -> &mut Self {
        self.mime::<T>(status, APPLICATION_JSON)
    }

    /// Declare a plain-text response.
    pub fn text(&mut self, status: u16) -> &mut Self {
        self.mime::<String>(status, TEXT_PLAIN)
    }

    /// Declare a response without a body.
    pub fn empty(&mut self, status: u16) -> &mut Self {
        self.declarations.push(ResultDeclaration::MimeTyped {
            status,
            mime: String::new(),
            payload: None,
        });
        self
    }

    pub fn declarations(&self) -> &[ResultDeclaration] {
        &self.declarations
    }

    pub fn into_declarations(self) -> Vec<ResultDeclaration> {
        self.declarations
    }
}
