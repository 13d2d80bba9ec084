use serde_json::{json, Map, Value};

use bindery_core::PayloadSchema;

/// Collects the component schemas referenced by a document.
///
/// schemars emits JSON Schema 2020-12 with local `$defs` and
/// `$ref: "#/$defs/X"`; OpenAPI 3.1 wants them under
/// `#/components/schemas/X`. Every schema passing through the registry has
/// its `$defs` promoted to components and its references rewritten.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: Map<String, Value>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema to embed for a payload: a component reference for named
    /// types, the schema itself for inline ones.
    pub fn payload(&mut self, payload: &PayloadSchema) -> Value {
        let schema = self.embed(&payload.schema);
        if payload.inline {
            return schema;
        }
        self.schemas.entry(payload.name.clone()).or_insert(schema);
        json!({ "$ref": format!("#/components/schemas/{}", payload.name) })
    }

    /// Strip `$schema`, promote `$defs` and rewrite references.
    pub fn embed(&mut self, schema: &Value) -> Value {
        let mut schema = schema.clone();
        if let Some(obj) = schema.as_object_mut() {
            obj.remove("$schema");
            if let Some(Value::Object(defs)) = obj.remove("$defs") {
                for (name, mut def) in defs {
                    sanitize_schema(&mut def);
                    self.schemas.entry(name).or_insert(def);
                }
            }
        }
        sanitize_schema(&mut schema);
        schema
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn into_schemas(self) -> Map<String, Value> {
        self.schemas
    }
}

/// Recursively rewrite `#/$defs/` references to `#/components/schemas/`.
fn sanitize_schema(value: &mut Value) {
    match value {
        Value::Object(obj) => {
            if let Some(Value::String(ref_str)) = obj.get_mut("$ref") {
                if ref_str.starts_with("#/$defs/") {
                    *ref_str = ref_str.replace("#/$defs/", "#/components/schemas/");
                }
            }
            for (_, v) in obj.iter_mut() {
                sanitize_schema(v);
            }
        }
        Value::Array(arr) => {
            for v in arr.iter_mut() {
                sanitize_schema(v);
            }
        }
        _ => {}
    }
}
