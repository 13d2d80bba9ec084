use bindery_core::http::StatusCode;
use bindery_core::{BinderyConfig, ParamLocation, ParamSpec, ResultDeclaration, RouteDoc};
use serde_json::{json, Map, Value};

use crate::schema::SchemaRegistry;

pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Configuration for the generated OpenAPI document.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenApiConfig {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
    /// Route serving the JSON document.
    pub path: String,
}

impl OpenApiConfig {
    pub const DEFAULT_PATH: &'static str = "/openapi.json";

    pub fn new(title: &str, version: &str) -> Self {
        Self {
            title: title.to_string(),
            version: version.to_string(),
            description: None,
            path: Self::DEFAULT_PATH.to_string(),
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Read `openapi.title`, `openapi.version`, `openapi.description` and
    /// `openapi.path`.
    pub fn from_config(config: &BinderyConfig) -> Self {
        Self {
            title: config.get_or("openapi.title", "API".to_string()),
            version: config.get_or("openapi.version", "0.1.0".to_string()),
            description: config.get_or("openapi.description", None),
            path: config.get_or("openapi.path", Self::DEFAULT_PATH.to_string()),
        }
    }
}

/// Build an OpenAPI 3.1.0 JSON document from config and collected routes.
pub fn build_spec(config: &OpenApiConfig, routes: &[RouteDoc]) -> Value {
    let mut paths: Map<String, Value> = Map::new();
    let mut registry = SchemaRegistry::new();

    for route in routes {
        let op = &route.operation;
        let mut operation: Map<String, Value> = Map::new();

        if let Some(ref id) = op.operation_id {
            operation.insert("operationId".into(), json!(id));
        }
        if !op.tags.is_empty() {
            operation.insert("tags".into(), json!(op.tags));
        }
        if let Some(ref summary) = op.summary {
            operation.insert("summary".into(), json!(summary));
        }
        if let Some(ref description) = op.description {
            operation.insert("description".into(), json!(description));
        }
        if op.deprecated {
            operation.insert("deprecated".into(), json!(true));
        }

        let params: Vec<Value> = op
            .params
            .iter()
            .filter(|p| p.location != ParamLocation::Form)
            .map(|p| parameter(p, &mut registry))
            .collect();
        if !params.is_empty() {
            operation.insert("parameters".into(), json!(params));
        }

        if let Some(body) = form_body(op.params_in(ParamLocation::Form), &mut registry) {
            operation.insert("requestBody".into(), body);
        }

        operation.insert(
            "responses".into(),
            responses(&op.responses, &mut registry),
        );

        let path_entry = paths.entry(route.path.clone()).or_insert_with(|| json!({}));
        if let Some(obj) = path_entry.as_object_mut() {
            obj.insert(route.method.to_lowercase(), Value::Object(operation));
        }
    }

    let mut info: Map<String, Value> = Map::new();
    info.insert("title".into(), json!(config.title));
    info.insert("version".into(), json!(config.version));
    if let Some(ref desc) = config.description {
        info.insert("description".into(), json!(desc));
    }

    let mut doc = json!({
        "openapi": "3.1.0",
        "info": info,
        "paths": paths,
    });
    if !registry.is_empty() {
        doc["components"] = json!({ "schemas": registry.into_schemas() });
    }
    doc
}

/// Parameter schema, carrying nullability and the documented default.
fn param_schema(spec: &ParamSpec, registry: &mut SchemaRegistry) -> Value {
    let mut schema = registry.embed(&spec.schema);
    if spec.nullable {
        schema = nullable_schema(schema);
    }
    if let (Some(default), Some(obj)) = (&spec.default, schema.as_object_mut()) {
        obj.insert("default".into(), default.clone());
    }
    schema
}

/// OpenAPI 3.1 nullability: `"null"` joins the `type` list (and any `enum`),
/// or the schema is wrapped in `anyOf` when it has no plain type (e.g. a
/// `$ref`).
fn nullable_schema(mut schema: Value) -> Value {
    if let Some(Value::Array(values)) = schema.get_mut("enum") {
        if !values.contains(&Value::Null) {
            values.push(Value::Null);
        }
    }
    match schema.get("type").cloned() {
        Some(Value::String(ty)) => {
            schema["type"] = json!([ty, "null"]);
            schema
        }
        Some(Value::Array(mut types)) => {
            if !types.iter().any(|t| t == "null") {
                types.push(json!("null"));
            }
            schema["type"] = Value::Array(types);
            schema
        }
        _ => json!({ "anyOf": [schema, { "type": "null" }] }),
    }
}

fn parameter(spec: &ParamSpec, registry: &mut SchemaRegistry) -> Value {
    let mut param = json!({
        "name": spec.name,
        "in": spec.location.as_str(),
        "required": spec.required,
        "schema": param_schema(spec, registry),
    });
    if let Some(ref description) = spec.description {
        param["description"] = json!(description);
    }
    param
}

/// Form parameters as an urlencoded object body, or `None` without any.
fn form_body<'a>(
    specs: impl Iterator<Item = &'a ParamSpec>,
    registry: &mut SchemaRegistry,
) -> Option<Value> {
    let mut properties: Map<String, Value> = Map::new();
    let mut required: Vec<Value> = Vec::new();

    for spec in specs {
        let mut schema = param_schema(spec, registry);
        if let (Some(description), Some(obj)) = (&spec.description, schema.as_object_mut()) {
            obj.insert("description".into(), json!(description));
        }
        if spec.required {
            required.push(json!(spec.name));
        }
        properties.insert(spec.name.clone(), schema);
    }

    if properties.is_empty() {
        return None;
    }

    let mut schema = json!({ "type": "object", "properties": properties });
    if !required.is_empty() {
        schema["required"] = json!(required);
    }
    Some(json!({
        "required": !required.is_empty(),
        "content": {
            FORM_URLENCODED: { "schema": schema }
        }
    }))
}

fn status_description(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Response")
}

/// Declarations grouped by status then MIME type. A later declaration for
/// the same pair replaces the earlier one.
fn responses(declarations: &[ResultDeclaration], registry: &mut SchemaRegistry) -> Value {
    if declarations.is_empty() {
        return json!({ "default": { "description": "Default response" } });
    }

    let mut responses: Map<String, Value> = Map::new();
    for declaration in declarations {
        let ResultDeclaration::MimeTyped {
            status,
            mime,
            payload,
        } = declaration;

        let entry = responses
            .entry(status.to_string())
            .or_insert_with(|| json!({ "description": status_description(*status) }));

        if mime.is_empty() {
            continue;
        }
        let media = match payload {
            Some(payload) => json!({ "schema": registry.payload(payload) }),
            None => json!({}),
        };
        if let Some(obj) = entry.as_object_mut() {
            let content = obj.entry("content").or_insert_with(|| json!({}));
            if let Some(content) = content.as_object_mut() {
                content.insert(mime.clone(), media);
            }
        }
    }
    Value::Object(responses)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullable_scalar_gains_null_type() {
        let schema = nullable_schema(json!({ "type": "integer", "format": "int32" }));
        assert_eq!(schema, json!({ "type": ["integer", "null"], "format": "int32" }));
    }

    #[test]
    fn nullable_type_list_is_not_duplicated() {
        let schema = nullable_schema(json!({ "type": ["string", "null"] }));
        assert_eq!(schema["type"], json!(["string", "null"]));
    }

    #[test]
    fn nullable_enum_admits_null() {
        let schema = nullable_schema(json!({ "type": "string", "enum": ["cat", "dog"] }));
        assert_eq!(schema["type"], json!(["string", "null"]));
        assert_eq!(schema["enum"], json!(["cat", "dog", null]));
    }

    #[test]
    fn nullable_reference_is_wrapped() {
        let schema = nullable_schema(json!({ "$ref": "#/components/schemas/Pet" }));
        assert_eq!(
            schema,
            json!({ "anyOf": [{ "$ref": "#/components/schemas/Pet" }, { "type": "null" }] })
        );
    }
}
