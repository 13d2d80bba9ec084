use serde::Serialize;

use crate::param::{ParamLocation, ParamSpec};
use crate::results::{ResultDeclaration, Results};

/// Documentation of one operation, built once when the route is registered.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OperationDoc {
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub deprecated: bool,
    pub params: Vec<ParamSpec>,
    pub responses: Vec<ResultDeclaration>,
}

impl OperationDoc {
    /// Build the documentation for a route.
    ///
    /// Applies `configure` first, then every declaration collected by
    /// `declare`, then the parameter specs in declared order.
    pub fn build(
        configure: impl FnOnce(&mut OperationDoc),
        declare: impl FnOnce(&mut Results),
        params: Vec<ParamSpec>,
    ) -> Self {
        let mut doc = OperationDoc::default();
        configure(&mut doc);

        let mut results = Results::new();
        declare(&mut results);
        doc.responses.extend(results.into_declarations());

        doc.params.extend(params);
        doc
    }

    pub fn operation_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.operation_id = Some(id.into());
        self
    }

    pub fn summary(&mut self, summary: impl Into<String>) -> &mut Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn tag(&mut self, tag: impl Into<String>) -> &mut Self {
        self.tags.push(tag.into());
        self
    }

    pub fn deprecated(&mut self) -> &mut Self {
        self.deprecated = true;
        self
    }

    /// Parameters read from `location`, in declared order.
    pub fn params_in(&self, location: ParamLocation) -> impl Iterator<Item = &ParamSpec> {
        self.params.iter().filter(move |p| p.location == location)
    }
}

/// Fallback operation id derived from the method and path,
/// e.g. `GET /users/{id}` becomes `get_users_id`.
pub fn default_operation_id(method: &str, path: &str) -> String {
    let mut id = method.to_lowercase();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        let cleaned: String = segment
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        if !cleaned.is_empty() {
            id.push('_');
            id.push_str(&cleaned);
        }
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::{form, query, Descriptor};

    #[test]
    fn build_applies_config_results_then_params() {
        let doc = OperationDoc::build(
            |d| {
                d.summary("List users").tag("users");
            },
            |r| {
                r.text(200).empty(204);
            },
            vec![query::<i32>("page").spec(), form::<String>("name").spec()],
        );

        assert_eq!(doc.summary.as_deref(), Some("List users"));
        assert_eq!(doc.tags, vec!["users"]);
        assert_eq!(doc.responses.len(), 2);
        assert_eq!(doc.params.len(), 2);
        assert_eq!(doc.params[0].name, "page");
        assert_eq!(doc.params_in(ParamLocation::Form).count(), 1);
    }

    #[test]
    fn empty_blocks_give_empty_doc() {
        let doc = OperationDoc::build(|_| {}, |_| {}, Vec::new());
        assert_eq!(doc, OperationDoc::default());
    }

    #[test]
    fn operation_id_from_method_and_path() {
        assert_eq!(default_operation_id("GET", "/users/{id}"), "get_users_id");
        assert_eq!(default_operation_id("POST", "/"), "post");
        assert_eq!(default_operation_id("DELETE", "/a-b/c"), "delete_ab_c");
    }
}
