//! Minimal JSON path lookups for response assertions.
//!
//! Supports dot-separated fields, `[n]` indices and a trailing `len()`:
//! `items[0].name`, `items.len()`.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathToken {
    Field(String),
    Index(usize),
    Len,
}

pub fn tokenize_path(path: &str) -> Vec<PathToken> {
    let mut tokens = Vec::new();
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        if segment == "len()" {
            tokens.push(PathToken::Len);
            continue;
        }
        let Some(bracket) = segment.find('[') else {
            tokens.push(PathToken::Field(segment.to_string()));
            continue;
        };
        if bracket > 0 {
            tokens.push(PathToken::Field(segment[..bracket].to_string()));
        }
        let mut rest = &segment[bracket..];
        while let Some(start) = rest.find('[') {
            let end = rest.find(']').expect("unclosed bracket in JSON path");
            let index = rest[start + 1..end]
                .parse()
                .expect("non-numeric index in JSON path");
            tokens.push(PathToken::Index(index));
            rest = &rest[end + 1..];
        }
    }
    tokens
}

/// Resolve `path` against `root`; missing segments resolve to `null`.
pub fn resolve_path(root: &Value, path: &str) -> Value {
    let mut current = root.clone();
    for token in tokenize_path(path) {
        current = match token {
            PathToken::Field(name) => current.get(&name).cloned().unwrap_or(Value::Null),
            PathToken::Index(idx) => current.get(idx).cloned().unwrap_or(Value::Null),
            PathToken::Len => {
                let len = match &current {
                    Value::Array(a) => a.len(),
                    Value::Object(o) => o.len(),
                    Value::String(s) => s.len(),
                    other => panic!("len() applied to non-collection in \"{path}\": {other}"),
                };
                Value::from(len)
            }
        };
    }
    current
}
