use axum::extract::rejection::RawPathParamsRejection;
use axum::extract::FromRequestParts;
use http_body_util::LengthLimitError;
use tracing::debug;

use crate::error::BindError;
use crate::handler::BindOptions;
use crate::http::header::is_form_urlencoded;
use crate::http::{Body, Bytes, HeaderMap, Method, Parts, RawPathParams, Request, Uri};
use crate::param::ParamLocation;

/// Parse a query string into key-value pairs.
pub fn parse_query_string(query: Option<&str>) -> Vec<(String, String)> {
    match query {
        Some(q) => parse_urlencoded(q.as_bytes()),
        None => Vec::new(),
    }
}

fn parse_urlencoded(input: &[u8]) -> Vec<(String, String)> {
    form_urlencoded::parse(input)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn first<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k.as_str() == key)
        .map(|(_, v)| v.as_str())
}

/// The per-request view that descriptors bind against.
///
/// Built once per request by the documented handler. Path parameters come
/// from the matched route, query parameters from the URI, and form
/// parameters from an `application/x-www-form-urlencoded` body when the
/// route declares at least one form parameter. Lookups of repeated keys
/// return the first occurrence.
#[derive(Debug)]
pub struct RequestContext {
    parts: Parts,
    path: Vec<(String, String)>,
    path_rejection: Option<String>,
    query: Vec<(String, String)>,
    form: Option<Vec<(String, String)>>,
    body: Body,
}

impl RequestContext {
    /// Split an incoming request into a binding context.
    ///
    /// The body is buffered only when `read_form` is set and the request is
    /// urlencoded; otherwise it is left untouched for the business logic.
    pub async fn from_request<S: Send + Sync>(
        request: Request,
        state: &S,
        options: &BindOptions,
        read_form: bool,
    ) -> Result<Self, BindError> {
        let (mut parts, body) = request.into_parts();

        let (path, path_rejection) = match RawPathParams::from_request_parts(&mut parts, state).await
        {
            Ok(params) => (
                params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                None,
            ),
            Err(RawPathParamsRejection::MissingPathParams(_)) => {
                debug!("route carries no path parameters");
                (Vec::new(), None)
            }
            Err(rejection) => {
                debug!(%rejection, "path parameters could not be decoded");
                (Vec::new(), Some(rejection.body_text()))
            }
        };
        let query = parse_query_string(parts.uri.query());

        let (form, body) = if read_form && is_form_urlencoded(&parts.headers) {
            let bytes = read_form_body(body, options.form_body_limit).await?;
            (Some(parse_urlencoded(&bytes)), Body::from(bytes))
        } else {
            (None, body)
        };

        Ok(Self {
            parts,
            path,
            path_rejection,
            query,
            form,
            body,
        })
    }

    /// Replace the path parameters, for contexts built outside a router.
    pub fn with_path_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.path = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.path_rejection = None;
        self
    }

    /// Raw value for `key` in the given location.
    pub fn raw(&self, location: ParamLocation, key: &str) -> Option<&str> {
        match location {
            ParamLocation::Path => self.path_param(key),
            ParamLocation::Query => self.query_param(key),
            ParamLocation::Form => self.form_param(key),
        }
    }

    /// Why the matched path segments could not be decoded (e.g. invalid
    /// UTF-8 after percent-decoding). Path lookups are meaningless then.
    pub fn path_rejection(&self) -> Option<&str> {
        self.path_rejection.as_deref()
    }

    pub fn path_param(&self, key: &str) -> Option<&str> {
        first(&self.path, key)
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        first(&self.query, key)
    }

    /// Form value for `key`. Always `None` when the body was not a form.
    pub fn form_param(&self, key: &str) -> Option<&str> {
        self.form.as_deref().and_then(|pairs| first(pairs, key))
    }

    /// Whether an urlencoded body was read for this request.
    pub fn has_form(&self) -> bool {
        self.form.is_some()
    }

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Request extension of type `T`, e.g. one inserted by an `Extension` layer.
    pub fn extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.parts.extensions.get::<T>()
    }

    pub fn parts(&self) -> &Parts {
        &self.parts
    }

    /// Take the request body. A form body that was read for binding is
    /// handed back in full.
    pub fn into_body(self) -> Body {
        self.body
    }
}

async fn read_form_body(body: Body, limit: usize) -> Result<Bytes, BindError> {
    axum::body::to_bytes(body, limit).await.map_err(|err| {
        if exceeded_limit(&err) {
            BindError::BodyTooLarge { limit }
        } else {
            BindError::Body(err.to_string())
        }
    })
}

fn exceeded_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(current) = source {
        if current.is::<LengthLimitError>() {
            return true;
        }
        source = current.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_string_pairs_are_decoded() {
        let pairs = parse_query_string(Some("q=hello%20world&tag=a+b&empty="));
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "hello world".to_string()),
                ("tag".to_string(), "a b".to_string()),
                ("empty".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn missing_query_string_is_empty() {
        assert!(parse_query_string(None).is_empty());
    }

    #[test]
    fn first_occurrence_wins() {
        let pairs = parse_query_string(Some("page=1&page=2"));
        assert_eq!(first(&pairs, "page"), Some("1"));
        assert_eq!(first(&pairs, "size"), None);
    }
}
