pub use axum::http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
pub use axum::http::request::Parts;
pub use axum::http::{HeaderMap, Method, StatusCode, Uri};

/// MIME type of urlencoded form bodies.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Whether the request headers announce an urlencoded form body.
///
/// Parameters after `;` (e.g. `charset=utf-8`) are ignored.
pub fn is_form_urlencoded(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case(FORM_URLENCODED))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn detects_form_content_type() {
        assert!(is_form_urlencoded(&headers_with(FORM_URLENCODED)));
        assert!(is_form_urlencoded(&headers_with(
            "Application/X-WWW-Form-Urlencoded; charset=utf-8"
        )));
    }

    #[test]
    fn rejects_other_content_types() {
        assert!(!is_form_urlencoded(&headers_with("application/json")));
        assert!(!is_form_urlencoded(&HeaderMap::new()));
    }
}
