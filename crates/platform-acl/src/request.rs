//! HTTP-shaped requests
//!
//! The evaluation engine only needs a request's verb, path, headers and
//! query string. Hosts adapt whatever server framework they run into this
//! shape at the boundary; requests from the `http` crate convert directly.
//!
//! Policies match against the percent-decoded path, so `/a/%62` and `/a/b`
//! name the same resource.

use http::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::{AclError, AclResult};

/// An incoming request as seen by policies and credential providers.
///
/// # Example
///
/// ```
/// use platform_acl::Request;
///
/// let req = Request::new("GET", "/companies/ABC%31%32%33?auth=dGVzdDpzZWNyZXQ%3D")
///     .with_header("Authorization", "Basic dGVzdDpzZWNyZXQ=");
///
/// assert_eq!(req.path().unwrap(), "/companies/ABC123");
/// assert_eq!(req.raw_path(), "/companies/ABC%31%32%33");
/// assert_eq!(req.query_param("auth").as_deref(), Some("dGVzdDpzZWNyZXQ="));
/// assert_eq!(req.header("authorization"), Some("Basic dGVzdDpzZWNyZXQ="));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: String,
    raw_path: String,
    /// Decoded path; `None` when the raw path is not valid percent-encoded UTF-8
    path: Option<String>,
    query: Option<String>,
    headers: HeaderMap,
}

impl Request {
    /// Create a request from a verb and a request target (`/path?query`).
    ///
    /// The path is decoded once, here. A path with a malformed escape is
    /// kept so the request can still be logged, but [`Request::path`]
    /// refuses it.
    pub fn new(method: impl Into<String>, target: &str) -> Self {
        let (raw_path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (target, None),
        };
        Self {
            method: method.into(),
            path: percent_decode(raw_path),
            raw_path: raw_path.to_string(),
            query,
            headers: HeaderMap::new(),
        }
    }

    /// Set a header, replacing any previous value with the same name.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Set a header, replacing any previous value with the same name.
    ///
    /// Names or values that are not valid HTTP header text are ignored.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        let name = HeaderName::from_bytes(name.as_bytes());
        let value = HeaderValue::from_str(&value.into());
        if let (Ok(name), Ok(value)) = (name, value) {
            self.headers.insert(name, value);
        }
    }

    /// Get the request verb.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Get the percent-decoded request path, without the query string.
    ///
    /// # Errors
    ///
    /// Returns [`AclError::MalformedRequest`] if the path contains a
    /// malformed escape or does not decode to UTF-8.
    pub fn path(&self) -> AclResult<&str> {
        self.path.as_deref().ok_or(AclError::MalformedRequest)
    }

    /// Get the path exactly as it was received.
    pub fn raw_path(&self) -> &str {
        &self.raw_path
    }

    /// Get the raw query string, if any.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Get a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get the first decoded value of a query parameter.
    ///
    /// The query is parsed as `application/x-www-form-urlencoded`, so `+`
    /// decodes to a space.
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

impl<B> From<&http::Request<B>> for Request {
    fn from(req: &http::Request<B>) -> Self {
        let target = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let mut out = Request::new(req.method().as_str(), target);
        out.headers = req.headers().clone();
        out
    }
}

/// Decode a percent-encoded string, rejecting malformed escapes.
pub(crate) fn percent_decode(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return None;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    urlencoding::decode(text).ok().map(|s| s.into_owned())
}
