//! Basic credential extraction
//!
//! API keys travel as HTTP Basic credentials, either in the `Authorization`
//! header or base64-encoded in the `auth` query parameter:
//!
//! ```text
//! Authorization: Basic base64(key:secret)
//! GET /resource?auth=base64(key:secret)
//! ```
//!
//! The header takes precedence when both are present.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{AclError, AclResult};
use crate::request::Request;

/// Header carrying request credentials.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Query parameter carrying encoded Basic credentials.
pub const AUTH_QUERY_PARAM: &str = "auth";

const BASIC_SCHEME: &str = "basic";

/// A key and secret pair presented by a client.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredential {
    /// Public key identifying the authorization
    pub key: String,
    /// Secret proving possession of the key
    pub secret: String,
}

impl std::fmt::Debug for BasicCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredential")
            .field("key", &self.key)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl BasicCredential {
    /// Obtain the Basic credential carried by a request.
    ///
    /// # Errors
    ///
    /// - [`AclError::NoAuthorization`] if neither the header nor the query
    ///   parameter is present
    /// - [`AclError::MalformedRequest`] if the credential cannot be decoded
    /// - [`AclError::UnsupportedMethod`] if the header names another scheme
    pub fn from_request(req: &Request) -> AclResult<Self> {
        if let Some(auth) = req.header(AUTHORIZATION_HEADER).filter(|v| !v.is_empty()) {
            return Self::from_authorization(auth);
        }
        if let Some(auth) = req.query_param(AUTH_QUERY_PARAM).filter(|v| !v.is_empty()) {
            return Self::from_authorization_data(&auth);
        }
        Err(AclError::NoAuthorization)
    }

    /// Obtain the Basic credential from an `Authorization` header value.
    pub fn from_authorization(header: &str) -> AclResult<Self> {
        let fields: Vec<&str> = header.split_whitespace().collect();
        let [scheme, data] = fields.as_slice() else {
            return Err(AclError::MalformedRequest);
        };
        if !scheme.eq_ignore_ascii_case(BASIC_SCHEME) {
            return Err(AclError::UnsupportedMethod(scheme.to_string()));
        }
        Self::from_authorization_data(data)
    }

    /// Obtain the Basic credential from encoded `key:secret` data.
    pub fn from_authorization_data(data: &str) -> AclResult<Self> {
        let decoded = STANDARD
            .decode(data)
            .map_err(|_| AclError::MalformedRequest)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AclError::MalformedRequest)?;

        let parts: Vec<&str> = decoded.split(':').collect();
        let [key, secret] = parts.as_slice() else {
            return Err(AclError::MalformedRequest);
        };
        Ok(Self {
            key: key.to_string(),
            secret: secret.to_string(),
        })
    }

    /// Encode this credential as `Authorization` header data.
    pub fn encode(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.key, self.secret))
    }

    /// Encode this credential as a complete `Authorization` header value.
    pub fn to_header(&self) -> String {
        format!("Basic {}", self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(key: &str, secret: &str) -> BasicCredential {
        BasicCredential {
            key: key.to_string(),
            secret: secret.to_string(),
        }
    }

    #[test]
    fn test_from_header() {
        let req = Request::new("GET", "/").with_header("Authorization", "Basic dGVzdDpBQkMxMjM=");
        assert_eq!(BasicCredential::from_request(&req), Ok(credential("test", "ABC123")));

        let req = Request::new("GET", "/").with_header("authorization", "BASIC dGVzdDpBQkMxMjM=");
        assert_eq!(BasicCredential::from_request(&req), Ok(credential("test", "ABC123")));
    }

    #[test]
    fn test_from_query() {
        let req = Request::new("GET", "/?auth=dGVzdDpBQkMxMjM%3D");
        assert_eq!(BasicCredential::from_request(&req), Ok(credential("test", "ABC123")));
    }

    #[test]
    fn test_header_takes_precedence() {
        let header = credential("header", "one").to_header();
        let query = credential("query", "two").encode();
        let req = Request::new("GET", &format!("/?auth={}", urlencoding::encode(&query)))
            .with_header("Authorization", header);
        assert_eq!(BasicCredential::from_request(&req), Ok(credential("header", "one")));
    }

    #[test]
    fn test_no_authorization() {
        let req = Request::new("GET", "/companies");
        assert_eq!(BasicCredential::from_request(&req), Err(AclError::NoAuthorization));

        let req = Request::new("GET", "/companies?auth=");
        assert_eq!(BasicCredential::from_request(&req), Err(AclError::NoAuthorization));
    }

    #[test]
    fn test_malformed() {
        assert_eq!(
            BasicCredential::from_authorization("Basic"),
            Err(AclError::MalformedRequest)
        );
        assert_eq!(
            BasicCredential::from_authorization("Basic a b"),
            Err(AclError::MalformedRequest)
        );
        assert_eq!(
            BasicCredential::from_authorization_data("not base64!"),
            Err(AclError::MalformedRequest)
        );
        // "nocolon"
        assert_eq!(
            BasicCredential::from_authorization_data("bm9jb2xvbg=="),
            Err(AclError::MalformedRequest)
        );
        // "a:b:c"
        assert_eq!(
            BasicCredential::from_authorization_data("YTpiOmM="),
            Err(AclError::MalformedRequest)
        );
    }

    #[test]
    fn test_unsupported_scheme() {
        assert_eq!(
            BasicCredential::from_authorization("Digest dGVzdDpBQkMxMjM="),
            Err(AclError::UnsupportedMethod("Digest".to_string()))
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", credential("test", "ABC123"));
        assert!(debug.contains("test"));
        assert!(!debug.contains("ABC123"));
    }
}
