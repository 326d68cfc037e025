//! Error types for policy evaluation and the text codecs
//!
//! This module defines the errors produced while evaluating a request against
//! a policy, extracting credentials from a request, and parsing the textual
//! forms of actions, effects, roles, realms and scopes.

use thiserror::Error;

/// Access control error types.
///
/// Parse errors are deterministic: retrying the same input cannot change the
/// outcome, so callers should surface them directly.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AclError {
    /// The request verb has no action mapping
    #[error("Method not supported: {0}")]
    MethodNotSupported(String),

    /// No credential material is present on the request
    #[error("No authorization")]
    NoAuthorization,

    /// Credential material is present but syntactically invalid
    #[error("Authorization is malformed")]
    MalformedRequest,

    /// The credential scheme is not recognized
    #[error("Authorization method is not supported: {0}")]
    UnsupportedMethod(String),

    /// A realm (domain) could not be parsed
    #[error("Invalid realm: {0}")]
    InvalidRealm(String),

    /// Unknown role name
    #[error("Invalid role: {0:?}")]
    InvalidRole(String),

    /// Unknown effect name
    #[error("Invalid effect: {0:?}")]
    InvalidEffect(String),

    /// Unknown action name
    #[error("Invalid action: {0:?}")]
    InvalidAction(String),

    /// A scope names no resource
    #[error("Empty resource")]
    EmptyResource,

    /// The policy type tag cannot be marshaled or unmarshaled
    #[error("Unsupported policy type: {0:?}")]
    UnsupportedPolicyType(String),

    /// A policy payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for access control operations.
pub type AclResult<T> = Result<T, AclError>;

impl From<serde_json::Error> for AclError {
    fn from(err: serde_json::Error) -> Self {
        AclError::Serialization(err.to_string())
    }
}

impl AclError {
    /// Check if this error came from parsing one of the text codecs.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            AclError::InvalidRealm(_)
                | AclError::InvalidRole(_)
                | AclError::InvalidEffect(_)
                | AclError::InvalidAction(_)
                | AclError::EmptyResource
        )
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AclError::MethodNotSupported(_) => "METHOD_NOT_SUPPORTED",
            AclError::NoAuthorization => "NO_AUTHORIZATION",
            AclError::MalformedRequest => "MALFORMED_REQUEST",
            AclError::UnsupportedMethod(_) => "UNSUPPORTED_METHOD",
            AclError::InvalidRealm(_) => "INVALID_REALM",
            AclError::InvalidRole(_) => "INVALID_ROLE",
            AclError::InvalidEffect(_) => "INVALID_EFFECT",
            AclError::InvalidAction(_) => "INVALID_ACTION",
            AclError::EmptyResource => "EMPTY_RESOURCE",
            AclError::UnsupportedPolicyType(_) => "UNSUPPORTED_POLICY_TYPE",
            AclError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}
