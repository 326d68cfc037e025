//! Error types for credential validation
//!
//! This module defines all error types that can occur while validating a
//! request's credentials, issuing bearer tokens, and talking to the
//! authorization stores.

use platform_acl::AclError;
use thiserror::Error;

use crate::store::StoreError;

/// Authentication error types.
///
/// The first four variants are the provider decisions a host maps onto its
/// responses. The remaining variants carry failures of the engine, the
/// stores, or the signing configuration.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The credential scheme is not supported by the provider
    #[error("Authorization method is not supported")]
    Unsupported,

    /// Credential material is present but cannot be decoded
    #[error("Authorization is malformed")]
    Malformed,

    /// No credential, or a credential that does not verify
    #[error("Unauthorized")]
    Unauthorized,

    /// The credential is valid but no policy grants access
    #[error("Forbidden")]
    Forbidden,

    /// Policy evaluation failed
    #[error("Evaluation error: {0}")]
    Evaluation(AclError),

    /// The authorization store failed unexpectedly
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A message could not be signed
    #[error("Signature error: {0}")]
    Signature(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

impl From<AclError> for AuthError {
    /// Request-shape errors become provider decisions; the rest propagate.
    fn from(err: AclError) -> Self {
        match err {
            AclError::NoAuthorization => AuthError::Unauthorized,
            AclError::MalformedRequest => AuthError::Malformed,
            AclError::UnsupportedMethod(_) => AuthError::Unsupported,
            other => AuthError::Evaluation(other),
        }
    }
}

impl AuthError {
    /// Check if this error should be logged at error level.
    ///
    /// Refused requests are expected and should not be logged as errors.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            AuthError::Store(_) | AuthError::Signature(_) | AuthError::ConfigError(_)
        )
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::Unsupported | AuthError::Unauthorized => 401,
            AuthError::Forbidden => 403,
            AuthError::Malformed => 400,

            AuthError::Evaluation(AclError::MethodNotSupported(_)) => 405,
            AuthError::Evaluation(_) => 400,

            AuthError::Store(_) | AuthError::Signature(_) | AuthError::ConfigError(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Unsupported => "UNSUPPORTED",
            AuthError::Malformed => "MALFORMED",
            AuthError::Unauthorized => "UNAUTHORIZED",
            AuthError::Forbidden => "FORBIDDEN",
            AuthError::Evaluation(e) => e.error_code(),
            AuthError::Store(_) => "STORE_ERROR",
            AuthError::Signature(_) => "SIGNATURE_ERROR",
            AuthError::ConfigError(_) => "CONFIG_ERROR",
        }
    }
}
