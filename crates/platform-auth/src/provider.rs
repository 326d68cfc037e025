//! Credential provider abstraction
//!
//! A provider extracts credentials from a request, turns them into an ordered
//! policy list, and resolves the list to a decision.

use async_trait::async_trait;
use platform_acl::{Decision, Request};
use tracing::debug;

use crate::error::{AuthError, AuthResult};

/// Validates the credentials carried by a request.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the provider name used in logs.
    fn name(&self) -> &'static str;

    /// Validate a request.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the request is authorized, otherwise the reason it is not
    async fn validate(&self, req: &Request) -> AuthResult<()>;
}

/// Turn a resolution decision into a provider result.
pub(crate) fn authorize(provider: &'static str, req: &Request, decision: Decision) -> AuthResult<()> {
    match decision {
        Decision::Allow { index } => {
            debug!(
                provider,
                method = %req.method(),
                path = %req.raw_path(),
                policy = index,
                "Request authorized"
            );
            Ok(())
        }
        Decision::Deny { index } => {
            debug!(
                provider,
                method = %req.method(),
                path = %req.raw_path(),
                policy = index,
                "Request denied by policy"
            );
            Err(AuthError::Forbidden)
        }
        Decision::NoMatch => {
            debug!(
                provider,
                method = %req.method(),
                path = %req.raw_path(),
                "No policy matched, denying by default"
            );
            Err(AuthError::Forbidden)
        }
    }
}
