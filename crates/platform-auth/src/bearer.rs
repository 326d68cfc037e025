//! Bearer token provider
//!
//! Validates requests carrying a signed list of policies:
//!
//! ```text
//! Authorization: Bearer <signature>$<base64url(json policy list)>
//! ```
//!
//! The policies are evaluated in the order they were signed. The signing key
//! is provisioned once, when the provider is created.

use async_trait::async_trait;
use platform_acl::{resolve, Request, ResourcePolicy, AUTHORIZATION_HEADER};
use std::sync::Arc;
use tracing::debug;

use crate::error::{AuthError, AuthResult};
use crate::provider::{authorize, Provider};
use crate::signing::{JwsSigner, MessageSigner, SignatureError, SigningConfig};

/// Authorization scheme of bearer tokens.
pub const BEARER_SCHEME: &str = "Bearer";

/// Separates the signature from the encoded policy list.
pub const TOKEN_SEPARATOR: char = '$';

/// Provider for signed bearer tokens.
///
/// # Example
///
/// ```rust
/// use platform_acl::{Action, Request, ResourcePolicy};
/// use platform_auth::{BearerProvider, Provider};
///
/// # #[tokio::main]
/// # async fn main() {
/// let provider = BearerProvider::with_secret("your-secret-key").unwrap();
///
/// let token = provider
///     .issue(&[ResourcePolicy::allow(Action::Read, "/companies/*")])
///     .unwrap();
///
/// let req = Request::new("GET", "/companies/ABC")
///     .with_header("Authorization", format!("Bearer {}", token));
/// assert!(provider.validate(&req).await.is_ok());
/// # }
/// ```
#[derive(Clone)]
pub struct BearerProvider {
    signer: Arc<dyn MessageSigner>,
}

impl BearerProvider {
    /// Create a provider with a signer.
    pub fn new(signer: Arc<dyn MessageSigner>) -> Self {
        Self { signer }
    }

    /// Create a provider from signing configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Signing configuration
    ///
    /// # Returns
    ///
    /// Provider or configuration error
    pub fn from_config(config: &SigningConfig) -> AuthResult<Self> {
        Ok(Self::new(Arc::new(JwsSigner::new(config)?)))
    }

    /// Create a provider with an HS256 secret.
    pub fn with_secret(secret: impl Into<String>) -> AuthResult<Self> {
        Self::from_config(&SigningConfig::with_secret(secret))
    }

    /// Sign an ordered list of policies into a bearer token.
    ///
    /// # Arguments
    ///
    /// * `policies` - Policies to grant, in evaluation order
    ///
    /// # Returns
    ///
    /// Token in the form `<signature>$<payload>`, to be sent after the
    /// `Bearer` scheme
    pub fn issue(&self, policies: &[ResourcePolicy]) -> AuthResult<String> {
        let payload = serde_json::to_vec(policies)
            .map_err(|e| AuthError::Signature(format!("Policy encoding failed: {}", e)))?;
        let (signature, encoded) = self.signer.sign(&payload)?;
        Ok(format!("{}{}{}", signature, TOKEN_SEPARATOR, encoded))
    }

    /// Verify a token and decode its policies.
    fn policies(&self, token: &str) -> AuthResult<Vec<ResourcePolicy>> {
        let (signature, encoded) = token
            .split_once(TOKEN_SEPARATOR)
            .ok_or(AuthError::Malformed)?;

        let payload = self.signer.verify(signature, encoded).map_err(|e| match e {
            SignatureError::Invalid => AuthError::Unauthorized,
            SignatureError::Malformed(detail) => {
                debug!(error = %detail, "Bearer token is malformed");
                AuthError::Malformed
            }
        })?;

        serde_json::from_slice(&payload).map_err(|e| {
            debug!(error = %e, "Bearer token payload is not a policy list");
            AuthError::Malformed
        })
    }
}

#[async_trait]
impl Provider for BearerProvider {
    fn name(&self) -> &'static str {
        BEARER_SCHEME
    }

    async fn validate(&self, req: &Request) -> AuthResult<()> {
        let header = match req.header(AUTHORIZATION_HEADER) {
            Some(header) if !header.is_empty() => header,
            _ => return Err(AuthError::Unauthorized),
        };

        let (scheme, token) = match header.find(' ') {
            Some(i) if i > 0 => (&header[..i], &header[i + 1..]),
            _ => return Err(AuthError::Malformed),
        };
        if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
            return Err(AuthError::Unsupported);
        }

        let policies = self.policies(token)?;
        let decision = resolve(&policies, req)?;
        authorize(self.name(), req, decision)
    }
}
