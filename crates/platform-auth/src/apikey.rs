//! API key provider
//!
//! Validates requests carrying a pre-shared key and secret as HTTP Basic
//! credentials, either in the `Authorization` header or in the `auth` query
//! parameter. The pair is resolved to an [`Authorization`] through an
//! injected [`AuthorizationSource`], whose policies then decide the request.

use async_trait::async_trait;
use platform_acl::{Authorization, BasicCredential, Request};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{AuthError, AuthResult};
use crate::provider::{authorize, Provider};
use crate::store::{StoreError, StoreResult};

/// Looks up authorizations by key and secret.
#[async_trait]
pub trait AuthorizationSource: Send + Sync {
    /// Get the authorization matching a key and secret.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no authorization matches.
    async fn authorization_for_key_and_secret(
        &self,
        key: &str,
        secret: &str,
    ) -> StoreResult<Authorization>;
}

/// Provider for API key credentials.
///
/// # Example
///
/// ```rust,no_run
/// use platform_acl::{Action, Authorization, Request, ResourcePolicy};
/// use platform_auth::{ApiKeyProvider, AuthorizationStore, MemoryAuthorizationStore, Provider};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(MemoryAuthorizationStore::new());
/// let auth = Authorization::new("test", "ABC123")
///     .with_policy(ResourcePolicy::allow(Action::Read, "/companies/*"));
/// store.store_authorization(&auth).await?;
///
/// let provider = ApiKeyProvider::new(store);
/// let req = Request::new("GET", "/companies/ABC")
///     .with_header("Authorization", auth.credential().to_header());
/// provider.validate(&req).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiKeyProvider {
    source: Arc<dyn AuthorizationSource>,
}

impl ApiKeyProvider {
    /// Create a provider backed by an authorization source.
    pub fn new(source: Arc<dyn AuthorizationSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Provider for ApiKeyProvider {
    fn name(&self) -> &'static str {
        "APIKey"
    }

    async fn validate(&self, req: &Request) -> AuthResult<()> {
        let credential = BasicCredential::from_request(req)?;

        let auth = match self
            .source
            .authorization_for_key_and_secret(&credential.key, &credential.secret)
            .await
        {
            Ok(auth) => auth,
            Err(StoreError::NotFound) => {
                debug!(key = %credential.key, "No authorization for API key");
                return Err(AuthError::Unauthorized);
            }
            Err(e) => {
                warn!(error = %e, "Authorization lookup failed");
                return Err(AuthError::Store(e));
            }
        };

        if !auth.active {
            debug!(authorization = %auth.id, "Authorization is inactive");
            return Err(AuthError::Forbidden);
        }

        let decision = auth.evaluate(req)?;
        authorize(self.name(), req, decision)
    }
}
