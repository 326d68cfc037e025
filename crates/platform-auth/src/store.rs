//! Policy and authorization persistence
//!
//! This module defines the persistence contracts the providers depend on and
//! in-memory implementations of them. Durable backends implement the same
//! traits.
//!
//! Policies are stored as [`PersistentPolicy`] envelopes and decoded on
//! fetch. A policy gets its identity when it is stored; storing a policy that
//! already has one is refused.

use async_trait::async_trait;
use chrono::Utc;
use platform_acl::{AclError, Authorization, PersistentPolicy, Policy};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::apikey::AuthorizationSource;

/// Store error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No record matches
    #[error("Not found")]
    NotFound,

    /// The record already has an identity
    #[error("Record is immutable")]
    Immutable,

    /// The policy type cannot be persisted
    #[error("Unsupported policy type: {0}")]
    UnsupportedPolicyType(String),

    /// A record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The backend failed
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<AclError> for StoreError {
    fn from(err: AclError) -> Self {
        match err {
            AclError::UnsupportedPolicyType(tag) => StoreError::UnsupportedPolicyType(tag),
            AclError::Serialization(detail) => StoreError::Serialization(detail),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Persistence for individual policies.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Store a policy that has no identity yet.
    ///
    /// # Returns
    ///
    /// A copy of the policy carrying its new identity
    async fn store_policy(&self, policy: &Policy) -> StoreResult<Policy>;

    /// Fetch a policy by identity.
    async fn fetch_policy(&self, id: Uuid) -> StoreResult<Policy>;

    /// Delete a stored policy.
    async fn delete_policy(&self, policy: &Policy) -> StoreResult<()>;

    /// Count stored policies.
    async fn count_policies(&self) -> StoreResult<usize>;
}

/// Persistence for authorizations.
#[async_trait]
pub trait AuthorizationStore: Send + Sync {
    /// Insert or replace an authorization.
    async fn store_authorization(&self, auth: &Authorization) -> StoreResult<()>;

    /// Fetch an authorization by identity.
    async fn fetch_authorization(&self, id: Uuid) -> StoreResult<Authorization>;

    /// Fetch the authorization identified by a key and secret.
    async fn fetch_authorization_for_key_and_secret(
        &self,
        key: &str,
        secret: &str,
    ) -> StoreResult<Authorization>;

    /// Replace an authorization's key and secret.
    ///
    /// The update only applies if the current key and secret match, so a
    /// stale rotation fails with [`StoreError::NotFound`] instead of
    /// overwriting newer credentials.
    async fn cycle_credentials(
        &self,
        id: Uuid,
        old_key: &str,
        old_secret: &str,
        new_key: &str,
        new_secret: &str,
    ) -> StoreResult<()>;

    /// Delete an authorization.
    async fn delete_authorization(&self, id: Uuid) -> StoreResult<()>;

    /// Count stored authorizations.
    async fn count_authorizations(&self) -> StoreResult<usize>;
}

/// In-memory policy store.
#[derive(Debug, Clone, Default)]
pub struct MemoryPolicyStore {
    policies: Arc<RwLock<HashMap<Uuid, PersistentPolicy>>>,
}

impl MemoryPolicyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PolicyStore for MemoryPolicyStore {
    async fn store_policy(&self, policy: &Policy) -> StoreResult<Policy> {
        if policy.id().is_some() {
            return Err(StoreError::Immutable);
        }
        let id = Uuid::now_v7();
        let envelope = PersistentPolicy::new(id, policy, Utc::now())?;
        self.policies.write().await.insert(id, envelope);
        Ok(policy.with_id(id))
    }

    async fn fetch_policy(&self, id: Uuid) -> StoreResult<Policy> {
        let policies = self.policies.read().await;
        let envelope = policies.get(&id).ok_or(StoreError::NotFound)?;
        Ok(envelope.to_policy()?)
    }

    async fn delete_policy(&self, policy: &Policy) -> StoreResult<()> {
        let id = policy.id().ok_or(StoreError::NotFound)?;
        self.policies
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn count_policies(&self) -> StoreResult<usize> {
        Ok(self.policies.read().await.len())
    }
}

/// In-memory authorization store.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuthorizationStore {
    authorizations: Arc<RwLock<HashMap<Uuid, Authorization>>>,
}

impl MemoryAuthorizationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthorizationStore for MemoryAuthorizationStore {
    async fn store_authorization(&self, auth: &Authorization) -> StoreResult<()> {
        self.authorizations
            .write()
            .await
            .insert(auth.id, auth.clone());
        Ok(())
    }

    async fn fetch_authorization(&self, id: Uuid) -> StoreResult<Authorization> {
        self.authorizations
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn fetch_authorization_for_key_and_secret(
        &self,
        key: &str,
        secret: &str,
    ) -> StoreResult<Authorization> {
        self.authorizations
            .read()
            .await
            .values()
            .find(|auth| auth.matches(key, secret))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn cycle_credentials(
        &self,
        id: Uuid,
        old_key: &str,
        old_secret: &str,
        new_key: &str,
        new_secret: &str,
    ) -> StoreResult<()> {
        let mut authorizations = self.authorizations.write().await;
        let auth = authorizations
            .get_mut(&id)
            .filter(|auth| auth.matches(old_key, old_secret))
            .ok_or(StoreError::NotFound)?;
        auth.key = new_key.to_string();
        auth.secret = new_secret.to_string();
        Ok(())
    }

    async fn delete_authorization(&self, id: Uuid) -> StoreResult<()> {
        self.authorizations
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn count_authorizations(&self) -> StoreResult<usize> {
        Ok(self.authorizations.read().await.len())
    }
}

#[async_trait]
impl AuthorizationSource for MemoryAuthorizationStore {
    async fn authorization_for_key_and_secret(
        &self,
        key: &str,
        secret: &str,
    ) -> StoreResult<Authorization> {
        self.fetch_authorization_for_key_and_secret(key, secret).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform_acl::{Action, ResourcePolicy};

    #[tokio::test]
    async fn test_store_assigns_identity() {
        let store = MemoryPolicyStore::new();
        let policy = Policy::from(ResourcePolicy::allow(Action::Read, "/companies/*"));

        let stored = store.store_policy(&policy).await.unwrap();
        let id = stored.id().unwrap();
        assert!(policy.id().is_none());
        assert_eq!(store.count_policies().await.unwrap(), 1);

        let fetched = store.fetch_policy(id).await.unwrap();
        assert_eq!(fetched, stored);
    }

    #[tokio::test]
    async fn test_store_identified_policy_is_immutable() {
        let store = MemoryPolicyStore::new();
        let policy = Policy::from(ResourcePolicy::allow(Action::Read, "/a"));
        let stored = store.store_policy(&policy).await.unwrap();

        let result = store.store_policy(&stored).await;
        assert_eq!(result, Err(StoreError::Immutable));
        assert_eq!(store.count_policies().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_policy() {
        let store = MemoryPolicyStore::new();
        let stored = store
            .store_policy(&ResourcePolicy::deny(Action::Every, "/a").into())
            .await
            .unwrap();

        store.delete_policy(&stored).await.unwrap();
        assert_eq!(store.count_policies().await.unwrap(), 0);
        assert_eq!(store.delete_policy(&stored).await, Err(StoreError::NotFound));
        assert_eq!(
            store.fetch_policy(stored.id().unwrap()).await,
            Err(StoreError::NotFound)
        );
    }

    #[tokio::test]
    async fn test_fetch_authorization_for_key_and_secret() {
        let store = MemoryAuthorizationStore::new();
        let auth = Authorization::new("test", "ABC123")
            .with_policy(ResourcePolicy::allow(Action::Read, "/companies/*"));
        store.store_authorization(&auth).await.unwrap();

        let found = store
            .fetch_authorization_for_key_and_secret("test", "ABC123")
            .await
            .unwrap();
        assert_eq!(found, auth);

        let missing = store
            .fetch_authorization_for_key_and_secret("test", "XYZ987")
            .await;
        assert_eq!(missing, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_cycle_credentials() {
        let store = MemoryAuthorizationStore::new();
        let auth = Authorization::new("old-key", "old-secret");
        store.store_authorization(&auth).await.unwrap();

        let stale = store
            .cycle_credentials(auth.id, "old-key", "wrong", "new-key", "new-secret")
            .await;
        assert_eq!(stale, Err(StoreError::NotFound));

        store
            .cycle_credentials(auth.id, "old-key", "old-secret", "new-key", "new-secret")
            .await
            .unwrap();
        assert!(store
            .fetch_authorization_for_key_and_secret("old-key", "old-secret")
            .await
            .is_err());
        let rotated = store.fetch_authorization(auth.id).await.unwrap();
        assert_eq!(rotated.key, "new-key");
        assert_eq!(rotated.secret, "new-secret");
    }

    #[tokio::test]
    async fn test_delete_authorization() {
        let store = MemoryAuthorizationStore::new();
        let auth = Authorization::new("k", "s");
        store.store_authorization(&auth).await.unwrap();
        assert_eq!(store.count_authorizations().await.unwrap(), 1);

        store.delete_authorization(auth.id).await.unwrap();
        assert_eq!(store.count_authorizations().await.unwrap(), 0);
        assert_eq!(
            store.delete_authorization(auth.id).await,
            Err(StoreError::NotFound)
        );
    }

    #[test]
    fn test_acl_error_conversion() {
        assert_eq!(
            StoreError::from(AclError::UnsupportedPolicyType("role".into())),
            StoreError::UnsupportedPolicyType("role".into())
        );
        assert_eq!(
            StoreError::from(AclError::Serialization("bad".into())),
            StoreError::Serialization("bad".into())
        );
    }
}
