//! Authorization records
//!
//! An authorization binds an API key and secret to an ordered list of
//! policies. Providers read it as an immutable snapshot once per request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::credentials::BasicCredential;
use crate::error::AclResult;
use crate::policy::{resolve, Decision, Policy};
use crate::request::Request;

/// A persistent API credential and the policies it carries.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Authorization {
    /// Unique identifier
    pub id: Uuid,

    /// Public API key
    #[serde(rename = "api_key")]
    pub key: String,

    /// API secret
    #[serde(rename = "api_secret")]
    pub secret: String,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Policies, evaluated in order
    #[serde(default)]
    pub policies: Vec<Policy>,

    /// Inactive authorizations are refused
    pub active: bool,

    /// When the authorization was created
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for Authorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorization")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("secret", &"[REDACTED]")
            .field("description", &self.description)
            .field("policies", &self.policies)
            .field("active", &self.active)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl Authorization {
    /// Create an active authorization with no policies.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            key: key.into(),
            secret: secret.into(),
            description: None,
            policies: Vec::new(),
            active: true,
            created_at: Utc::now(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a policy, keeping earlier policies ahead of it.
    pub fn with_policy(mut self, policy: impl Into<Policy>) -> Self {
        self.policies.push(policy.into());
        self
    }

    /// Replace the policy list.
    pub fn with_policies(mut self, policies: Vec<Policy>) -> Self {
        self.policies = policies;
        self
    }

    /// Set whether the authorization is active.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Get the Basic credential a client presents for this authorization.
    pub fn credential(&self) -> BasicCredential {
        BasicCredential {
            key: self.key.clone(),
            secret: self.secret.clone(),
        }
    }

    /// Check if a key and secret identify this authorization.
    ///
    /// The secret comparison does not stop at the first differing byte.
    pub fn matches(&self, key: &str, secret: &str) -> bool {
        self.key == key && bool::from(self.secret.as_bytes().ct_eq(secret.as_bytes()))
    }

    /// Resolve this authorization's policies against a request.
    pub fn evaluate(&self, req: &Request) -> AclResult<Decision> {
        resolve(&self.policies, req)
    }
}
