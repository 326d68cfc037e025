//! # Platform Authentication
//!
//! This crate provides the credential providers for the Relay platform's
//! access control engine. A provider turns the credentials carried by a
//! request into an ordered policy list and resolves it with `platform-acl`.
//!
//! ## Overview
//!
//! The platform-auth crate handles:
//! - **API keys**: Pre-shared key and secret, looked up in an authorization store
//! - **Bearer tokens**: Signed policy lists, verified with a provisioned key
//! - **Signing**: HMAC, RSA, EC and EdDSA message signing using jsonwebtoken
//! - **Stores**: Policy and authorization persistence contracts
//! - **Credentials**: Random API key and secret generation
//!
//! ## Usage
//!
//! ### API Keys
//!
//! ```rust,no_run
//! use platform_acl::{Action, Authorization, Request, ResourcePolicy};
//! use platform_auth::{ApiKeyProvider, AuthorizationStore, MemoryAuthorizationStore, Provider};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (key, secret) = platform_auth::generate_credentials();
//! let auth = Authorization::new(key, secret)
//!     .with_policy(ResourcePolicy::deny(Action::Every, "/partners/*/secret"))
//!     .with_policy(ResourcePolicy::allow(Action::Write, "/partners/*"));
//!
//! let store = Arc::new(MemoryAuthorizationStore::new());
//! store.store_authorization(&auth).await?;
//!
//! let provider = ApiKeyProvider::new(store);
//! let req = Request::new("POST", "/partners/ABC")
//!     .with_header("Authorization", auth.credential().to_header());
//! provider.validate(&req).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Bearer Tokens
//!
//! ```rust,no_run
//! use platform_acl::{Action, Request, ResourcePolicy};
//! use platform_auth::{BearerProvider, Provider, SigningConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Key material is read once, when the provider is created
//! let provider = BearerProvider::from_config(&SigningConfig::from_env())?;
//!
//! let token = provider.issue(&[ResourcePolicy::allow(Action::Read, "/companies/*")])?;
//! let req = Request::new("GET", "/companies/ABC")
//!     .with_header("Authorization", format!("Bearer {}", token));
//! provider.validate(&req).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Decisions
//!
//! | Outcome        | Error                      |
//! |----------------|----------------------------|
//! | No credential  | `AuthError::Unauthorized`  |
//! | Bad encoding   | `AuthError::Malformed`     |
//! | Unknown scheme | `AuthError::Unsupported`   |
//! | Bad key/secret | `AuthError::Unauthorized`  |
//! | Bad signature  | `AuthError::Unauthorized`  |
//! | Inactive       | `AuthError::Forbidden`     |
//! | Denied         | `AuthError::Forbidden`     |

pub mod apikey;
pub mod bearer;
pub mod config;
pub mod error;
pub mod provider;
pub mod signing;
pub mod store;

// Re-export main types
pub use apikey::{ApiKeyProvider, AuthorizationSource};
pub use bearer::{BearerProvider, BEARER_SCHEME, TOKEN_SEPARATOR};
pub use config::{generate_credentials, random_string, CredentialConfig};
pub use error::{AuthError, AuthResult};
pub use provider::Provider;
pub use signing::{
    parse_algorithm, JwsSigner, MessageSigner, SignatureError, SigningAlgorithm, SigningConfig,
};
pub use store::{
    AuthorizationStore, MemoryAuthorizationStore, MemoryPolicyStore, PolicyStore, StoreError,
    StoreResult,
};
