//! Credential configuration and generation
//!
//! API keys and secrets are random alphanumeric strings. Their lengths are
//! configurable; the defaults give 32-character keys and 128-character
//! secrets.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Default length of generated API keys.
pub const DEFAULT_KEY_LENGTH: usize = 32;

/// Default length of generated API secrets.
pub const DEFAULT_SECRET_LENGTH: usize = 128;

/// Configuration for generated API credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialConfig {
    /// Length of generated keys
    pub key_length: usize,

    /// Length of generated secrets
    pub secret_length: usize,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            key_length: DEFAULT_KEY_LENGTH,
            secret_length: DEFAULT_SECRET_LENGTH,
        }
    }
}

impl CredentialConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ACL_KEY_LENGTH`: Generated key length (default: 32)
    /// - `ACL_SECRET_LENGTH`: Generated secret length (default: 128)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            key_length: std::env::var("ACL_KEY_LENGTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.key_length),
            secret_length: std::env::var("ACL_SECRET_LENGTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.secret_length),
        }
    }

    /// Generate a new key and secret.
    ///
    /// # Returns
    ///
    /// Tuple of (key, secret)
    pub fn generate(&self) -> (String, String) {
        (
            random_string(self.key_length),
            random_string(self.secret_length),
        )
    }
}

/// Generate a key and secret with the default lengths.
///
/// # Example
///
/// ```
/// let (key, secret) = platform_auth::generate_credentials();
/// assert_eq!(key.len(), 32);
/// assert_eq!(secret.len(), 128);
/// ```
pub fn generate_credentials() -> (String, String) {
    CredentialConfig::default().generate()
}

/// Generate a random alphanumeric string.
pub fn random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
