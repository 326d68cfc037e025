//! Message signing and verification
//!
//! Bearer tokens carry a signed, base64-encoded message. This module provides
//! the signing capability using the jsonwebtoken crate's primitives, with
//! any of its algorithms: HMAC keys come from a shared secret, RSA, EC and
//! EdDSA keys from PEM.
//!
//! A signed message has two parts:
//!
//! ```text
//! <signature> $ <base64url(payload)>
//! ```
//!
//! The signature is computed over the encoded payload, so the payload is
//! verified before it is decoded.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{crypto, Algorithm, DecodingKey, EncodingKey};
use thiserror::Error;

use crate::error::{AuthError, AuthResult};

/// Algorithm used to sign bearer messages.
pub type SigningAlgorithm = Algorithm;

/// Signing configuration.
#[derive(Clone)]
pub struct SigningConfig {
    /// Secret key for HMAC algorithms (HS256, HS384, HS512)
    pub secret: Option<String>,

    /// Private key (PEM) for RSA, EC and EdDSA algorithms
    pub private_key: Option<String>,

    /// Public key (PEM) for RSA, EC and EdDSA algorithms
    pub public_key: Option<String>,

    /// Algorithm to use
    pub algorithm: SigningAlgorithm,
}

impl std::fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .field("public_key", &self.public_key)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            secret: None,
            private_key: None,
            public_key: None,
            algorithm: Algorithm::HS256,
        }
    }
}

impl SigningConfig {
    /// Create a configuration for an HMAC secret (HS256).
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ACL_SIGNING_SECRET`: HMAC secret
    /// - `ACL_SIGNING_PRIVATE_KEY`: PEM private key
    /// - `ACL_SIGNING_PUBLIC_KEY`: PEM public key
    /// - `ACL_SIGNING_ALGORITHM`: Algorithm name (default: HS256)
    ///
    /// An unknown algorithm name keeps the default.
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            secret: std::env::var("ACL_SIGNING_SECRET").ok(),
            private_key: std::env::var("ACL_SIGNING_PRIVATE_KEY").ok(),
            public_key: std::env::var("ACL_SIGNING_PUBLIC_KEY").ok(),
            algorithm: std::env::var("ACL_SIGNING_ALGORITHM")
                .ok()
                .and_then(|s| parse_algorithm(&s))
                .unwrap_or(default.algorithm),
        }
    }

    /// Build the key pair for the configured algorithm.
    fn keys(&self) -> AuthResult<(EncodingKey, DecodingKey)> {
        match self.algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                let secret = required(&self.secret, "secret")?.as_bytes();
                Ok((EncodingKey::from_secret(secret), DecodingKey::from_secret(secret)))
            }
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => self.pem_keys(EncodingKey::from_rsa_pem, DecodingKey::from_rsa_pem),
            Algorithm::ES256 | Algorithm::ES384 => {
                self.pem_keys(EncodingKey::from_ec_pem, DecodingKey::from_ec_pem)
            }
            Algorithm::EdDSA => self.pem_keys(EncodingKey::from_ed_pem, DecodingKey::from_ed_pem),
        }
    }

    fn pem_keys(
        &self,
        encoding: fn(&[u8]) -> jsonwebtoken::errors::Result<EncodingKey>,
        decoding: fn(&[u8]) -> jsonwebtoken::errors::Result<DecodingKey>,
    ) -> AuthResult<(EncodingKey, DecodingKey)> {
        let invalid = |which: &str, e: jsonwebtoken::errors::Error| {
            AuthError::ConfigError(format!("Invalid {} for {:?}: {}", which, self.algorithm, e))
        };
        let private_key = required(&self.private_key, "private key")?;
        let public_key = required(&self.public_key, "public key")?;
        Ok((
            encoding(private_key.as_bytes()).map_err(|e| invalid("private key", e))?,
            decoding(public_key.as_bytes()).map_err(|e| invalid("public key", e))?,
        ))
    }
}

fn required<'a>(value: &'a Option<String>, what: &str) -> AuthResult<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| AuthError::ConfigError(format!("Signing {} is not configured", what)))
}

/// Parse an algorithm name, ignoring case.
///
/// # Example
///
/// ```
/// use platform_auth::{parse_algorithm, SigningAlgorithm};
///
/// assert_eq!(parse_algorithm("hs512"), Some(SigningAlgorithm::HS512));
/// assert_eq!(parse_algorithm("none"), None);
/// ```
pub fn parse_algorithm(name: &str) -> Option<SigningAlgorithm> {
    name.parse::<Algorithm>()
        .or_else(|_| name.to_ascii_uppercase().parse())
        .ok()
        .or_else(|| name.eq_ignore_ascii_case("eddsa").then_some(Algorithm::EdDSA))
}

/// Reasons a signed message is refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The signature does not match the message
    #[error("Signature is not valid")]
    Invalid,

    /// The signature or the message cannot be decoded
    #[error("Signed message is malformed: {0}")]
    Malformed(String),
}

/// Signs messages and verifies signed messages with a provisioned key.
pub trait MessageSigner: Send + Sync {
    /// Sign a payload.
    ///
    /// # Returns
    ///
    /// The signature and the encoded payload it covers
    fn sign(&self, payload: &[u8]) -> AuthResult<(String, String)>;

    /// Verify a signature over an encoded payload.
    ///
    /// # Returns
    ///
    /// The decoded payload if the signature is valid
    fn verify(&self, signature: &str, encoded: &str) -> Result<Vec<u8>, SignatureError>;
}

/// Signer backed by the jsonwebtoken crate's signing primitives.
pub struct JwsSigner {
    algorithm: SigningAlgorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwsSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwsSigner")
            .field("algorithm", &self.algorithm)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl JwsSigner {
    /// Create a signer from configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Signing configuration
    ///
    /// # Returns
    ///
    /// Signer or configuration error if the key material for the configured
    /// algorithm is missing or invalid
    pub fn new(config: &SigningConfig) -> AuthResult<Self> {
        let (encoding_key, decoding_key) = config.keys()?;
        Ok(Self {
            algorithm: config.algorithm,
            encoding_key,
            decoding_key,
        })
    }

    /// Create an HS256 signer with a secret.
    ///
    /// # Arguments
    ///
    /// * `secret` - The secret key for HMAC
    pub fn with_secret(secret: impl Into<String>) -> AuthResult<Self> {
        Self::new(&SigningConfig::with_secret(secret))
    }

    /// Get the algorithm.
    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }
}

impl MessageSigner for JwsSigner {
    fn sign(&self, payload: &[u8]) -> AuthResult<(String, String)> {
        let encoded = URL_SAFE_NO_PAD.encode(payload);
        let signature = crypto::sign(encoded.as_bytes(), &self.encoding_key, self.algorithm)
            .map_err(|e| AuthError::Signature(e.to_string()))?;
        Ok((signature, encoded))
    }

    fn verify(&self, signature: &str, encoded: &str) -> Result<Vec<u8>, SignatureError> {
        // HMAC verification re-signs the message and compares in constant time
        let valid = crypto::verify(
            signature,
            encoded.as_bytes(),
            &self.decoding_key,
            self.algorithm,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => SignatureError::Invalid,
            _ => SignatureError::Malformed(e.to_string()),
        })?;
        if !valid {
            return Err(SignatureError::Invalid);
        }

        URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|e| SignatureError::Malformed(e.to_string()))
    }
}
