//! Policy effects
//!
//! The outcome of evaluating a single policy against a request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AclError;

/// Outcome of a single policy's evaluation.
///
/// `Allow` and `Deny` are terminal. `Pass` means the policy does not apply
/// and evaluation continues with the next one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    /// Grant access.
    Allow,
    /// Refuse access.
    Deny,
    /// Not applicable, continue evaluating.
    Pass,
}

impl Effect {
    /// Get the canonical name of the effect.
    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::Allow => "allow",
            Effect::Deny => "deny",
            Effect::Pass => "pass",
        }
    }

    /// Parse an effect from its canonical name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "allow" => Some(Effect::Allow),
            "deny" => Some(Effect::Deny),
            "pass" => Some(Effect::Pass),
            _ => None,
        }
    }

    /// Get the opposing effect.
    ///
    /// `Deny` inverts to `Allow`; everything else inverts to `Deny`.
    pub fn inverse(&self) -> Self {
        match self {
            Effect::Deny => Effect::Allow,
            Effect::Allow | Effect::Pass => Effect::Deny,
        }
    }

    /// Check if evaluation stops at this effect.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Effect::Pass)
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Effect {
    type Err = AclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Effect::parse(s).ok_or_else(|| AclError::InvalidEffect(s.to_string()))
    }
}
