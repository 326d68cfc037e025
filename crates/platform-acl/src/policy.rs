//! # Policies
//!
//! Resource policies and the ordered evaluation that turns a list of them
//! into an access decision.
//!
//! ## Evaluation
//!
//! Each policy evaluates a request to an [`Effect`]. A list of policies is
//! resolved in order: the first `Allow` or `Deny` wins, `Pass` moves on to
//! the next policy, and a list that never reaches a terminal effect denies by
//! default. Policy order is therefore significant and must be preserved from
//! storage through signing to evaluation.
//!
//! ```text
//! [Deny(*, /x), Allow(read, /x)]   read /x  ->  Deny
//! [Allow(read, /x), Deny(*, /x)]   read /x  ->  Allow
//! []                               read /x  ->  NoMatch (denied)
//! ```
//!
//! ## Persistence
//!
//! Policies are persisted as an envelope of identity, type tag and JSON
//! payload (see [`PersistentPolicy`]). A policy has no identity until it is
//! stored; assigning one produces a new value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::action::{Action, ActionSet};
use crate::effect::Effect;
use crate::error::{AclError, AclResult};
use crate::path::{Path, PathSet};
use crate::request::Request;

/// Type tag of [`ResourcePolicy`] in the persisted envelope.
pub const RESOURCE_POLICY_TYPE: &str = "resource";

/// Anything that evaluates a request to an effect.
pub trait Evaluate {
    /// Evaluate a request.
    ///
    /// # Errors
    ///
    /// Returns [`AclError::MethodNotSupported`] if the request verb has no
    /// action mapping, and [`AclError::MalformedRequest`] if the request
    /// path is not valid percent-encoding.
    fn eval(&self, req: &Request) -> AclResult<Effect>;
}

/// Grants or refuses a set of actions on a set of path patterns.
///
/// # Example
///
/// ```
/// use platform_acl::{Action, Effect, Evaluate, Request, ResourcePolicy};
///
/// let policy = ResourcePolicy::allow(Action::Read, "/companies/*");
///
/// let req = Request::new("GET", "/companies/ABC123/employees");
/// assert_eq!(policy.eval(&req).unwrap(), Effect::Allow);
///
/// let req = Request::new("POST", "/companies/ABC123");
/// assert_eq!(policy.eval(&req).unwrap(), Effect::Pass);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePolicy {
    /// Identity assigned when the policy is persisted
    #[serde(skip)]
    id: Option<Uuid>,

    /// Actions this policy applies to
    pub actions: ActionSet,

    /// Path patterns this policy applies to
    pub paths: PathSet,

    /// Effect when both the action and the path match
    pub effect: Effect,
}

impl ResourcePolicy {
    /// Create an unpersisted policy.
    pub fn new(actions: impl Into<ActionSet>, paths: impl Into<PathSet>, effect: Effect) -> Self {
        Self {
            id: None,
            actions: actions.into(),
            paths: paths.into(),
            effect,
        }
    }

    /// Create a policy allowing one action on one path pattern.
    pub fn allow(action: Action, path: impl Into<Path>) -> Self {
        Self::new(vec![action], PathSet::from(vec![path.into()]), Effect::Allow)
    }

    /// Create a policy denying one action on one path pattern.
    pub fn deny(action: Action, path: impl Into<Path>) -> Self {
        Self::new(vec![action], PathSet::from(vec![path.into()]), Effect::Deny)
    }

    /// Get the identity, if the policy has been persisted.
    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    /// Get a copy of this policy carrying an identity.
    pub fn with_id(&self, id: Uuid) -> Self {
        Self {
            id: Some(id),
            ..self.clone()
        }
    }
}

impl Evaluate for ResourcePolicy {
    fn eval(&self, req: &Request) -> AclResult<Effect> {
        let path = req.path()?;
        let action = Action::for_method(req.method())?;
        if !self.actions.contains(action) {
            return Ok(Effect::Pass);
        }
        if !self.paths.matches_str(path) {
            return Ok(Effect::Pass);
        }
        Ok(self.effect)
    }
}

impl fmt::Display for ResourcePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [{}] {}", self.effect, self.actions, self.paths)
    }
}

/// Every kind of policy an authorization can carry.
///
/// Serialized with a `type` tag matching the envelope's type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Policy {
    /// Action and path based policy
    #[serde(rename = "resource")]
    Resource(ResourcePolicy),
}

/// Decodes the payload of one policy type.
type PolicyDecoder = fn(Uuid, &serde_json::Value) -> AclResult<Policy>;

/// Type tags and their payload decoders.
const POLICY_DECODERS: &[(&str, PolicyDecoder)] = &[(RESOURCE_POLICY_TYPE, decode_resource_policy)];

fn decode_resource_policy(id: Uuid, data: &serde_json::Value) -> AclResult<Policy> {
    let policy = ResourcePolicy::deserialize(data)?;
    Ok(Policy::Resource(policy.with_id(id)))
}

impl Policy {
    /// Get the identity, if the policy has been persisted.
    pub fn id(&self) -> Option<Uuid> {
        match self {
            Policy::Resource(p) => p.id(),
        }
    }

    /// Get a copy of this policy carrying an identity.
    pub fn with_id(&self, id: Uuid) -> Self {
        match self {
            Policy::Resource(p) => Policy::Resource(p.with_id(id)),
        }
    }

    /// Get the type tag used in the persisted envelope.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Policy::Resource(_) => RESOURCE_POLICY_TYPE,
        }
    }

    /// Encode the policy payload for persistence.
    ///
    /// # Returns
    ///
    /// The identity (if assigned), the type tag and the JSON payload.
    pub fn marshal(&self) -> AclResult<(Option<Uuid>, &'static str, serde_json::Value)> {
        let data = match self {
            Policy::Resource(p) => serde_json::to_value(p)?,
        };
        Ok((self.id(), self.type_tag(), data))
    }

    /// Decode a persisted policy payload.
    ///
    /// # Errors
    ///
    /// Returns [`AclError::UnsupportedPolicyType`] for an unknown type tag
    /// and [`AclError::Serialization`] for an undecodable payload.
    pub fn unmarshal(id: Uuid, type_tag: &str, data: &serde_json::Value) -> AclResult<Self> {
        let (_, decode) = POLICY_DECODERS
            .iter()
            .find(|(tag, _)| *tag == type_tag)
            .ok_or_else(|| AclError::UnsupportedPolicyType(type_tag.to_string()))?;
        decode(id, data)
    }
}

impl Evaluate for Policy {
    fn eval(&self, req: &Request) -> AclResult<Effect> {
        match self {
            Policy::Resource(p) => p.eval(req),
        }
    }
}

impl From<ResourcePolicy> for Policy {
    fn from(policy: ResourcePolicy) -> Self {
        Policy::Resource(policy)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Resource(p) => fmt::Display::fmt(p, f),
        }
    }
}

/// Persisted representation of a policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistentPolicy {
    /// Policy identity
    pub id: Uuid,

    /// Policy type tag
    #[serde(rename = "type")]
    pub type_tag: String,

    /// Type-specific JSON payload
    pub data: serde_json::Value,

    /// When the policy was stored
    pub created_at: DateTime<Utc>,
}

impl PersistentPolicy {
    /// Build the envelope for a policy that has not been persisted yet.
    ///
    /// The identity is supplied by the caller; any identity already carried
    /// by the policy is ignored.
    pub fn new(id: Uuid, policy: &Policy, created_at: DateTime<Utc>) -> AclResult<Self> {
        let (_, type_tag, data) = policy.marshal()?;
        Ok(Self {
            id,
            type_tag: type_tag.to_string(),
            data,
            created_at,
        })
    }

    /// Decode the policy held by this envelope.
    pub fn to_policy(&self) -> AclResult<Policy> {
        Policy::unmarshal(self.id, &self.type_tag, &self.data)
    }
}

/// Outcome of resolving an ordered list of policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The policy at `index` allowed the request
    Allow {
        /// Position of the deciding policy
        index: usize,
    },
    /// The policy at `index` denied the request
    Deny {
        /// Position of the deciding policy
        index: usize,
    },
    /// Every policy passed; access is denied by default
    NoMatch,
}

impl Decision {
    /// Check if the request is authorized.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow { .. })
    }
}

/// Resolve an ordered list of policies against a request.
///
/// Policies are evaluated in order. The first `Allow` or `Deny` decides;
/// `Pass` continues. An evaluation error aborts resolution immediately.
///
/// # Example
///
/// ```
/// use platform_acl::{resolve, Action, Decision, Request, ResourcePolicy};
///
/// let policies = vec![
///     ResourcePolicy::deny(Action::Every, "/x"),
///     ResourcePolicy::allow(Action::Read, "/x"),
/// ];
/// let req = Request::new("GET", "/x");
/// assert_eq!(resolve(&policies, &req).unwrap(), Decision::Deny { index: 0 });
/// ```
pub fn resolve<'a, P, I>(policies: I, req: &Request) -> AclResult<Decision>
where
    P: Evaluate + 'a,
    I: IntoIterator<Item = &'a P>,
{
    for (index, policy) in policies.into_iter().enumerate() {
        match policy.eval(req)? {
            Effect::Allow => return Ok(Decision::Allow { index }),
            Effect::Deny => return Ok(Decision::Deny { index }),
            Effect::Pass => continue,
        }
    }
    Ok(Decision::NoMatch)
}
