//! # Platform ACL (Access Control)
//!
//! This crate provides the policy evaluation engine for the Relay platform:
//! given a request and the policies attached to a credential, it decides
//! whether the request is allowed.
//!
//! ## Overview
//!
//! The platform-acl crate handles:
//! - **Actions & Effects**: The action vocabulary and policy outcomes
//! - **Paths**: Wildcard matching over `/`-delimited resource paths
//! - **Policies**: Resource policies and ordered effect resolution
//! - **Realms**: Hierarchical, typed access contexts
//! - **Scopes**: Per-resource action grants with merge and satisfaction
//! - **Roles**: Membership roles and the grant hierarchy
//! - **Credentials**: Basic credential extraction from requests
//!
//! ## Architecture
//!
//! ```text
//! Request -> credential -> ordered policy list -> resolve -> Decision
//!
//! ResourcePolicy = ActionSet + PathSet + Effect
//!
//! Examples:
//!   allow: [read] /companies/*        - Read any company and below
//!   deny:  [*] /companies/*/secret    - Nothing under a company's secret
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use platform_acl::{resolve, Action, Decision, Request, ResourcePolicy};
//!
//! let policies = vec![
//!     ResourcePolicy::deny(Action::Every, "/companies/*/secret"),
//!     ResourcePolicy::allow(Action::Read, "/companies/*"),
//! ];
//!
//! let req = Request::new("GET", "/companies/ABC123/employees");
//! assert!(resolve(&policies, &req).unwrap().is_allowed());
//!
//! let req = Request::new("GET", "/companies/ABC123/secret");
//! assert_eq!(resolve(&policies, &req).unwrap(), Decision::Deny { index: 0 });
//! ```
//!
//! ## Evaluation Order
//!
//! Policies are evaluated in the order they are stored:
//! - The first `allow` or `deny` decides
//! - `pass` moves on to the next policy
//! - No terminal effect means the request is denied
//!
//! ## Integration with platform-auth
//!
//! This crate is pure and performs no I/O. The `platform-auth` crate turns
//! request credentials into policy lists (API keys, signed bearer tokens) and
//! runs them through [`resolve`].

pub mod action;
pub mod authorization;
pub mod credentials;
pub mod effect;
pub mod error;
pub mod path;
pub mod policy;
pub mod realm;
pub mod request;
pub mod role;
pub mod scope;

// Re-export main types for convenience
pub use action::{Action, ActionSet};
pub use authorization::Authorization;
pub use credentials::{BasicCredential, AUTHORIZATION_HEADER, AUTH_QUERY_PARAM};
pub use effect::Effect;
pub use error::{AclError, AclResult};
pub use path::{MatchMode, Path, PathSet};
pub use policy::{
    resolve, Decision, Evaluate, PersistentPolicy, Policy, ResourcePolicy, RESOURCE_POLICY_TYPE,
};
pub use realm::{Component, Domain, Realm};
pub use request::Request;
pub use role::{Role, Roles};
pub use scope::{union, Scope, Scopes};
