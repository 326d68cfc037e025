//! # Actions
//!
//! Defines the actions a policy or scope can grant, and the mapping from
//! request verbs to actions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AclError, AclResult};

/// Operations that can be granted on a resource.
///
/// The wildcard [`Action::Every`] (`*`) matches any action. It only appears
/// inside policies and scopes; a request verb never maps to it.
///
/// Variants are declared in lexical order of their names so the derived
/// ordering sorts actions by name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Wildcard, matches any action.
    #[serde(rename = "*")]
    Every,

    /// Approve pending changes.
    Approve,

    /// Remove a resource.
    Delete,

    /// Browse or query multiple resources.
    List,

    /// Send notifications about a resource.
    Notify,

    /// View a resource.
    Read,

    /// Create or modify a resource.
    Write,
}

/// Request verbs and the action each one requires.
const METHOD_ACTIONS: &[(&str, Action)] = &[
    ("GET", Action::Read),
    ("POST", Action::Write),
    ("PUT", Action::Write),
    ("PATCH", Action::Write),
    ("DELETE", Action::Delete),
];

impl Action {
    /// Get the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Every => "*",
            Action::Approve => "approve",
            Action::Delete => "delete",
            Action::List => "list",
            Action::Notify => "notify",
            Action::Read => "read",
            Action::Write => "write",
        }
    }

    /// Parse an action from its canonical name.
    ///
    /// # Example
    ///
    /// ```
    /// use platform_acl::Action;
    ///
    /// assert_eq!(Action::parse("read"), Some(Action::Read));
    /// assert_eq!(Action::parse("*"), Some(Action::Every));
    /// assert_eq!(Action::parse("view"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "*" => Some(Action::Every),
            "approve" => Some(Action::Approve),
            "delete" => Some(Action::Delete),
            "list" => Some(Action::List),
            "notify" => Some(Action::Notify),
            "read" => Some(Action::Read),
            "write" => Some(Action::Write),
            _ => None,
        }
    }

    /// Resolve the action required by a request verb.
    ///
    /// Verbs are matched case-insensitively: `GET` requires `read`; `POST`,
    /// `PUT` and `PATCH` require `write`; `DELETE` requires `delete`.
    ///
    /// # Errors
    ///
    /// Returns [`AclError::MethodNotSupported`] for any other verb.
    pub fn for_method(method: &str) -> AclResult<Self> {
        METHOD_ACTIONS
            .iter()
            .find(|(verb, _)| verb.eq_ignore_ascii_case(method))
            .map(|(_, action)| *action)
            .ok_or_else(|| AclError::MethodNotSupported(method.to_string()))
    }

    /// Get all concrete actions (the wildcard excluded).
    pub fn all() -> Vec<Self> {
        vec![
            Action::Approve,
            Action::Delete,
            Action::List,
            Action::Notify,
            Action::Read,
            Action::Write,
        ]
    }

    /// Check if this is the wildcard action.
    pub fn is_every(&self) -> bool {
        matches!(self, Action::Every)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::parse(s).ok_or_else(|| AclError::InvalidAction(s.to_string()))
    }
}

/// An ordered list of actions with set semantics.
///
/// Duplicates are tolerated. Membership treats [`Action::Every`] as matching
/// anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionSet(Vec<Action>);

impl ActionSet {
    /// Create an empty action set.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create a set containing only the wildcard.
    pub fn every() -> Self {
        Self(vec![Action::Every])
    }

    /// Check if the set grants an action.
    ///
    /// # Example
    ///
    /// ```
    /// use platform_acl::{Action, ActionSet};
    ///
    /// let set: ActionSet = [Action::Read, Action::Write].into_iter().collect();
    /// assert!(set.contains(Action::Read));
    /// assert!(!set.contains(Action::Delete));
    /// assert!(ActionSet::every().contains(Action::Delete));
    /// ```
    pub fn contains(&self, action: Action) -> bool {
        self.0.iter().any(|e| *e == Action::Every || *e == action)
    }

    /// Add an action to the end of the set.
    pub fn push(&mut self, action: Action) {
        self.0.push(action);
    }

    /// Get the actions in their stored order.
    pub fn as_slice(&self) -> &[Action] {
        &self.0
    }

    /// Iterate over the actions in their stored order.
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.0.iter()
    }

    /// Get a copy of this set sorted by action name.
    pub fn sorted(&self) -> Self {
        let mut actions = self.0.clone();
        actions.sort();
        Self(actions)
    }

    /// Get the number of stored actions, duplicates included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Action>> for ActionSet {
    fn from(actions: Vec<Action>) -> Self {
        Self(actions)
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<T: IntoIterator<Item = Action>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ActionSet {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ActionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, action) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(action.as_str())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parsing() {
        assert_eq!(Action::parse("read"), Some(Action::Read));
        assert_eq!(Action::parse("write"), Some(Action::Write));
        assert_eq!(Action::parse("delete"), Some(Action::Delete));
        assert_eq!(Action::parse("list"), Some(Action::List));
        assert_eq!(Action::parse("approve"), Some(Action::Approve));
        assert_eq!(Action::parse("notify"), Some(Action::Notify));
        assert_eq!(Action::parse("*"), Some(Action::Every));

        assert_eq!(Action::parse("READ"), None);
        assert_eq!(Action::parse("invalid"), None);
        assert_eq!(
            "invalid".parse::<Action>(),
            Err(AclError::InvalidAction("invalid".to_string()))
        );
    }

    #[test]
    fn test_action_for_method() {
        assert_eq!(Action::for_method("GET"), Ok(Action::Read));
        assert_eq!(Action::for_method("get"), Ok(Action::Read));
        assert_eq!(Action::for_method("POST"), Ok(Action::Write));
        assert_eq!(Action::for_method("PUT"), Ok(Action::Write));
        assert_eq!(Action::for_method("PATCH"), Ok(Action::Write));
        assert_eq!(Action::for_method("DELETE"), Ok(Action::Delete));

        assert_eq!(
            Action::for_method("OPTIONS"),
            Err(AclError::MethodNotSupported("OPTIONS".to_string()))
        );
    }

    #[test]
    fn test_no_method_maps_to_every() {
        for verb in ["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "*"] {
            assert_ne!(Action::for_method(verb).ok(), Some(Action::Every));
        }
    }

    #[test]
    fn test_action_serde() {
        assert_eq!(serde_json::to_string(&Action::Every).unwrap(), r#""*""#);
        assert_eq!(serde_json::to_string(&Action::Notify).unwrap(), r#""notify""#);
        let action: Action = serde_json::from_str(r#""approve""#).unwrap();
        assert_eq!(action, Action::Approve);
        assert!(serde_json::from_str::<Action>(r#""execute""#).is_err());
    }

    #[test]
    fn test_action_set_contains() {
        let set = ActionSet::from(vec![Action::Read, Action::Write]);
        assert!(set.contains(Action::Read));
        assert!(set.contains(Action::Write));
        assert!(!set.contains(Action::Delete));

        let every = ActionSet::every();
        for action in Action::all() {
            assert!(every.contains(action));
        }

        assert!(!ActionSet::new().contains(Action::Read));
    }

    #[test]
    fn test_action_set_sorted() {
        let set = ActionSet::from(vec![Action::Write, Action::Every, Action::Delete, Action::Read]);
        assert_eq!(
            set.sorted().as_slice(),
            &[Action::Every, Action::Delete, Action::Read, Action::Write]
        );
    }

    #[test]
    fn test_action_set_display() {
        let set = ActionSet::from(vec![Action::Read, Action::Write]);
        assert_eq!(set.to_string(), "read, write");
        assert_eq!(ActionSet::new().to_string(), "");
    }
}
