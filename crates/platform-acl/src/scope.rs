//! # Scopes
//!
//! A scope grants a set of actions on one named resource:
//!
//! ```text
//! read,write:companies
//! *:locations
//! ```
//!
//! Resources are opaque strings compared exactly. Unlike resource policies
//! there is no pattern matching here: `*:a` grants everything on `a` and
//! nothing on `a/b`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::action::{Action, ActionSet};
use crate::error::{AclError, AclResult};

const ACTION_SEPARATOR: char = ',';
const RESOURCE_DELIMITER: char = ':';

/// Actions granted or required on a single resource.
///
/// # Example
///
/// ```
/// use platform_acl::Scope;
///
/// let granted: Scope = "*:companies".parse().unwrap();
/// let required: Scope = "read,write:companies".parse().unwrap();
///
/// assert!(granted.satisfies(&required));
/// assert!(!required.satisfies(&granted));
/// assert_eq!(required.to_string(), "read,write:companies");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Scope {
    /// Actions on the resource
    pub actions: ActionSet,
    /// Opaque resource identifier
    pub resource: String,
}

impl Scope {
    /// Create a scope.
    pub fn new(resource: impl Into<String>, actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            resource: resource.into(),
        }
    }

    /// Parse the `action[,action...]:resource` text form.
    ///
    /// Everything after the first `:` is the resource, so the resource may
    /// itself contain `:`. Empty actions between separators are ignored, and
    /// a `*` anywhere in the list collapses it to the wildcard.
    ///
    /// # Errors
    ///
    /// - [`AclError::InvalidAction`] for an unknown action name
    /// - [`AclError::EmptyResource`] if no resource follows the actions
    pub fn parse(text: &str) -> AclResult<Self> {
        let mut rest = text;
        let mut actions = ActionSet::new();
        let mut every = false;

        while let Some(i) = rest.find([ACTION_SEPARATOR, RESOURCE_DELIMITER]) {
            let name = &rest[..i];
            if !name.is_empty() {
                match Action::parse(name) {
                    Some(Action::Every) => every = true,
                    Some(action) => actions.push(action),
                    None => return Err(AclError::InvalidAction(name.to_string())),
                }
            }
            let delimiter = rest[i..].starts_with(RESOURCE_DELIMITER);
            rest = &rest[i + 1..];
            if delimiter {
                break;
            }
        }

        if rest.is_empty() {
            return Err(AclError::EmptyResource);
        }
        if every {
            actions = ActionSet::every();
        }
        Ok(Self {
            actions,
            resource: rest.to_string(),
        })
    }

    /// Check if this granted scope satisfies a required one.
    ///
    /// Both scopes must name actions and a resource, the resources must be
    /// identical, and every required action must be granted. A wildcard
    /// grant satisfies any requirement; no finite grant satisfies a wildcard
    /// requirement.
    pub fn satisfies(&self, required: &Scope) -> bool {
        if required.actions.is_empty() || required.resource.is_empty() {
            return false;
        }
        if self.actions.is_empty() || self.resource.is_empty() {
            return false;
        }
        if self.resource != required.resource {
            return false;
        }
        required.actions.iter().all(|a| self.actions.contains(*a))
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.actions.iter().any(|a| a.is_every()) {
            f.write_str(Action::Every.as_str())?;
        } else {
            for (i, action) in self.actions.iter().enumerate() {
                if i > 0 {
                    write!(f, "{}", ACTION_SEPARATOR)?;
                }
                f.write_str(action.as_str())?;
            }
        }
        if !self.actions.is_empty() {
            write!(f, "{}", RESOURCE_DELIMITER)?;
        }
        f.write_str(&self.resource)
    }
}

impl FromStr for Scope {
    type Err = AclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::parse(s)
    }
}

impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Scope::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// A list of scopes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scopes(Vec<Scope>);

impl Scopes {
    /// Create an empty list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Concatenate another list onto this one without normalizing.
    pub fn add(mut self, other: Scopes) -> Scopes {
        self.0.extend(other.0);
        self
    }

    /// Concatenate and normalize two lists.
    pub fn merge(&self, other: &Scopes) -> Scopes {
        self.0.iter().chain(&other.0).merged()
    }

    /// Normalize the list so each resource appears once.
    ///
    /// Actions are unioned per resource without duplicates; a resource whose
    /// actions include the wildcard collapses to the wildcard alone. The
    /// result is ordered by resource, with actions sorted by name, so it
    /// depends only on the content of the input and merging is idempotent.
    ///
    /// # Example
    ///
    /// ```
    /// use platform_acl::{Scope, Scopes};
    ///
    /// let scopes: Scopes = ["read:a", "write:a", "*:a", "delete:b"]
    ///     .iter()
    ///     .map(|s| s.parse::<Scope>().unwrap())
    ///     .collect();
    ///
    /// assert_eq!(scopes.merged().to_string(), "*:a, delete:b");
    /// ```
    pub fn merged(&self) -> Scopes {
        self.0.iter().merged()
    }

    /// Check if every required scope is satisfied by at least one of these.
    pub fn satisfies(&self, required: &[Scope]) -> bool {
        required
            .iter()
            .all(|r| self.0.iter().any(|granted| granted.satisfies(r)))
    }

    /// Add a scope to the end of the list.
    pub fn push(&mut self, scope: Scope) {
        self.0.push(scope);
    }

    /// Get the scopes.
    pub fn as_slice(&self) -> &[Scope] {
        &self.0
    }

    /// Iterate over the scopes.
    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.0.iter()
    }

    /// Get the number of scopes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Concatenate any number of lists and normalize the result.
pub fn union<'a, I>(sets: I) -> Scopes
where
    I: IntoIterator<Item = &'a Scopes>,
{
    sets.into_iter().flat_map(|s| s.0.iter()).merged()
}

trait MergeScopes<'a>: Iterator<Item = &'a Scope> + Sized {
    fn merged(self) -> Scopes {
        let mut resources: BTreeMap<&'a str, Vec<Action>> = BTreeMap::new();
        for scope in self {
            let actions = resources.entry(scope.resource.as_str()).or_default();
            for action in scope.actions.iter() {
                if !actions.contains(action) {
                    actions.push(*action);
                }
            }
        }

        resources
            .into_iter()
            .map(|(resource, mut actions)| {
                if actions.contains(&Action::Every) {
                    return Scope::new(resource, [Action::Every]);
                }
                actions.sort();
                Scope::new(resource, actions)
            })
            .collect()
    }
}

impl<'a, I: Iterator<Item = &'a Scope>> MergeScopes<'a> for I {}

impl From<Vec<Scope>> for Scopes {
    fn from(scopes: Vec<Scope>) -> Self {
        Self(scopes)
    }
}

impl FromIterator<Scope> for Scopes {
    fn from_iter<T: IntoIterator<Item = Scope>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Scopes {
    type Item = &'a Scope;
    type IntoIter = std::slice::Iter<'a, Scope>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Scopes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, scope) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", scope)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action::{Delete, Every, List, Read, Write};

    fn scope(actions: &[Action], resource: &str) -> Scope {
        Scope::new(resource, actions.iter().copied())
    }

    fn scopes(list: &[(&[Action], &str)]) -> Scopes {
        list.iter().map(|(a, r)| scope(a, r)).collect()
    }

    #[test]
    fn test_parse_scope() {
        let cases: Vec<(&str, Scope)> = vec![
            ("a", scope(&[], "a")),
            (":a", scope(&[], "a")),
            ("*:a", scope(&[Every], "a")),
            ("read:a", scope(&[Read], "a")),
            ("read,write:a", scope(&[Read, Write], "a")),
            ("read,write,delete:a", scope(&[Read, Write, Delete], "a")),
            ("read,write,list,delete:a", scope(&[Read, Write, List, Delete], "a")),
            ("read,write,*:a", scope(&[Every], "a")),
            ("read,*,write,delete:a", scope(&[Every], "a")),
            (
                "read:a/b**C_d@3FG ANYTHING ELSE // whatever you want~~~~",
                scope(&[Read], "a/b**C_d@3FG ANYTHING ELSE // whatever you want~~~~"),
            ),
            (",:foo", scope(&[], "foo")),
            (",,,:::foo", scope(&[], "::foo")),
            ("approve,notify:reviews", scope(&[Action::Approve, Action::Notify], "reviews")),
        ];
        for (input, expect) in cases {
            assert_eq!(Scope::parse(input), Ok(expect), "{}", input);
        }
    }

    #[test]
    fn test_parse_scope_errors() {
        assert_eq!(
            Scope::parse("read,write,delete,foobar:a"),
            Err(AclError::InvalidAction("foobar".to_string()))
        );
        for input in ["read,", ",", ",:", ""] {
            assert_eq!(Scope::parse(input), Err(AclError::EmptyResource), "{:?}", input);
        }
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(scope(&[Read], "a").to_string(), "read:a");
        assert_eq!(scope(&[Every], "a").to_string(), "*:a");
        assert_eq!(scope(&[Read, Every], "a").to_string(), "*:a");
        assert_eq!(scope(&[Read, Write, Delete], "a").to_string(), "read,write,delete:a");
        assert_eq!(scope(&[], "a").to_string(), "a");
    }

    #[test]
    fn test_scope_serde() {
        let original = scope(&[Read, Write, Delete], "a");
        let json = serde_json::to_string(&original).unwrap();
        assert_eq!(json, r#""read,write,delete:a""#);
        let decoded: Scope = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, original);

        let list = scopes(&[(&[Every], "a"), (&[Read], "b")]);
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"["*:a","read:b"]"#);

        assert!(serde_json::from_str::<Scope>(r#""bogus:a""#).is_err());
    }

    #[test]
    fn test_scopes_satisfy() {
        let cases: Vec<(Scopes, Scopes, bool)> = vec![
            (scopes(&[(&[Read], "a")]), scopes(&[(&[Read], "a")]), true),
            (scopes(&[(&[Read], "a")]), scopes(&[(&[Read], "a"), (&[Read], "b")]), false),
            (scopes(&[(&[Read], "a")]), scopes(&[(&[Read], "a"), (&[Read], "a")]), true),
            (scopes(&[(&[Read], "a")]), scopes(&[(&[Read], "b"), (&[Every], "a")]), false),
            (scopes(&[(&[Read, Write], "a")]), scopes(&[(&[Read], "a"), (&[Write], "a")]), true),
            (scopes(&[(&[Read], "a"), (&[Write], "a")]), scopes(&[(&[Read, Write], "a")]), false),
            (scopes(&[(&[Every], "a")]), scopes(&[(&[Read, Write, Delete], "a")]), true),
            (scopes(&[(&[Every, Read], "a")]), scopes(&[(&[Read, Write, Delete], "a")]), true),
            (scopes(&[(&[Read, Write], "a")]), scopes(&[(&[Every], "a")]), false),
            (scopes(&[(&[Every], "a")]), scopes(&[(&[Every], "a")]), true),
            (scopes(&[(&[Read], "a"), (&[Read], "b")]), scopes(&[(&[Read, Write], "a")]), false),
            (
                scopes(&[(&[Read], "a"), (&[Read, Write], "b")]),
                scopes(&[(&[Read, Write], "a")]),
                false,
            ),
            (scopes(&[(&[Read, Write], "a")]), scopes(&[(&[Read, Write], "a")]), true),
            (scopes(&[(&[Every], "a")]), scopes(&[(&[Read, Write], "a")]), true),
            (scopes(&[(&[Every], "a")]), scopes(&[(&[], "a")]), false),
            (scopes(&[(&[], "a")]), scopes(&[(&[Read], "a")]), false),
            (scopes(&[(&[Read], "b")]), scopes(&[(&[Read], "a")]), false),
            (scopes(&[(&[Read], "b")]), scopes(&[(&[Read], "")]), false),
            (scopes(&[(&[Read], "")]), scopes(&[(&[Read], "a")]), false),
            (scopes(&[(&[Read], "")]), scopes(&[(&[Read], "")]), false),
            (scopes(&[(&[], "")]), scopes(&[(&[], "")]), false),
        ];
        for (granted, required, expect) in cases {
            assert_eq!(
                granted.satisfies(required.as_slice()),
                expect,
                "{} / {}",
                granted,
                required
            );
        }
    }

    #[test]
    fn test_nothing_required() {
        assert!(Scopes::new().satisfies(&[]));
        assert!(scopes(&[(&[Read], "a")]).satisfies(&[]));
    }

    #[test]
    fn test_merged_scopes() {
        let cases: Vec<(Scopes, Scopes)> = vec![
            (
                scopes(&[(&[Read], "a"), (&[Write], "a")]),
                scopes(&[(&[Read, Write], "a")]),
            ),
            (
                scopes(&[(&[Read], "a"), (&[Write], "b")]),
                scopes(&[(&[Read], "a"), (&[Write], "b")]),
            ),
            (
                scopes(&[(&[Read], "a"), (&[Write], "a"), (&[Every], "a")]),
                scopes(&[(&[Every], "a")]),
            ),
            (
                scopes(&[(&[Read], "a"), (&[Write], "a"), (&[Delete], "a")]),
                scopes(&[(&[Delete, Read, Write], "a")]),
            ),
            (
                scopes(&[
                    (&[Read], "a"),
                    (&[Write], "a"),
                    (&[Delete], "a"),
                    (&[Read, Write], "b"),
                    (&[Delete], "b"),
                ]),
                scopes(&[(&[Delete, Read, Write], "a"), (&[Delete, Read, Write], "b")]),
            ),
        ];
        for (input, expect) in cases {
            assert_eq!(input.merged(), expect, "{}", input);
        }
    }

    #[test]
    fn test_merge_is_idempotent_and_order_independent() {
        let input = scopes(&[
            (&[Write, Read], "b"),
            (&[Read], "a"),
            (&[Read, Read], "b"),
            (&[Every, Delete], "c"),
            (&[List], "a"),
        ]);
        let merged = input.merged();
        assert_eq!(merged.merged(), merged);

        let mut reversed: Vec<Scope> = input.iter().cloned().collect();
        reversed.reverse();
        assert_eq!(Scopes::from(reversed).merged(), merged);
        assert_eq!(merged.to_string(), "list,read:a, read,write:b, *:c");
    }

    #[test]
    fn test_merge_and_union() {
        let cases: Vec<(Scopes, Scopes, Scopes)> = vec![
            (
                scopes(&[(&[Read], "a")]),
                scopes(&[(&[Write], "a")]),
                scopes(&[(&[Read, Write], "a")]),
            ),
            (
                scopes(&[(&[Read], "a"), (&[Write], "a")]),
                scopes(&[(&[Write], "a")]),
                scopes(&[(&[Read, Write], "a")]),
            ),
            (
                scopes(&[(&[Read], "a"), (&[Write], "b")]),
                scopes(&[(&[Write], "a")]),
                scopes(&[(&[Read, Write], "a"), (&[Write], "b")]),
            ),
        ];
        for (a, b, expect) in cases {
            assert_eq!(a.merge(&b), expect);
            assert_eq!(union([&a, &b]), expect);
            assert_eq!(b.merge(&a), expect);
        }
        assert_eq!(union(std::iter::empty::<&Scopes>()), Scopes::new());
    }

    #[test]
    fn test_add_keeps_duplicates() {
        let a = scopes(&[(&[Read], "a")]);
        let combined = a.clone().add(a);
        assert_eq!(combined.len(), 2);
        assert_eq!(combined.to_string(), "read:a, read:a");
    }
}
