//! # Realms
//!
//! A realm describes the context in which access is granted. Realms are
//! hierarchical paths of typed components:
//!
//! ```text
//! workspace:1/project:2/resource:3
//! ```
//!
//! Each component's type and name are percent-encoded independently, so
//! either may contain `/`, `:` or any other character. A realm contains
//! another when it is a prefix of it; the empty realm contains everything.
//!
//! Stored realms always name every component. Containment queries may also
//! use bare types (`workspace/project`), parsed with [`Realm::parse_query`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{AclError, AclResult};
use crate::request::percent_decode;

const COMPONENT_SEPARATOR: char = '/';
const NAME_DELIMITER: char = ':';

/// One typed element of a realm.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Component {
    /// Component type, e.g. `workspace`
    pub kind: String,
    /// Component name; `None` only in query realms
    pub name: Option<String>,
}

impl Component {
    /// Create a named component.
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: Some(name.into()),
        }
    }

    /// Create a component with a type but no name.
    pub fn unnamed(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: None,
        }
    }

    /// Check if both type and name are identical.
    pub fn equals(&self, other: &Component) -> bool {
        self == other
    }

    fn parse(text: &str, require_name: bool) -> AclResult<Self> {
        let (kind, name) = match text.split_once(NAME_DELIMITER) {
            Some((kind, name)) => (kind, Some(name)),
            None if require_name => {
                return Err(AclError::InvalidRealm(format!(
                    "no component delimiter in: {}",
                    text
                )))
            }
            None => (text, None),
        };
        Ok(Self {
            kind: unescape(kind)?,
            name: name.map(unescape).transpose()?,
        })
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&urlencoding::encode(&self.kind))?;
        if let Some(name) = &self.name {
            write!(f, "{}{}", NAME_DELIMITER, urlencoding::encode(name))?;
        }
        Ok(())
    }
}

fn unescape(text: &str) -> AclResult<String> {
    percent_decode(text)
        .ok_or_else(|| AclError::InvalidRealm(format!("invalid escape in: {}", text)))
}

/// A hierarchical access context.
///
/// # Example
///
/// ```
/// use platform_acl::Realm;
///
/// let project: Realm = "workspace:1/project:2".parse().unwrap();
/// let workspace: Realm = "workspace:1".parse().unwrap();
///
/// assert!(workspace.contains(&project));
/// assert!(!project.contains(&workspace));
/// assert!(Realm::default().contains(&project));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Realm(Vec<Component>);

/// Realms were historically called domains.
pub type Domain = Realm;

impl Realm {
    /// Create an empty realm.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Parse a realm in which every component is `type:name`.
    ///
    /// Empty input parses to the empty realm. A single trailing `/` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AclError::InvalidRealm`] if a component has no `:`
    /// delimiter or contains a malformed percent-escape.
    pub fn parse(text: &str) -> AclResult<Self> {
        Self::parse_components(text, true)
    }

    /// Parse a query realm, where components may be a bare `type`.
    pub fn parse_query(text: &str) -> AclResult<Self> {
        Self::parse_components(text, false)
    }

    fn parse_components(text: &str, require_name: bool) -> AclResult<Self> {
        // A single trailing separator is tolerated
        let text = text.strip_suffix(COMPONENT_SEPARATOR).unwrap_or(text);
        if text.is_empty() {
            return Ok(Self::new());
        }
        text.split(COMPONENT_SEPARATOR)
            .map(|c| Component::parse(c, require_name))
            .collect::<AclResult<Vec<_>>>()
            .map(Self)
            .map_err(|err| match err {
                AclError::InvalidRealm(detail) => {
                    AclError::InvalidRealm(format!("{} (in {})", detail, text))
                }
                other => other,
            })
    }

    /// Get a copy of this realm extended by a named component.
    pub fn child(&self, kind: impl Into<String>, name: impl Into<String>) -> Self {
        let mut components = self.0.clone();
        components.push(Component::new(kind, name));
        Self(components)
    }

    /// Append a component.
    pub fn push(&mut self, component: Component) {
        self.0.push(component);
    }

    /// Split off the first component.
    ///
    /// Returns `None` for the empty realm.
    pub fn shift(&self) -> Option<(&Component, Realm)> {
        let (first, rest) = self.0.split_first()?;
        Some((first, Realm(rest.to_vec())))
    }

    /// Check if this realm is a prefix of another.
    ///
    /// `other` must have at least as many components, and each of ours must
    /// equal the component at the same position in `other`.
    pub fn contains(&self, other: &Realm) -> bool {
        if other.0.len() < self.0.len() {
            return false;
        }
        self.0.iter().zip(&other.0).all(|(a, b)| a.equals(b))
    }

    /// Get the components.
    pub fn components(&self) -> &[Component] {
        &self.0
    }

    /// Get the number of components.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Component>> for Realm {
    fn from(components: Vec<Component>) -> Self {
        Self(components)
    }
}

impl FromIterator<Component> for Realm {
    fn from_iter<T: IntoIterator<Item = Component>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", COMPONENT_SEPARATOR)?;
            }
            write!(f, "{}", component)?;
        }
        Ok(())
    }
}

impl FromStr for Realm {
    type Err = AclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Realm::parse(s)
    }
}

impl Serialize for Realm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Realm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Realm::parse_query(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn realm(components: &[(&str, &str)]) -> Realm {
        components.iter().map(|(k, n)| Component::new(*k, *n)).collect()
    }

    #[test]
    fn test_marshal_realm() {
        let cases = vec![
            (Realm::new(), ""),
            (realm(&[("a", "hello")]), "a:hello"),
            (realm(&[("a", "hello"), ("b", "another")]), "a:hello/b:another"),
            (realm(&[("a", "///"), ("b", "???")]), "a:%2F%2F%2F/b:%3F%3F%3F"),
            (
                realm(&[("wk", "00000000000000000000"), ("pj", "11111111111111111111")]),
                "wk:00000000000000000000/pj:11111111111111111111",
            ),
            (Realm::from(vec![Component::unnamed("a"), Component::new("b", "")]), "a/b:"),
        ];
        for (realm, expect) in cases {
            assert_eq!(realm.to_string(), expect);
        }
    }

    #[test]
    fn test_unmarshal_realm() {
        let cases = vec![
            ("", Realm::new()),
            ("a:hello", realm(&[("a", "hello")])),
            ("a:hello/b:another", realm(&[("a", "hello"), ("b", "another")])),
            ("a:%2F%2F%2F/b:%3F%3F%3F", realm(&[("a", "///"), ("b", "???")])),
            ("a:b:c", realm(&[("a", "b:c")])),
            ("a:", realm(&[("a", "")])),
        ];
        for (input, expect) in cases {
            assert_eq!(Realm::parse(input), Ok(expect), "{}", input);
        }
    }

    #[test]
    fn test_trailing_separator() {
        assert_eq!(Realm::parse("workspace:1/"), Ok(realm(&[("workspace", "1")])));
        assert_eq!(
            Realm::parse("workspace:1/project:2/"),
            Ok(realm(&[("workspace", "1"), ("project", "2")]))
        );
        assert_eq!(Realm::parse("/"), Ok(Realm::new()));
        assert_eq!(
            Realm::parse_query("workspace/"),
            Ok(Realm::from(vec![Component::unnamed("workspace")]))
        );
    }

    #[test]
    fn test_invalid_realm() {
        let inputs = [
            "no/component/delimiter",
            "invalid:%%%encoding",
            "a:%2",
            "a%zz:b",
            "workspace:1//",
        ];
        for input in inputs {
            let result = Realm::parse(input);
            assert!(
                matches!(result, Err(AclError::InvalidRealm(_))),
                "{} -> {:?}",
                input,
                result
            );
        }
    }

    #[test]
    fn test_query_realm() {
        let query = Realm::parse_query("workspace/project:2").unwrap();
        assert_eq!(
            query,
            Realm::from(vec![Component::unnamed("workspace"), Component::new("project", "2")])
        );
        assert_eq!(query.to_string(), "workspace/project:2");
        assert!(Realm::parse_query("invalid:%%%encoding").is_err());
    }

    #[test]
    fn test_round_trip_arbitrary_characters() {
        let names = ["/", ":", "?", "%", "a b", "ü/ß:?", "%2F", "", "*"];
        for kind in names.iter().filter(|k| !k.is_empty()) {
            for name in names {
                let original = realm(&[(kind, name), ("x", name)]);
                let text = original.to_string();
                assert_eq!(Realm::parse(&text), Ok(original), "{}", text);
            }
        }
    }

    #[test]
    fn test_realm_contains() {
        let empty = Realm::new();
        let workspace = realm(&[("workspace", "1")]);
        let project = realm(&[("workspace", "1"), ("project", "2")]);
        let other = realm(&[("workspace", "2"), ("project", "2")]);

        assert!(empty.contains(&empty));
        assert!(empty.contains(&project));
        assert!(workspace.contains(&workspace));
        assert!(workspace.contains(&project));
        assert!(!project.contains(&workspace));
        assert!(!workspace.contains(&other));
        assert!(!workspace.contains(&empty));

        let unnamed = Realm::from(vec![Component::unnamed("workspace")]);
        assert!(!unnamed.contains(&project));
    }

    #[test]
    fn test_realm_shift() {
        let project = realm(&[("workspace", "1"), ("project", "2")]);
        let (first, rest) = project.shift().unwrap();
        assert_eq!(first, &Component::new("workspace", "1"));
        assert_eq!(rest, realm(&[("project", "2")]));
        assert!(Realm::new().shift().is_none());
    }

    #[test]
    fn test_realm_child() {
        let workspace = realm(&[("workspace", "1")]);
        let project = workspace.child("project", "2");
        assert_eq!(project.len(), 2);
        assert_eq!(workspace.len(), 1);
        assert!(workspace.contains(&project));
    }

    #[test]
    fn test_realm_serde() {
        let project = realm(&[("workspace", "1"), ("project", "a/b")]);
        let json = serde_json::to_string(&project).unwrap();
        assert_eq!(json, r#""workspace:1/project:a%2Fb""#);
        let decoded: Realm = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, project);
    }
}
