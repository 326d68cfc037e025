//! # Resource paths
//!
//! Wildcard matching over `/`-delimited resource paths.
//!
//! A path is used both as a concrete resource identifier and as a pattern to
//! match one. Pattern components are compared case-insensitively, and the
//! component `*` matches any single candidate component:
//!
//! ```text
//! /a/*/z   matches  /a/l/z, /a/*/z
//! /a/*/z   misses   /a/b, /a/z
//! /a/*     matches  /a/b, /a/b/c/d   (a trailing wildcard absorbs the rest)
//! *        matches  anything, including the empty path
//! ```
//!
//! A trailing slash on either side is ignored, so `/a/` and `/a` are the same.

use serde::{Deserialize, Serialize};
use std::fmt;

const WILDCARD: &str = "*";
const SEPARATOR: char = '/';

/// How a pattern treats candidate components beyond its own length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Extra candidate components only match after a trailing wildcard.
    #[default]
    Strict,
    /// A prefix pattern absorbs any number of extra candidate components.
    Encompass,
}

/// A `/`-delimited resource path or path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(String);

impl Path {
    /// Create a path from a string.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Get the path as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if this pattern matches a candidate path in strict mode.
    pub fn matches(&self, candidate: &Path) -> bool {
        self.matches_str_with(candidate.as_str(), MatchMode::Strict)
    }

    /// Check if this pattern matches a candidate path.
    pub fn matches_with(&self, candidate: &Path, mode: MatchMode) -> bool {
        self.matches_str_with(candidate.as_str(), mode)
    }

    /// Check if this pattern matches a candidate string in strict mode.
    pub fn matches_str(&self, candidate: &str) -> bool {
        self.matches_str_with(candidate, MatchMode::Strict)
    }

    /// Check if this pattern matches a candidate string.
    ///
    /// Both sides are walked component by component. When the pattern runs
    /// out first the match holds only if its last component was a wildcard
    /// or `mode` is [`MatchMode::Encompass`]. When the candidate runs out
    /// first there is no match.
    ///
    /// # Example
    ///
    /// ```
    /// use platform_acl::{MatchMode, Path};
    ///
    /// assert!(Path::new("/a/*").matches_str("/a/b/c"));
    /// assert!(!Path::new("/a").matches_str("/a/b"));
    /// assert!(Path::new("/a").matches_str_with("/a/b", MatchMode::Encompass));
    /// ```
    pub fn matches_str_with(&self, candidate: &str, mode: MatchMode) -> bool {
        let mut pattern = self.0.as_str();
        let mut candidate = candidate;

        if pattern.is_empty() {
            return false;
        } else if pattern == WILDCARD {
            return true;
        } else if candidate.is_empty() {
            return false;
        }

        let mut wildcard = false;
        loop {
            match (next_component(pattern), next_component(candidate)) {
                (None, None) => return true,
                (None, Some(_)) => return wildcard || mode == MatchMode::Encompass,
                (Some(_), None) => return false,
                (Some((p, p_rest)), Some((c, c_rest))) => {
                    wildcard = p == WILDCARD;
                    if !wildcard && !eq_ignore_case(p, c) {
                        return false;
                    }
                    pattern = p_rest;
                    candidate = c_rest;
                }
            }
        }
    }
}

/// Split the first component off a path.
///
/// An empty remainder yields no component, which is what makes a trailing
/// separator equivalent to its absence.
fn next_component(path: &str) -> Option<(&str, &str)> {
    if path.is_empty() {
        return None;
    }
    match path.find(SEPARATOR) {
        Some(i) => Some((&path[..i], &path[i + 1..])),
        None => Some((path, "")),
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

impl From<&str> for Path {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

impl From<String> for Path {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A set of path patterns that matches when any member matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathSet(Vec<Path>);

impl PathSet {
    /// Create an empty path set.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a pattern to the set.
    pub fn push(&mut self, path: impl Into<Path>) {
        self.0.push(path.into());
    }

    /// Check if any pattern matches a candidate path in strict mode.
    pub fn matches(&self, candidate: &Path) -> bool {
        self.0.iter().any(|p| p.matches(candidate))
    }

    /// Check if any pattern matches a candidate path.
    pub fn matches_with(&self, candidate: &Path, mode: MatchMode) -> bool {
        self.0.iter().any(|p| p.matches_with(candidate, mode))
    }

    /// Check if any pattern matches a candidate string in strict mode.
    pub fn matches_str(&self, candidate: &str) -> bool {
        self.0.iter().any(|p| p.matches_str(candidate))
    }

    /// Check if any pattern matches a candidate string.
    pub fn matches_str_with(&self, candidate: &str, mode: MatchMode) -> bool {
        self.0.iter().any(|p| p.matches_str_with(candidate, mode))
    }

    /// Iterate over the patterns.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter()
    }

    /// Get the number of patterns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Path>> for PathSet {
    fn from(paths: Vec<Path>) -> Self {
        Self(paths)
    }
}

impl<P: Into<Path>> FromIterator<P> for PathSet {
    fn from_iter<T: IntoIterator<Item = P>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for PathSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, path) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(path.as_str())?;
        }
        Ok(())
    }
}
