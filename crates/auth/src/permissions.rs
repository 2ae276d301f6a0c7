use std::borrow::{Borrow, Cow};
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tree::PermissionTree;
use crate::well_known::{GLOBAL_WILDCARD, OVERRIDES, SEGMENT_SEPARATOR, WILDCARD_SEGMENT};

/// Permission identifier.
///
/// Permissions are case-sensitive dotted strings (e.g. `"admin.user"`,
/// `"community.test.leader"`). The terminal segment may be the wildcard `*`,
/// which grants that position and everything beneath it. A lone `"*"` grants
/// everything.
///
/// Construction never fails: malformed strings (empty, or containing an empty
/// segment) are kept as-is and simply never match anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PermissionSyntaxError {
    #[error("permission is empty")]
    Empty,

    #[error("permission '{0}' contains an empty segment")]
    EmptySegment(String),

    #[error("permission '{0}' contains whitespace")]
    Whitespace(String),

    #[error("permission '{0}' uses '*' outside the terminal segment")]
    MisplacedWildcard(String),
}

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for the lone global wildcard `"*"`.
    pub fn is_wildcard(&self) -> bool {
        self.as_str() == GLOBAL_WILDCARD
    }

    /// `true` for `"*"` and `"admin.superadmin"`.
    pub fn is_override(&self) -> bool {
        OVERRIDES.contains(&self.as_str())
    }

    /// Segments of a well-formed permission, `None` if any segment is empty.
    pub fn segments(&self) -> Option<Vec<&str>> {
        segments_of(self.as_str())
    }

    pub fn is_well_formed(&self) -> bool {
        self.segments().is_some()
    }

    /// Prefix covered by a terminal wildcard: `Some("admin")` for `admin.*`,
    /// `Some("")` for `*`, `None` otherwise.
    pub fn wildcard_prefix(&self) -> Option<&str> {
        let s = self.as_str();
        if s == GLOBAL_WILDCARD {
            return Some("");
        }
        if !self.is_well_formed() {
            return None;
        }
        s.strip_suffix(WILDCARD_SEGMENT)?
            .strip_suffix(SEGMENT_SEPARATOR)
    }

    /// Strict syntax check for grant-time validation.
    ///
    /// Matching is lenient and never calls this.
    pub fn validate_syntax(&self) -> Result<(), PermissionSyntaxError> {
        let s = self.as_str();
        if s.is_empty() {
            return Err(PermissionSyntaxError::Empty);
        }
        if s.chars().any(char::is_whitespace) {
            return Err(PermissionSyntaxError::Whitespace(s.to_string()));
        }
        let segments = self
            .segments()
            .ok_or_else(|| PermissionSyntaxError::EmptySegment(s.to_string()))?;
        let last = segments.len() - 1;
        if segments[..last].iter().any(|seg| seg.contains('*'))
            || (segments[last].contains('*') && segments[last] != WILDCARD_SEGMENT)
        {
            return Err(PermissionSyntaxError::MisplacedWildcard(s.to_string()));
        }
        Ok(())
    }
}

/// Split a dotted string, rejecting empty strings and empty segments.
pub(crate) fn segments_of(s: &str) -> Option<Vec<&str>> {
    let segments: Vec<&str> = s.split(SEGMENT_SEPARATOR).collect();
    if segments.iter().any(|seg| seg.is_empty()) {
        None
    } else {
        Some(segments)
    }
}

impl Borrow<str> for Permission {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for Permission {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&'static str> for Permission {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<String> for Permission {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unordered, deduplicated set of permissions granted to a principal.
///
/// Supplied by the identity layer; the engine never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, permission: &str) -> bool {
        self.0.contains(permission)
    }

    /// `true` if the set holds `*` or `admin.superadmin`.
    pub fn has_global_override(&self) -> bool {
        OVERRIDES.iter().any(|p| self.contains(p))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build the matching tree for this set.
    pub fn tree(&self) -> PermissionTree {
        PermissionTree::build(self.iter().map(Permission::as_str))
    }
}

impl<P: Into<Permission>> FromIterator<P> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a PermissionSet {
    type Item = &'a Permission;
    type IntoIter = std::collections::btree_set::Iter<'a, Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
