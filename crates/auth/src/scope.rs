//! Scope validation for grant requests.
//!
//! Before a permission is granted on a community or mission, the requested
//! string must name one of that entity's concrete capabilities. Wildcards and
//! other entities' permissions are never grantable through this path.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use slotlist_core::{DomainError, DomainResult, Slug};

use crate::Permission;
use crate::well_known::{
    community_leader, community_recruitment, mission_editor, mission_slotlist_community,
};

/// Kind of entity a permission can be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    Community,
    Mission,
}

impl ScopeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Community => "community",
            Self::Mission => "mission",
        }
    }
}

impl core::fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScopeKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "community" => Ok(Self::Community),
            "mission" => Ok(Self::Mission),
            other => Err(DomainError::validation(format!("unknown scope kind '{other}'"))),
        }
    }
}

/// A specific community or mission, identified by its slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityScope {
    pub kind: ScopeKind,
    pub identifier: Slug,
}

impl EntityScope {
    pub fn new(kind: ScopeKind, identifier: &str) -> DomainResult<Self> {
        Ok(Self {
            kind,
            identifier: Slug::parse(identifier)?,
        })
    }

    pub fn community(identifier: &str) -> DomainResult<Self> {
        Self::new(ScopeKind::Community, identifier)
    }

    pub fn mission(identifier: &str) -> DomainResult<Self> {
        Self::new(ScopeKind::Mission, identifier)
    }

    /// Whether `candidate` may be granted within this scope.
    pub fn accepts(&self, candidate: &str) -> bool {
        grantable_permissions(self)
            .iter()
            .any(|p| p.as_str() == candidate)
    }
}

/// The exact permission strings grantable within `scope`.
pub fn grantable_permissions(scope: &EntityScope) -> Vec<Permission> {
    let slug = scope.identifier.as_str();
    match scope.kind {
        ScopeKind::Community => vec![community_leader(slug), community_recruitment(slug)],
        ScopeKind::Mission => vec![mission_editor(slug), mission_slotlist_community(slug)],
    }
}

/// Whether `candidate` is a legal grant for the entity `kind`/`identifier`.
///
/// Never fails: a malformed identifier yields `false`.
pub fn is_valid_scoped_permission(kind: ScopeKind, identifier: &str, candidate: &str) -> bool {
    match EntityScope::new(kind, identifier) {
        Ok(scope) => scope.accepts(candidate),
        Err(err) => {
            tracing::debug!(%kind, identifier, %err, "rejecting grant for malformed identifier");
            false
        }
    }
}

/// String-keyed variant of [`is_valid_scoped_permission`]; unknown kinds yield `false`.
pub fn is_valid_scoped_permission_str(kind: &str, identifier: &str, candidate: &str) -> bool {
    kind.parse::<ScopeKind>()
        .is_ok_and(|kind| is_valid_scoped_permission(kind, identifier, candidate))
}
