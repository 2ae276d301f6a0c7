//! Required-permission specification: one permission or a list of alternatives.

use serde::{Deserialize, Serialize};

use crate::{AuthzError, Permission};

/// What a handler requires before acting.
///
/// A list means "any of": one satisfied alternative authorizes the action.
/// There is no AND form; check twice if both are needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequiredPermissions {
    One(Permission),
    AnyOf(Vec<Permission>),
}

impl RequiredPermissions {
    pub fn one(permission: impl Into<Permission>) -> Self {
        Self::One(permission.into())
    }

    pub fn any_of<P: Into<Permission>>(permissions: impl IntoIterator<Item = P>) -> Self {
        Self::AnyOf(permissions.into_iter().map(Into::into).collect())
    }

    /// Decode a specification received as JSON (a string or a list of strings).
    ///
    /// Anything else is a caller bug and surfaces as [`AuthzError::InvalidArgument`].
    pub fn from_json(value: &serde_json::Value) -> Result<Self, AuthzError> {
        Self::deserialize(value).map_err(|_| {
            AuthzError::InvalidArgument(format!(
                "required permissions must be a string or a list of strings, got {value}"
            ))
        })
    }

    /// Candidates in order. A single permission is a one-element slice.
    pub fn candidates(&self) -> &[Permission] {
        match self {
            Self::One(p) => core::slice::from_ref(p),
            Self::AnyOf(ps) => ps,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates().is_empty()
    }
}

impl core::fmt::Display for RequiredPermissions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::One(p) => write!(f, "{p}"),
            Self::AnyOf(ps) => {
                f.write_str("any of [")?;
                for (i, p) in ps.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{p}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<Permission> for RequiredPermissions {
    fn from(value: Permission) -> Self {
        Self::One(value)
    }
}

impl From<&'static str> for RequiredPermissions {
    fn from(value: &'static str) -> Self {
        Self::One(Permission::from_static(value))
    }
}

impl From<String> for RequiredPermissions {
    fn from(value: String) -> Self {
        Self::One(Permission::new(value))
    }
}

impl From<Vec<Permission>> for RequiredPermissions {
    fn from(value: Vec<Permission>) -> Self {
        Self::AnyOf(value)
    }
}

impl From<Vec<&'static str>> for RequiredPermissions {
    fn from(value: Vec<&'static str>) -> Self {
        Self::any_of(value)
    }
}

impl From<Vec<String>> for RequiredPermissions {
    fn from(value: Vec<String>) -> Self {
        Self::any_of(value)
    }
}

impl<const N: usize> From<[&'static str; N]> for RequiredPermissions {
    fn from(value: [&'static str; N]) -> Self {
        Self::any_of(value)
    }
}

impl<const N: usize> From<[Permission; N]> for RequiredPermissions {
    fn from(value: [Permission; N]) -> Self {
        Self::any_of(value)
    }
}
