//! URL-safe entity slugs (communities, missions).

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Maximum slug length accepted by the storage layer.
pub const MAX_SLUG_LEN: usize = 255;

/// Slug identifying a community or mission (e.g. `"op-1"`).
///
/// A slug is non-empty and made only of ASCII letters, digits, `-` and `_`.
/// In particular it never contains `.` or `*`, so it always forms exactly one
/// permission segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    pub fn parse(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();

        if value.is_empty() {
            return Err(DomainError::validation("slug must not be empty"));
        }
        if value.len() > MAX_SLUG_LEN {
            return Err(DomainError::validation(format!(
                "slug exceeds {MAX_SLUG_LEN} characters"
            )));
        }
        if let Some(c) = value
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(DomainError::validation(format!(
                "slug contains invalid character {c:?}"
            )));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Slug {}

impl core::fmt::Display for Slug {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Slug {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Slug {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
