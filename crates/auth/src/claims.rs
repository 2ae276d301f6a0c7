use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use slotlist_core::{CommunityId, Slug, UserId};

use crate::{Permission, PermissionSet};

/// Session token payload (transport-agnostic).
///
/// This is the claim set expected once a token has been decoded and its
/// signature verified by whatever layer issued it. The engine only reads the
/// `permissions` claim; the rest is carried for handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the acting user's id.
    pub sub: UserId,

    pub user: ClaimsUser,

    /// Flat list of granted permission strings.
    #[serde(default)]
    pub permissions: Vec<Permission>,

    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,

    #[serde(rename = "iss")]
    pub issuer: String,

    #[serde(rename = "aud")]
    pub audience: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsUser {
    pub uid: UserId,
    pub nickname: String,
    #[serde(default)]
    pub steam_id: Option<String>,
    pub community: Option<ClaimsCommunity>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsCommunity {
    pub uid: CommunityId,
    pub name: String,
    pub tag: String,
    pub slug: Slug,
}

impl SessionClaims {
    /// Granted permissions as a set (duplicates collapse).
    pub fn permission_set(&self) -> PermissionSet {
        self.permissions.iter().cloned().collect()
    }
}

/// What the verifier expects to find in `iss`/`aud`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsExpectations {
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("unexpected issuer '{0}'")]
    IssuerMismatch(String),

    #[error("unexpected audience '{0}'")]
    AudienceMismatch(String),

    #[error("subject does not match the embedded user")]
    SubjectMismatch,
}

/// Deterministically validate session claims.
///
/// Note: this validates the *claims* only. Signature verification and
/// decoding happen outside this crate.
pub fn validate_claims(
    claims: &SessionClaims,
    now: DateTime<Utc>,
    expected: &ClaimsExpectations,
) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    if claims.issuer != expected.issuer {
        return Err(TokenValidationError::IssuerMismatch(claims.issuer.clone()));
    }
    if claims.audience != expected.audience {
        return Err(TokenValidationError::AudienceMismatch(claims.audience.clone()));
    }
    if claims.sub != claims.user.uid {
        return Err(TokenValidationError::SubjectMismatch);
    }
    Ok(())
}
