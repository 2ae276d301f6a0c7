use serde::{Deserialize, Serialize};

use slotlist_core::UserId;

use crate::{Authorizer, AuthzError, PermissionSet, RequiredPermissions, SessionClaims};

/// The acting user together with the permissions granted to them.
///
/// Construction is decoupled from storage and transport: handlers derive it
/// from already-verified session claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    pub permissions: PermissionSet,
}

impl Principal {
    pub fn new(user_id: UserId, permissions: PermissionSet) -> Self {
        Self {
            user_id,
            permissions,
        }
    }

    pub fn from_claims(claims: &SessionClaims) -> Self {
        Self::new(claims.sub, claims.permission_set())
    }

    pub fn can(&self, required: impl Into<RequiredPermissions>) -> bool {
        Authorizer::default().authorize(&self.permissions, required)
    }

    /// Owner of the resource, or holder of `required`.
    ///
    /// Matches gates like "mission creator or `admin.mission`".
    pub fn can_or_owns(&self, owner: UserId, required: impl Into<RequiredPermissions>) -> bool {
        self.user_id == owner || self.can(required)
    }

    pub fn require(&self, required: impl Into<RequiredPermissions>) -> Result<(), AuthzError> {
        Authorizer::default().require(&self.permissions, required)
    }
}
