//! `slotlist-auth` — pure permission engine (no IO, no transport, no storage).
//!
//! Permissions are dotted strings (`community.test.leader`) whose terminal
//! segment may be the wildcard `*`. The engine answers two questions:
//!
//! - does a granted [`PermissionSet`] satisfy a [`RequiredPermissions`]
//!   specification ([`authorize`])?
//! - is a candidate string a legal grant for a community or mission
//!   ([`is_valid_scoped_permission`])?

pub mod authorize;
pub mod claims;
pub mod permissions;
pub mod principal;
pub mod required;
pub mod scope;
pub mod settings;
pub mod tree;
pub mod well_known;

pub use authorize::{
    ActionAuthorization, AuthorizationExplanation, Authorizer, AuthzError, MatchStrategy,
    authorize, authorize_flat, authorize_tree, authorize_with, explain_authorization,
    has_global_override, require,
};
pub use claims::{ClaimsExpectations, SessionClaims, TokenValidationError, validate_claims};
pub use permissions::{Permission, PermissionSet, PermissionSyntaxError};
pub use principal::Principal;
pub use required::RequiredPermissions;
pub use scope::{
    EntityScope, ScopeKind, grantable_permissions, is_valid_scoped_permission,
    is_valid_scoped_permission_str,
};
pub use settings::AuthzSettings;
pub use tree::{PermissionNode, PermissionTree};
