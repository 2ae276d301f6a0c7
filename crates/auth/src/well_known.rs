//! Well-known permission strings.
//!
//! The special-case strings (`*`, `admin.superadmin`) live here and nowhere
//! else, so the override check stays auditable in one place.

use crate::Permission;

/// Separator between permission segments.
pub const SEGMENT_SEPARATOR: char = '.';

/// Terminal segment meaning "this segment and everything beneath it".
pub const WILDCARD_SEGMENT: &str = "*";

/// Global wildcard: satisfies every required permission.
pub const GLOBAL_WILDCARD: &str = "*";

/// Super-admin: equivalent to [`GLOBAL_WILDCARD`] for matching.
pub const SUPER_ADMIN: &str = "admin.superadmin";

/// Every `admin.*` capability. Not an override: it does not reach outside `admin`.
pub const ADMIN_ALL: &str = "admin.*";

pub const ADMIN_COMMUNITY: &str = "admin.community";
pub const ADMIN_MISSION: &str = "admin.mission";
pub const ADMIN_USER: &str = "admin.user";
pub const ADMIN_PERMISSION: &str = "admin.permission";
pub const ADMIN_SLOT_TEMPLATE: &str = "admin.slotTemplate";

/// Assign/confirm/unassign slots on any mission.
pub const MISSION_SLOT_ASSIGN: &str = "mission.slot.assign";

/// Strings that short-circuit every authorization check.
pub const OVERRIDES: [&str; 2] = [GLOBAL_WILDCARD, SUPER_ADMIN];

pub fn community_leader(slug: &str) -> Permission {
    Permission::new(format!("community.{slug}.leader"))
}

pub fn community_recruitment(slug: &str) -> Permission {
    Permission::new(format!("community.{slug}.recruitment"))
}

pub fn mission_editor(slug: &str) -> Permission {
    Permission::new(format!("mission.{slug}.editor"))
}

pub fn mission_slotlist_community(slug: &str) -> Permission {
    Permission::new(format!("mission.{slug}.slotlist.community"))
}

/// Granted to the creator of a mission when the mission is created.
pub fn mission_creator(slug: &str) -> Permission {
    Permission::new(format!("mission.{slug}.creator"))
}
