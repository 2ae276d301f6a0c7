//! `slotlist-core` — domain primitives shared across the slotlist crates.
//!
//! Pure types only: identifiers, slugs and the domain error model.

pub mod error;
pub mod id;
pub mod slug;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::{CommunityId, MissionId, UserId};
pub use slug::Slug;
pub use value_object::ValueObject;
