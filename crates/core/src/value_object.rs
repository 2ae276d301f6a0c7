//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two slugs with
/// the same text are the same slug. To "modify" one, construct a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
