//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two instances
/// with the same attributes are interchangeable. `Effective` multipliers,
/// derived line figures and price breakdowns are value objects; a product or
/// a price entry (which has identity) is not.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
