//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. A product code or
/// a canonical size list is a value object; a product record is an entity
/// (identified by its code, whatever its other attributes say).
///
/// ## Validated construction
///
/// Implementors in this workspace only hand out instances through a fallible
/// constructor, so holding one is proof the value already passed its checks:
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct ProductCode(String);
///
/// impl ValueObject for ProductCode {}
///
/// let a = ProductCode::parse("A1")?;
/// let b = ProductCode::parse("A1")?;
/// assert_eq!(a, b);  // Equal by value, not identity
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
