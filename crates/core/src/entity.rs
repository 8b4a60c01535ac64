//! Entity trait: identity that survives attribute changes.

/// A domain object addressed by its identifier rather than its attributes.
///
/// Stores key records by [`Entity::id`]; two records with the same id are the
/// same entity even when every other field differs.
pub trait Entity {
    /// Natural key (e.g. a product code).
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    fn id(&self) -> &Self::Id;
}
