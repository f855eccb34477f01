//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Entities living inside an aggregate refer back to their owner by identifier
/// only, never by reference.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
