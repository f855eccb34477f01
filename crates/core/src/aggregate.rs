//! Aggregate root trait.

/// Aggregate root marker + minimal interface.
///
/// An aggregate root is the only entry point for mutating the entities it
/// contains, and the only place where invariants spanning those entities are
/// enforced.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's state.
    ///
    /// Incremented once per successful mutation; rejected mutations leave it
    /// untouched.
    fn version(&self) -> u64;
}
