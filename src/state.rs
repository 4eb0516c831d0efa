use std::collections::BTreeSet;

/// Identifier of a single automaton state.
pub type StateId = u32;

/// An ordered set of states.
///
/// Ordering makes two sets with the same members compare and hash equal,
/// so a set can key the subset construction table directly.
pub type StateSet = BTreeSet<StateId>;
