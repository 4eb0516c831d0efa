//! Epsilon closure and single-symbol moves over an [`NFA`].

use super::{Input, StateSet, Symbol, NFA};

impl<I> NFA<I>
where
	I: Input,
{
	/// Computes the set of states reachable from `states` through epsilon transitions alone.
	///
	/// The result always contains `states` itself, and applying the closure
	/// to its own result returns the same set.
	pub fn closure(&self, states: &StateSet) -> StateSet {
		let mut closure = states.clone();
		let mut stack: Vec<_> = states.iter().copied().collect();

		while let Some(id) = stack.pop() {
			if let Some(next) = self.destinations(id, &Symbol::Epsilon) {
				for &next in next {
					if closure.insert(next) {
						stack.push(next);
					}
				}
			}
		}
		closure
	}

	/// Returns the union of the destinations of `states` on `input`, without closure.
	pub fn move_on(&self, states: &StateSet, input: &I) -> StateSet {
		let symbol = Symbol::Literal(input.clone());
		states
			.iter()
			.filter_map(|&id| self.destinations(id, &symbol))
			.flatten()
			.copied()
			.collect()
	}

	/// Closes `states`, consumes `input`, and closes the result again.
	pub fn advance(&self, states: &StateSet, input: &I) -> StateSet {
		self.closure(&self.move_on(&self.closure(states), input))
	}
}
