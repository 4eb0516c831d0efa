//! Subset construction: converting an [`NFA`] into an equivalent [`DFA`].

use super::{Automaton, Input, StateId, StateSet, DFA, NFA};
use log::{debug, trace};
use std::collections::{BTreeMap, VecDeque};

impl<I> NFA<I>
where
	I: Input,
{
	/// Converts the NFA into an equivalent DFA.
	///
	/// Every reachable set of NFA states becomes one DFA state, numbered in
	/// discovery order starting at `0` for the closure of the start state.
	/// Symbols leading to the empty set get no transition.
	pub fn to_dfa(&self) -> DFA<I> {
		let initial = self.initial();
		let mut ids: BTreeMap<StateSet, StateId> = BTreeMap::new();
		let mut queue = VecDeque::new();

		let mut dfa = DFA::with_start(self.alphabet().clone(), 0, self.accepts(&initial));
		ids.insert(initial.clone(), 0);
		queue.push_back(initial);

		while let Some(current) = queue.pop_front() {
			let prev = ids[&current];
			for input in self.alphabet().iter() {
				let next = self.closure(&self.move_on(&current, input));
				if next.is_empty() {
					continue;
				}

				let next_id = match ids.get(&next) {
					Some(&id) => id,
					None => {
						let id = ids.len() as StateId;
						trace!("subset {:?} discovered as DFA state {}", next, id);
						dfa.add_state(id, self.accepts(&next));
						ids.insert(next.clone(), id);
						queue.push_back(next);
						id
					}
				};
				dfa.connect(prev, input.clone(), next_id);
			}
		}

		debug!(
			"subset construction: {} NFA states -> {} DFA states",
			self.len(),
			dfa.len()
		);
		dfa
	}
}

impl<I> From<&NFA<I>> for DFA<I>
where
	I: Input,
{
	fn from(nfa: &NFA<I>) -> Self {
		nfa.to_dfa()
	}
}
