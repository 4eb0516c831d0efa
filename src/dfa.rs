use super::{
	Alphabet, Automaton, AutomatonError, Input, InvalidAutomaton, StateId, StateSet, Symbol,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq)]
struct State<I> {
	accepts: bool,
	transitions: BTreeMap<I, StateId>,
}

impl<I> State<I> {
	pub fn new(accepts: bool) -> Self {
		Self {
			accepts,
			transitions: BTreeMap::new(),
		}
	}
}

/// A deterministic finite state automaton.
///
/// Transitions are partial: a missing transition rejects the run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
	try_from = "DFADefinition<I>",
	into = "DFADefinition<I>",
	bound(
		serialize = "I: Input + Serialize",
		deserialize = "I: Input + Deserialize<'de>"
	)
)]
pub struct DFA<I>
where
	I: Input,
{
	alphabet: Alphabet<I>,
	start: StateId,
	states: BTreeMap<StateId, State<I>>,
}

/// Explicit description of a [`DFA`], also its serialized form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
	deny_unknown_fields,
	bound(deserialize = "I: Ord + Deserialize<'de>")
)]
pub struct DFADefinition<I>
where
	I: Ord,
{
	pub alphabet: Alphabet<I>,
	pub states: StateSet,
	pub start: StateId,
	#[serde(default)]
	pub accept: StateSet,
	#[serde(default)]
	pub transitions: Vec<(StateId, I, StateId)>,
}

impl<I> DFA<I>
where
	I: Input,
{
	/// Creates a new DFA with a given set of states & transitions.
	///
	/// Besides the checks [`NFA::from_transitions`](crate::NFA::from_transitions)
	/// performs, fails on an epsilon label or on a second, different destination
	/// for the same state and input.
	pub fn from_transitions<V, T, L>(
		alphabet: Alphabet<I>,
		start: StateId,
		states: V,
		transitions: T,
	) -> Result<Self, AutomatonError<I>>
	where
		V: IntoIterator<Item = (StateId, bool)>,
		T: IntoIterator<Item = (StateId, L, StateId)>,
		L: Into<Symbol<I>>,
	{
		let mut dfa = Self {
			alphabet,
			start,
			states: BTreeMap::new(),
		};
		for (id, accepts) in states {
			dfa.add_state(id, accepts);
		}
		if !dfa.has_state(start) {
			return Err(AutomatonError::inexistent(start));
		}
		for (prev, symbol, next) in transitions {
			match symbol.into() {
				Symbol::Literal(input) => dfa.add_transition(prev, input, next)?,
				Symbol::Epsilon => {
					return Err(AutomatonError::InvalidAutomaton(
						InvalidAutomaton::EpsilonTransition(prev),
					));
				}
			}
		}
		Ok(dfa)
	}

	/// Creates a DFA from its explicit description.
	pub fn new(definition: DFADefinition<I>) -> Result<Self, AutomatonError<I>> {
		let DFADefinition {
			alphabet,
			states,
			start,
			accept,
			transitions,
		} = definition;
		if let Some(&id) = accept.iter().find(|id| !states.contains(id)) {
			return Err(AutomatonError::inexistent(id));
		}
		let states = states.into_iter().map(|id| (id, accept.contains(&id)));
		Self::from_transitions(alphabet, start, states, transitions)
	}

	/// Returns the explicit description of this DFA.
	pub fn definition(&self) -> DFADefinition<I> {
		DFADefinition {
			alphabet: self.alphabet.clone(),
			states: self.states().collect(),
			start: self.start,
			accept: self.accepting(),
			transitions: self
				.transitions()
				.map(|(prev, input, next)| (prev, input.clone(), next))
				.collect(),
		}
	}

	pub fn start(&self) -> StateId {
		self.start
	}

	/// Iterates all state ids in ascending order.
	pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
		self.states.keys().copied()
	}

	/// Returns the number of states.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	pub fn has_state(&self, id: StateId) -> bool {
		self.states.contains_key(&id)
	}

	pub fn is_accepting(&self, id: StateId) -> bool {
		self.states.get(&id).map_or(false, |state| state.accepts)
	}

	/// Returns the set of accepting states.
	pub fn accepting(&self) -> StateSet {
		self.states
			.iter()
			.filter(|(_, state)| state.accepts)
			.map(|(&id, _)| id)
			.collect()
	}

	/// Iterates every transition as a `(source, input, destination)` triple.
	pub fn transitions(&self) -> impl Iterator<Item = (StateId, &I, StateId)> + '_ {
		self.states.iter().flat_map(|(&prev, state)| {
			state
				.transitions
				.iter()
				.map(move |(input, &next)| (prev, input, next))
		})
	}

	/// Returns the unique destination of a state on an input, if any.
	pub fn transition(&self, id: StateId, input: &I) -> Option<StateId> {
		self.states
			.get(&id)
			.and_then(|state| state.transitions.get(input))
			.copied()
	}

	pub(crate) fn with_start(alphabet: Alphabet<I>, start: StateId, accepts: bool) -> Self {
		let mut dfa = Self {
			alphabet,
			start,
			states: BTreeMap::new(),
		};
		dfa.add_state(start, accepts);
		dfa
	}

	/// Adds a new state, replacing any existing state with the same id.
	pub(crate) fn add_state(&mut self, id: StateId, accepts: bool) {
		self.states.insert(id, State::new(accepts));
	}

	/// Adds a transition between two states known to exist, overwriting any previous one.
	pub(crate) fn connect(&mut self, prev: StateId, input: I, next: StateId) {
		if let Some(state) = self.states.get_mut(&prev) {
			state.transitions.insert(input, next);
		}
	}

	/// Adds a new transition.
	/// Returns an error if one of the states is inexistent or if the
	/// transition would make the automaton nondeterministic.
	pub(crate) fn add_transition(
		&mut self,
		prev: StateId,
		input: I,
		next: StateId,
	) -> Result<(), AutomatonError<I>> {
		if !self.alphabet.contains(&input) {
			return Err(AutomatonError::AlphabetViolation(input));
		}
		if !self.has_state(next) {
			return Err(AutomatonError::inexistent(next));
		}
		let state = self
			.states
			.get_mut(&prev)
			.ok_or_else(|| AutomatonError::inexistent(prev))?;
		if let Some(&existing) = state.transitions.get(&input) {
			if existing != next {
				return Err(AutomatonError::InvalidAutomaton(
					InvalidAutomaton::Nondeterministic { state: prev, input },
				));
			}
		}
		state.transitions.insert(input, next);
		Ok(())
	}
}

impl<I> TryFrom<DFADefinition<I>> for DFA<I>
where
	I: Input,
{
	type Error = AutomatonError<I>;

	fn try_from(definition: DFADefinition<I>) -> Result<Self, Self::Error> {
		Self::new(definition)
	}
}

impl<I> From<DFA<I>> for DFADefinition<I>
where
	I: Input,
{
	fn from(dfa: DFA<I>) -> Self {
		dfa.definition()
	}
}

impl<I> Automaton<I> for DFA<I>
where
	I: Input,
{
	type State = StateId;

	fn alphabet(&self) -> &Alphabet<I> {
		&self.alphabet
	}

	fn initial(&self) -> StateId {
		self.start
	}

	fn step(&self, state: &StateId, input: &I) -> Option<StateId> {
		self.transition(*state, input)
	}

	fn accepts(&self, state: &StateId) -> bool {
		self.is_accepting(*state)
	}
}
