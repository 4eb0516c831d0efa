use super::{Alphabet, Automaton, AutomatonError, Input, StateId, StateSet, Symbol};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq)]
struct State<I> {
	accepts: bool,
	transitions: BTreeMap<Symbol<I>, StateSet>,
}

impl<I> State<I> {
	pub fn new(accepts: bool) -> Self {
		Self {
			accepts,
			transitions: BTreeMap::new(),
		}
	}
}

/// A nondeterministic finite state automaton with epsilon moves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
	try_from = "NFADefinition<I>",
	into = "NFADefinition<I>",
	bound(
		serialize = "I: Input + Serialize",
		deserialize = "I: Input + Deserialize<'de>"
	)
)]
pub struct NFA<I>
where
	I: Input,
{
	alphabet: Alphabet<I>,
	start: StateId,
	states: BTreeMap<StateId, State<I>>,
}

/// Explicit description of an [`NFA`], also its serialized form.
///
/// Epsilon transitions carry `None` as their input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
	deny_unknown_fields,
	bound(deserialize = "I: Ord + Deserialize<'de>")
)]
pub struct NFADefinition<I>
where
	I: Ord,
{
	pub alphabet: Alphabet<I>,
	pub states: StateSet,
	pub start: StateId,
	#[serde(default)]
	pub accept: StateSet,
	#[serde(default)]
	pub transitions: Vec<(StateId, Option<I>, StateId)>,
}

impl<I> NFA<I>
where
	I: Input,
{
	/// Creates a new NFA with a given set of states & transitions.
	/// Fails if a transition or the start state references a state outside `states`,
	/// or a transition is labeled with an input outside the alphabet.
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
		let mut nfa = Self {
			alphabet,
			start,
			states: BTreeMap::new(),
		};
		for (id, accepts) in states {
			nfa.add_state(id, accepts);
		}
		if !nfa.has_state(start) {
			return Err(AutomatonError::inexistent(start));
		}
		for (prev, symbol, next) in transitions {
			nfa.add_transition(prev, symbol.into(), next)?;
		}
		Ok(nfa)
	}

	/// Creates an NFA from its explicit description.
	pub fn new(definition: NFADefinition<I>) -> Result<Self, AutomatonError<I>> {
		let NFADefinition {
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
		let transitions = transitions
			.into_iter()
			.map(|(prev, input, next)| (prev, Symbol::from_option(input), next));
		Self::from_transitions(alphabet, start, states, transitions)
	}

	/// Returns the explicit description of this NFA.
	pub fn definition(&self) -> NFADefinition<I> {
		NFADefinition {
			alphabet: self.alphabet.clone(),
			states: self.states().collect(),
			start: self.start,
			accept: self.accepting(),
			transitions: self
				.transitions()
				.map(|(prev, symbol, next)| (prev, symbol.literal().cloned(), next))
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

	/// Always false, an NFA contains at least its start state.
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

	/// Iterates every transition as a `(source, label, destination)` triple.
	pub fn transitions(&self) -> impl Iterator<Item = (StateId, &Symbol<I>, StateId)> + '_ {
		self.states.iter().flat_map(|(&prev, state)| {
			state
				.transitions
				.iter()
				.flat_map(move |(symbol, next)| next.iter().map(move |&next| (prev, symbol, next)))
		})
	}

	/// Returns the destinations of a state on a label, if any.
	pub fn destinations(&self, id: StateId, symbol: &Symbol<I>) -> Option<&StateSet> {
		self.states
			.get(&id)
			.and_then(|state| state.transitions.get(symbol))
	}

	/// Returns the lowest id above every state in use, or `None` once
	/// [`StateId::MAX`] is taken.
	pub fn next_id(&self) -> Option<StateId> {
		self.states.keys().next_back().map_or(Some(0), |&id| id.checked_add(1))
	}

	pub(crate) fn with_start(alphabet: Alphabet<I>, start: StateId, accepts: bool) -> Self {
		let mut nfa = Self {
			alphabet,
			start,
			states: BTreeMap::new(),
		};
		nfa.add_state(start, accepts);
		nfa
	}

	pub(crate) fn set_alphabet(&mut self, alphabet: Alphabet<I>) {
		self.alphabet = alphabet;
	}

	/// Adds a new state, replacing any existing state with the same id.
	pub(crate) fn add_state(&mut self, id: StateId, accepts: bool) {
		self.states.insert(id, State::new(accepts));
	}

	pub(crate) fn set_accepting(&mut self, id: StateId, accepts: bool) {
		if let Some(state) = self.states.get_mut(&id) {
			state.accepts = accepts;
		}
	}

	/// Adds a new transition.
	/// Returns an `InvalidAutomaton::InexistentState` error if one of the states is inexistent.
	pub(crate) fn add_transition(
		&mut self,
		prev: StateId,
		symbol: Symbol<I>,
		next: StateId,
	) -> Result<(), AutomatonError<I>> {
		if let Symbol::Literal(input) = &symbol {
			if !self.alphabet.contains(input) {
				return Err(AutomatonError::AlphabetViolation(input.clone()));
			}
		}
		if !self.has_state(next) {
			return Err(AutomatonError::inexistent(next));
		}
		let state = self
			.states
			.get_mut(&prev)
			.ok_or_else(|| AutomatonError::inexistent(prev))?;
		state.transitions.entry(symbol).or_default().insert(next);
		Ok(())
	}

	/// Adds an epsilon transition between two states known to exist.
	pub(crate) fn connect(&mut self, prev: StateId, next: StateId) {
		if let Some(state) = self.states.get_mut(&prev) {
			state
				.transitions
				.entry(Symbol::Epsilon)
				.or_default()
				.insert(next);
		}
	}

	/// Moves every state of the automaton into `other`, keeping `other`'s start and alphabet.
	pub(crate) fn merge_into(self, other: &mut Self) {
		other.states.extend(self.states);
	}

	/// Applies an id mapping to every state and transition.
	pub(crate) fn map_states<F>(self, mut relabel: F) -> Self
	where
		F: FnMut(StateId) -> StateId,
	{
		let start = relabel(self.start);
		let states = self
			.states
			.into_iter()
			.map(|(id, state)| {
				let transitions = state
					.transitions
					.into_iter()
					.map(|(symbol, next)| (symbol, next.into_iter().map(&mut relabel).collect()))
					.collect();
				(
					relabel(id),
					State {
						accepts: state.accepts,
						transitions,
					},
				)
			})
			.collect();
		Self {
			alphabet: self.alphabet,
			start,
			states,
		}
	}
}

impl<I> TryFrom<NFADefinition<I>> for NFA<I>
where
	I: Input,
{
	type Error = AutomatonError<I>;

	fn try_from(definition: NFADefinition<I>) -> Result<Self, Self::Error> {
		Self::new(definition)
	}
}

impl<I> From<NFA<I>> for NFADefinition<I>
where
	I: Input,
{
	fn from(nfa: NFA<I>) -> Self {
		nfa.definition()
	}
}

impl<I> Automaton<I> for NFA<I>
where
	I: Input,
{
	type State = StateSet;

	fn alphabet(&self) -> &Alphabet<I> {
		&self.alphabet
	}

	fn initial(&self) -> StateSet {
		self.closure(&StateSet::from([self.start]))
	}

	fn step(&self, state: &StateSet, input: &I) -> Option<StateSet> {
		let next = self.closure(&self.move_on(state, input));
		if next.is_empty() {
			None
		} else {
			Some(next)
		}
	}

	fn accepts(&self, state: &StateSet) -> bool {
		state.iter().any(|&id| self.is_accepting(id))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{CharAutomaton, InvalidAutomaton};
	use maplit::btreeset;

	/// Strings over `01` that start and end with the same digit.
	fn same_ends() -> NFA<char> {
		NFA::from_transitions(
			Alphabet::from("01"),
			0,
			vec![(0, false), (1, false), (2, false), (3, true)],
			vec![
				(0, '0', 1),
				(0, '1', 2),
				(1, '0', 1),
				(1, '0', 3),
				(1, '1', 1),
				(2, '0', 2),
				(2, '1', 2),
				(2, '1', 3),
			],
		)
		.unwrap()
	}

	#[test]
	fn construct() {
		let nfa = same_ends();

		assert!(nfa.has_state(0), "Start state missing");
		assert!(nfa.has_state(3), "Later added state missing");
		assert_eq!(btreeset![3], nfa.accepting(), "Incorrect accepting states");
		assert_eq!(Some(4), nfa.next_id(), "Incorrect next id");
		assert_eq!(
			Some(&btreeset![1, 3]),
			nfa.destinations(1, &Symbol::Literal('0')),
			"Incorrect destinations"
		);
		assert_eq!(8, nfa.transitions().count(), "Incorrect transition count");
	}

	#[test]
	fn construct_invalid() {
		let missing = NFA::from_transitions(
			Alphabet::from("01"),
			0,
			vec![(0, false)],
			vec![(0, '0', 1)],
		);
		assert_eq!(
			Err(AutomatonError::InvalidAutomaton(
				InvalidAutomaton::InexistentState(1)
			)),
			missing,
			"Transition to inexistent state accepted"
		);

		let start = NFA::<char>::from_transitions(
			Alphabet::from("01"),
			5,
			vec![(0, false)],
			Vec::<(StateId, char, StateId)>::new(),
		);
		assert_eq!(
			Err(AutomatonError::InvalidAutomaton(
				InvalidAutomaton::InexistentState(5)
			)),
			start,
			"Inexistent start state accepted"
		);

		let foreign = NFA::from_transitions(
			Alphabet::from("01"),
			0,
			vec![(0, false), (1, true)],
			vec![(0, '2', 1)],
		);
		assert_eq!(
			Err(AutomatonError::AlphabetViolation('2')),
			foreign,
			"Foreign transition label accepted"
		);
	}

	#[test]
	fn run() {
		let nfa = same_ends();

		assert_eq!(Ok(true), nfa.run_str("11001111001"), "Incorrect result on accepting run");
		assert_eq!(Ok(true), nfa.run_str("00"));
		assert_eq!(Ok(false), nfa.run_str("10"), "Incorrect result on rejecting run");
		assert_eq!(Ok(false), nfa.run_str(""), "Empty input accepted");
		assert_eq!(
			Err(AutomatonError::AlphabetViolation('2')),
			nfa.run_str("0120"),
			"Foreign input not reported"
		);
	}

	#[test]
	fn run_epsilon() {
		let nfa = NFA::from_transitions(
			Alphabet::from("01"),
			0,
			vec![(0, false), (1, true), (2, false), (3, false), (4, true)],
			vec![
				(0, Symbol::Epsilon, 1),
				(1, Symbol::Epsilon, 2),
				(2, Symbol::Literal('1'), 3),
				(3, Symbol::Epsilon, 4),
			],
		)
		.unwrap();

		assert_eq!(Ok(true), nfa.run_str(""), "Empty input not accepted through epsilon");
		assert_eq!(Ok(true), nfa.run_str("1"));
		assert_eq!(Ok(false), nfa.run_str("0"));
		assert_eq!(Ok(false), nfa.run_str("11"));
	}

	#[test]
	fn definition() {
		let nfa = same_ends();
		let definition = nfa.definition();
		assert_eq!(btreeset![0, 1, 2, 3], definition.states);
		assert_eq!(Ok(nfa), NFA::new(definition), "Definition does not rebuild the NFA");

		let dangling = NFADefinition {
			alphabet: Alphabet::from("0"),
			states: btreeset![0],
			start: 0,
			accept: btreeset![0, 7],
			transitions: vec![],
		};
		assert_eq!(
			Err(AutomatonError::InvalidAutomaton(
				InvalidAutomaton::InexistentState(7)
			)),
			NFA::new(dangling)
		);
	}

	#[test]
	fn deserialize() {
		let yaml = r"{alphabet: [a, b], states: [0, 1, 2], start: 0, accept: [2], transitions: [[0, ~, 1], [1, a, 1], [1, b, 2]]}";
		let nfa: NFA<char> = serde_yaml::from_str(yaml).unwrap();
		assert!(nfa.has_state(2), "Deserialized NFA is missing state 2");
		assert_eq!(Ok(true), nfa.run_str("aab"), "Incorrect result after run");
		assert_eq!(Ok(false), nfa.run_str("ba"), "Incorrect result after run");

		let yaml = r"{alphabet: [a], states: [0], start: 0}";
		let bare: NFA<char> = serde_yaml::from_str(yaml).unwrap();
		assert!(bare.accepting().is_empty(), "Omitted accept list not defaulted");
		assert_eq!(0, bare.transitions().count(), "Omitted transitions not defaulted");

		let yaml = r"{alphabet: [a], states: [0], start: 0, transitions: [[0, a, 1]]}";
		assert!(
			serde_yaml::from_str::<NFA<char>>(yaml).is_err(),
			"Invalid NFA deserialized"
		);
	}

	#[test]
	fn serialize() {
		let nfa = same_ends();
		let yaml = serde_yaml::to_string(&nfa).unwrap();
		let back: NFA<char> = serde_yaml::from_str(&yaml).unwrap();
		assert_eq!(nfa, back, "Serialized NFA does not deserialize to itself");
	}
}
