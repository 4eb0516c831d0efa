use super::{regex::MalformedRegex, Alphabet, Input, StateId};
use std::{error, fmt};

/// Trait representing an abstract automaton.
///
/// A run never mutates the automaton: the current position is an explicit
/// [`Automaton::State`] value threaded through [`Automaton::step`].
pub trait Automaton<I>
where
	I: Input,
{
	/// Position of a run inside the automaton.
	type State: Clone;

	/// Returns the alphabet inputs are checked against.
	fn alphabet(&self) -> &Alphabet<I>;

	/// Returns the position a run starts from.
	fn initial(&self) -> Self::State;

	/// Performs a single state transition.
	/// Returns `None` once no continuation of the run can be accepted.
	fn step(&self, state: &Self::State, input: &I) -> Option<Self::State>;

	/// Checks whether the given position is accepting.
	fn accepts(&self, state: &Self::State) -> bool;

	/// Runs the automaton on a sequence of inputs.
	/// Returns an `AutomatonError::AlphabetViolation` error before simulating
	/// if any input lies outside the alphabet.
	fn run<'a, V>(&self, inputs: V) -> Result<bool, AutomatonError<I>>
	where
		V: IntoIterator<Item = &'a I>,
		I: 'a,
	{
		let inputs: Vec<&I> = inputs.into_iter().collect();
		if let Some(foreign) = self.alphabet().first_foreign(inputs.iter().copied()) {
			return Err(AutomatonError::AlphabetViolation(foreign.clone()));
		}

		let mut state = self.initial();
		for input in inputs {
			match self.step(&state, input) {
				Some(next) => state = next,
				None => return Ok(false),
			}
		}
		Ok(self.accepts(&state))
	}
}

/// Convenience for automata over `char`.
pub trait CharAutomaton: Automaton<char> {
	/// Runs the automaton on the characters of a string.
	fn run_str(&self, input: &str) -> Result<bool, AutomatonError<char>> {
		self.run(&input.chars().collect::<Vec<_>>())
	}
}

impl<A> CharAutomaton for A where A: Automaton<char> {}

/// Enum representing an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutomatonError<I> {
	/// An input or regex literal outside the alphabet.
	AlphabetViolation(I),
	MalformedRegex(MalformedRegex),
	InvalidAutomaton(InvalidAutomaton<I>),
	/// A compiled automaton grew past the configured state limit.
	SizeLimitExceeded { limit: usize, states: usize },
	/// A parse tree deeper than the configured nesting limit.
	NestLimitExceeded { limit: usize },
}

/// Construction-time contract violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidAutomaton<I> {
	InexistentState(StateId),
	/// A DFA transition labeled with epsilon.
	EpsilonTransition(StateId),
	/// A DFA state with two destinations for the same input.
	Nondeterministic { state: StateId, input: I },
}

impl<I> AutomatonError<I> {
	pub(crate) fn inexistent(state: StateId) -> Self {
		Self::InvalidAutomaton(InvalidAutomaton::InexistentState(state))
	}
}

impl<I> From<InvalidAutomaton<I>> for AutomatonError<I> {
	fn from(err: InvalidAutomaton<I>) -> Self {
		Self::InvalidAutomaton(err)
	}
}

impl<I> From<MalformedRegex> for AutomatonError<I> {
	fn from(err: MalformedRegex) -> Self {
		Self::MalformedRegex(err)
	}
}

impl<I> fmt::Display for AutomatonError<I>
where
	I: fmt::Debug,
{
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::AlphabetViolation(input) => write!(f, "Symbol {:?} not in alphabet", input),
			Self::MalformedRegex(err) => write!(f, "{}", err),
			Self::InvalidAutomaton(err) => write!(f, "{}", err),
			Self::SizeLimitExceeded { limit, states } => write!(
				f,
				"Automaton with {} states exceeds size limit of {}",
				states, limit
			),
			Self::NestLimitExceeded { limit } => {
				write!(f, "Regex nested deeper than the limit of {}", limit)
			}
		}
	}
}

impl<I> fmt::Display for InvalidAutomaton<I>
where
	I: fmt::Debug,
{
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::InexistentState(state) => write!(f, "Inexistent State ID \"{:?}\"", state),
			Self::EpsilonTransition(state) => {
				write!(f, "Epsilon transition from DFA state \"{:?}\"", state)
			}
			Self::Nondeterministic { state, input } => write!(
				f,
				"Multiple transitions from state \"{:?}\" on {:?}",
				state, input
			),
		}
	}
}

impl<I> error::Error for AutomatonError<I> where I: fmt::Debug {}
