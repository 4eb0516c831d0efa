//! Structural operators combining automata into new ones.
//!
//! Every operator consumes its operands and returns a fresh [`NFA`] whose
//! states are disjoint renumberings of the operands' states plus any new
//! start or accept states the construction needs.

use super::{Alphabet, Automaton, AutomatonError, Input, StateId, NFA};
use std::collections::BTreeMap;

impl<I> NFA<I>
where
	I: Input,
{
	/// Creates the two-state automaton accepting exactly `input`.
	pub fn symbol(alphabet: Alphabet<I>, input: I) -> Result<Self, AutomatonError<I>> {
		Self::from_transitions(alphabet, 0, vec![(0, false), (1, true)], vec![(0, input, 1)])
	}

	/// Returns an equivalent automaton with exactly one accepting state,
	/// renumbered from `0`.
	///
	/// An automaton with several accepting states gets a fresh accepting state
	/// reached by epsilon from each of them. One that accepts nothing gets a
	/// fresh, unreachable accepting state.
	pub fn single_accept(self) -> Self {
		self.normalize().0
	}

	/// Renumbers from `0` and collapses the accepting states into one,
	/// returning it alongside the automaton. Fresh ids start at `len()`.
	fn normalize(self) -> (Self, StateId) {
		let mut nfa = self.renumber(0);
		let accepting = nfa.accepting();
		if let (1, Some(&accept)) = (accepting.len(), accepting.iter().next()) {
			return (nfa, accept);
		}

		let accept = nfa.len() as StateId;
		nfa.add_state(accept, true);
		for id in accepting {
			nfa.set_accepting(id, false);
			nfa.connect(id, accept);
		}
		(nfa, accept)
	}

	/// Renumbers the states, in ascending order, to `offset`, `offset + 1`, ...
	///
	/// # Panics
	///
	/// Panics if the last renumbered id would exceed [`StateId::MAX`].
	pub fn renumber(self, offset: StateId) -> Self {
		let room = u64::from(StateId::MAX - offset) + 1;
		assert!(
			self.len() as u64 <= room,
			"{} states do not fit above offset {}",
			self.len(),
			offset
		);
		let ids: BTreeMap<StateId, StateId> = self.states().zip(offset..=StateId::MAX).collect();
		self.relabel(&ids)
	}

	/// Relabels every state through `mapping`, leaving unmapped states unchanged.
	///
	/// The mapping must be injective over the automaton's states.
	pub fn relabel(self, mapping: &BTreeMap<StateId, StateId>) -> Self {
		self.map_states(|id| mapping.get(&id).copied().unwrap_or(id))
	}

	/// Builds the automaton accepting `x` followed by `y`, for every `x`
	/// accepted by `self` and `y` accepted by `other`.
	pub fn concat(self, other: Self) -> Self {
		let (mut left, splice) = self.normalize();
		let (right, _) = other.normalize();
		let right = right.renumber(left.len() as StateId);

		left.set_accepting(splice, false);
		left.connect(splice, right.start());
		left.set_alphabet(left.alphabet_union(&right));
		right.merge_into(&mut left);
		left
	}

	/// Builds the automaton accepting whatever `self` or `other` accepts.
	pub fn alternate(self, other: Self) -> Self {
		let (left, left_exit) = self.normalize();
		let (right, right_exit) = other.normalize();
		let offset = left.len() as StateId;
		let (right, right_exit) = (right.renumber(offset), right_exit + offset);

		let start = offset + right.len() as StateId;
		let accept = start + 1;
		let mut nfa = Self::with_start(left.alphabet_union(&right), start, false);
		nfa.add_state(accept, true);

		for (mut operand, exit) in vec![(left, left_exit), (right, right_exit)] {
			let entry = operand.start();
			operand.set_accepting(exit, false);
			operand.merge_into(&mut nfa);
			nfa.connect(start, entry);
			nfa.connect(exit, accept);
		}
		nfa
	}

	/// Builds the automaton accepting any concatenation of zero or more
	/// strings accepted by `self`.
	pub fn kleene(self) -> Self {
		let (mut inner, exit) = self.normalize();
		let entry = inner.start();
		let start = inner.len() as StateId;
		let accept = start + 1;

		inner.set_accepting(exit, false);
		let mut nfa = Self::with_start(inner.alphabet().clone(), start, false);
		nfa.add_state(accept, true);
		inner.merge_into(&mut nfa);

		nfa.connect(start, entry);
		nfa.connect(start, accept);
		nfa.connect(exit, entry);
		nfa.connect(exit, accept);
		nfa
	}

	fn alphabet_union(&self, other: &Self) -> Alphabet<I> {
		self.alphabet().union(other.alphabet())
	}
}

#[cfg(test)]
mod tests {
	use crate::{Alphabet, Automaton, CharAutomaton, StateId, Symbol, NFA};
	use maplit::{btreemap, btreeset};
	use quickcheck::quickcheck;

	fn digit(input: char) -> NFA<char> {
		NFA::symbol(Alphabet::digits(), input).unwrap()
	}

	/// Accepts `0` and `00` through two separate accepting states.
	fn zero_or_two() -> NFA<char> {
		NFA::from_transitions(
			Alphabet::digits(),
			0,
			vec![(0, false), (1, true), (2, true)],
			vec![(0, '0', 1), (1, '0', 2)],
		)
		.unwrap()
	}

	/// Decodes arbitrary bytes into a short string over `01`.
	fn binary(bytes: &[u8]) -> String {
		bytes.iter().take(16).map(|b| if b % 2 == 0 { '0' } else { '1' }).collect()
	}

	/// Whether `input` splits into pieces each accepted by `nfa`.
	fn partitions(nfa: &NFA<char>, input: &str) -> bool {
		input.is_empty()
			|| (1..=input.len()).any(|i| {
				nfa.run_str(&input[..i]) == Ok(true) && partitions(nfa, &input[i..])
			})
	}

	#[test]
	fn symbol() {
		let nfa = digit('7');
		assert_eq!(2, nfa.len(), "Primitive does not have two states");
		assert_eq!(Ok(true), nfa.run_str("7"));
		assert_eq!(Ok(false), nfa.run_str(""));
		assert_eq!(Ok(false), nfa.run_str("77"));
		assert!(
			NFA::symbol(Alphabet::digits(), 'a').is_err(),
			"Foreign primitive accepted"
		);
	}

	#[test]
	fn single_accept() {
		let nfa = zero_or_two().single_accept();
		assert_eq!(btreeset![3], nfa.accepting(), "Accepting states not collapsed");
		assert_eq!(Ok(true), nfa.run_str("0"));
		assert_eq!(Ok(true), nfa.run_str("00"));
		assert_eq!(Ok(false), nfa.run_str("000"));

		let nothing = NFA::<char>::from_transitions(
			Alphabet::digits(),
			0,
			vec![(0, false)],
			Vec::<(u32, char, u32)>::new(),
		)
		.unwrap()
		.single_accept();
		assert_eq!(btreeset![1], nothing.accepting());
		assert_eq!(Ok(false), nothing.run_str(""), "Empty automaton accepts");
	}

	#[test]
	fn renumber() {
		let nfa = zero_or_two();
		let moved = nfa.clone().renumber(10);
		assert_eq!(vec![10, 11, 12], moved.states().collect::<Vec<_>>(), "Incorrect renumbering");
		assert_eq!(10, moved.start());
		assert_eq!(btreeset![11, 12], moved.accepting());
		assert_eq!(
			Some(&btreeset![12]),
			moved.destinations(11, &Symbol::Literal('0'))
		);

		let back = moved.relabel(&btreemap! {10 => 0, 11 => 1, 12 => 2});
		assert_eq!(nfa, back, "Relabeling back does not restore the automaton");
	}

	#[test]
	fn concat() {
		let nfa = digit('1').concat(digit('2'));
		assert_eq!(Ok(true), nfa.run_str("12"));
		assert_eq!(Ok(false), nfa.run_str("1"));
		assert_eq!(Ok(false), nfa.run_str("21"));
		assert_eq!(1, nfa.accepting().len(), "Concatenation has several accepting states");

		let nfa = zero_or_two().concat(digit('1'));
		assert_eq!(Ok(true), nfa.run_str("01"));
		assert_eq!(Ok(true), nfa.run_str("001"));
		assert_eq!(Ok(false), nfa.run_str("0001"));
	}

	#[test]
	fn alternate() {
		let nfa = digit('0').kleene().alternate(digit('1').kleene());
		assert_eq!(Ok(true), nfa.run_str("0000"));
		assert_eq!(Ok(true), nfa.run_str("1111"));
		assert_eq!(Ok(true), nfa.run_str(""));
		assert_eq!(Ok(false), nfa.run_str("01"), "Mixed input accepted");
	}

	#[test]
	fn kleene() {
		let nfa = digit('7').kleene();
		assert_eq!(Ok(true), nfa.run_str(""), "Empty input rejected");
		assert_eq!(Ok(true), nfa.run_str("7"));
		assert_eq!(Ok(true), nfa.run_str("777"));
		assert_eq!(Ok(false), nfa.run_str("78"));

		let nfa = zero_or_two().concat(digit('1')).kleene();
		assert_eq!(Ok(true), nfa.run_str("01001"));
		assert_eq!(Ok(false), nfa.run_str("0001"));
	}

	#[test]
	fn ascending_digits() {
		let nfa = digit('0')
			.kleene()
			.concat(digit('1').kleene())
			.concat(digit('2').kleene());
		for accepted in &["00001111222", "", "2"] {
			assert_eq!(Ok(true), nfa.run_str(accepted), "{:?} rejected", accepted);
		}
		assert_eq!(Ok(false), nfa.run_str("021"));
	}

	#[test]
	fn highest_ids() {
		let top = NFA::from_transitions(
			Alphabet::digits(),
			StateId::MAX - 1,
			vec![(StateId::MAX - 1, false), (StateId::MAX, true)],
			vec![(StateId::MAX - 1, '1', StateId::MAX)],
		)
		.unwrap();
		assert_eq!(None, top.next_id(), "Next id past the largest state id");

		let nfa = top.clone().kleene();
		assert_eq!(Ok(true), nfa.run_str(""));
		assert_eq!(Ok(true), nfa.run_str("111"));
		let nfa = top.clone().concat(top.clone());
		assert_eq!(Ok(true), nfa.run_str("11"));
		assert_eq!(Ok(false), nfa.run_str("1"));
		let nfa = top.clone().alternate(digit('2'));
		assert_eq!(Ok(true), nfa.run_str("1"));
		assert_eq!(Ok(true), nfa.run_str("2"));
		assert_eq!(btreeset![1], top.clone().single_accept().accepting());

		let moved = top.renumber(StateId::MAX - 1);
		assert_eq!(vec![StateId::MAX - 1, StateId::MAX], moved.states().collect::<Vec<_>>());
	}

	#[test]
	#[should_panic]
	fn renumber_past_largest_id() {
		digit('1').renumber(StateId::MAX);
	}

	#[test]
	fn operands_merge_alphabets() {
		let a = NFA::symbol(Alphabet::from("a"), 'a').unwrap();
		let b = NFA::symbol(Alphabet::from("b"), 'b').unwrap();
		let nfa = a.alternate(b);
		assert_eq!(&Alphabet::from("ab"), nfa.alphabet());
		assert_eq!(Ok(true), nfa.run_str("b"));
	}

	quickcheck! {
		fn concat_splits(bytes: Vec<u8>) -> bool {
			let input = binary(&bytes);
			let left = NFA::symbol(Alphabet::from("01"), '0').unwrap().kleene();
			let right = NFA::symbol(Alphabet::from("01"), '1')
				.unwrap()
				.concat(NFA::symbol(Alphabet::from("01"), '0').unwrap())
				.kleene();
			let split = (0..=input.len()).any(|i| {
				left.run_str(&input[..i]) == Ok(true) && right.run_str(&input[i..]) == Ok(true)
			});
			left.concat(right).run_str(&input) == Ok(split)
		}

		fn alternate_either(bytes: Vec<u8>) -> bool {
			let input = binary(&bytes);
			let left = NFA::symbol(Alphabet::from("01"), '0')
				.unwrap()
				.concat(NFA::symbol(Alphabet::from("01"), '1').unwrap())
				.kleene();
			let right = NFA::symbol(Alphabet::from("01"), '1').unwrap().kleene();
			let either = left.run_str(&input) == Ok(true) || right.run_str(&input) == Ok(true);
			left.alternate(right).run_str(&input) == Ok(either)
		}

		fn kleene_partitions(bytes: Vec<u8>) -> bool {
			let input = binary(&bytes);
			let inner = NFA::symbol(Alphabet::from("01"), '0')
				.unwrap()
				.concat(NFA::symbol(Alphabet::from("01"), '1').unwrap())
				.alternate(NFA::symbol(Alphabet::from("01"), '1').unwrap());
			let expected = partitions(&inner, &input);
			inner.kleene().run_str(&input) == Ok(expected)
		}
	}
}
