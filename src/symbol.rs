use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, hash::Hash};

/// Bound shared by every alphabet member type.
pub trait Input: Clone + Ord + Hash + fmt::Debug {}

impl<T> Input for T where T: Clone + Ord + Hash + fmt::Debug {}

/// Transition label: either a member of the alphabet or a silent move.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Symbol<I> {
	Literal(I),
	Epsilon,
}

impl<I> Symbol<I> {
	pub fn is_epsilon(&self) -> bool {
		matches!(self, Self::Epsilon)
	}

	/// Returns the literal, or `None` for an epsilon label.
	pub fn literal(&self) -> Option<&I> {
		match self {
			Self::Literal(input) => Some(input),
			Self::Epsilon => None,
		}
	}

	/// Maps `None` to epsilon.
	pub fn from_option(input: Option<I>) -> Self {
		input.map_or(Self::Epsilon, Self::Literal)
	}

	pub fn into_option(self) -> Option<I> {
		match self {
			Self::Literal(input) => Some(input),
			Self::Epsilon => None,
		}
	}
}

impl<I> From<I> for Symbol<I> {
	fn from(input: I) -> Self {
		Self::Literal(input)
	}
}

impl<I> fmt::Display for Symbol<I>
where
	I: fmt::Display,
{
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Literal(input) => write!(f, "{}", input),
			Self::Epsilon => write!(f, "ε"),
		}
	}
}

/// A fixed finite set of input symbols.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Alphabet<I>
where
	I: Ord,
{
	symbols: BTreeSet<I>,
}

impl<I> Alphabet<I>
where
	I: Input,
{
	pub fn new<V>(symbols: V) -> Self
	where
		V: IntoIterator<Item = I>,
	{
		symbols.into_iter().collect()
	}

	pub fn contains(&self, input: &I) -> bool {
		self.symbols.contains(input)
	}

	/// Iterates the symbols in ascending order.
	pub fn iter(&self) -> impl Iterator<Item = &I> + '_ {
		self.symbols.iter()
	}

	pub fn len(&self) -> usize {
		self.symbols.len()
	}

	pub fn is_empty(&self) -> bool {
		self.symbols.is_empty()
	}

	/// Returns the union of two alphabets.
	pub fn union(&self, other: &Self) -> Self {
		self.symbols.union(&other.symbols).cloned().collect()
	}

	/// Returns the first input not contained in the alphabet.
	pub(crate) fn first_foreign<'a, V>(&self, inputs: V) -> Option<&'a I>
	where
		V: IntoIterator<Item = &'a I>,
		I: 'a,
	{
		inputs.into_iter().find(|input| !self.contains(input))
	}
}

impl Alphabet<char> {
	/// The ten decimal digits `0` through `9`.
	pub fn digits() -> Self {
		('0'..='9').collect()
	}
}

impl<I> FromIterator<I> for Alphabet<I>
where
	I: Ord,
{
	fn from_iter<V: IntoIterator<Item = I>>(iter: V) -> Self {
		Self {
			symbols: iter.into_iter().collect(),
		}
	}
}

impl From<&str> for Alphabet<char> {
	fn from(symbols: &str) -> Self {
		symbols.chars().collect()
	}
}
