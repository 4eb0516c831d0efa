//! Regular expressions over an alphabet of `char`s.
//!
//! Supported syntax: literals (any alphabet member), implicit concatenation,
//! alternation `|`, postfix Kleene star `*` and grouping `(` `)`.
//!
//! ```text
//! regex   = concat ( '|' concat )*
//! concat  = factor+
//! factor  = atom '*'?
//! atom    = literal | '(' regex ')'
//! ```

use super::{Alphabet, AutomatonError, Input, NFA};
use log::{debug, trace};
use std::{error, fmt, iter::Peekable, str::CharIndices};

/// Parse tree of a regular expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Regex<I> {
	Literal(I),
	Concat(Vec<Regex<I>>),
	Alternation(Vec<Regex<I>>),
	Star(Box<Regex<I>>),
	Group(Box<Regex<I>>),
}

/// Reason a pattern failed to parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegexErrorKind {
	/// Nothing between two `|`, at either end of the pattern, or inside `()`.
	EmptyAlternative,
	/// A `(` never closed.
	UnmatchedOpen,
	/// A `)` never opened.
	UnmatchedClose,
	/// A `*` with no factor directly before it.
	DanglingStar,
	/// Groups nested deeper than the configured limit.
	NestingTooDeep,
}

/// A syntax error together with the byte offset it was detected at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MalformedRegex {
	pub kind: RegexErrorKind,
	pub position: usize,
}

impl fmt::Display for MalformedRegex {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let reason = match self.kind {
			RegexErrorKind::EmptyAlternative => "empty alternative",
			RegexErrorKind::UnmatchedOpen => "unmatched '('",
			RegexErrorKind::UnmatchedClose => "unmatched ')'",
			RegexErrorKind::DanglingStar => "'*' without preceding factor",
			RegexErrorKind::NestingTooDeep => "groups nested too deeply",
		};
		write!(f, "Malformed regex: {} at position {}", reason, self.position)
	}
}

impl error::Error for MalformedRegex {}

/// Default bound on the depth of a parse tree.
pub const DEFAULT_NEST_LIMIT: usize = 250;

/// A parsed node with the height of its subtree.
type Node = (Regex<char>, usize);

struct Parser<'a> {
	chars: Peekable<CharIndices<'a>>,
	len: usize,
	depth: usize,
	nest_limit: usize,
}

impl<'a> Parser<'a> {
	fn new(pattern: &'a str, nest_limit: usize) -> Self {
		Self {
			chars: pattern.char_indices().peekable(),
			len: pattern.len(),
			depth: 0,
			nest_limit,
		}
	}

	fn peek(&mut self) -> Option<char> {
		self.chars.peek().map(|&(_, c)| c)
	}

	fn position(&mut self) -> usize {
		let len = self.len;
		self.chars.peek().map_or(len, |&(i, _)| i)
	}

	fn error(&mut self, kind: RegexErrorKind) -> MalformedRegex {
		MalformedRegex {
			kind,
			position: self.position(),
		}
	}

	fn parse(mut self) -> Result<Regex<char>, MalformedRegex> {
		let (regex, _) = self.parse_alternation()?;
		match self.peek() {
			Some(_) => Err(self.error(RegexErrorKind::UnmatchedClose)),
			None => Ok(regex),
		}
	}

	/// Checks the height of a freshly built node against the nesting limit.
	fn nest(&mut self, regex: Regex<char>, height: usize) -> Result<Node, MalformedRegex> {
		if height > self.nest_limit {
			return Err(self.error(RegexErrorKind::NestingTooDeep));
		}
		Ok((regex, height))
	}

	fn parse_alternation(&mut self) -> Result<Node, MalformedRegex> {
		let mut alternatives = vec![self.parse_concat()?];
		while self.peek() == Some('|') {
			self.chars.next();
			alternatives.push(self.parse_concat()?);
		}
		self.wrap(alternatives, Regex::Alternation)
	}

	fn parse_concat(&mut self) -> Result<Node, MalformedRegex> {
		let mut factors = Vec::new();
		loop {
			match self.peek() {
				None | Some('|') => break,
				Some(')') if self.depth > 0 => break,
				Some(')') => return Err(self.error(RegexErrorKind::UnmatchedClose)),
				Some(_) => factors.push(self.parse_factor()?),
			}
		}
		if factors.is_empty() {
			return Err(self.error(RegexErrorKind::EmptyAlternative));
		}
		self.wrap(factors, Regex::Concat)
	}

	/// Wraps two or more nodes with `build`, passing a single node through.
	fn wrap<F>(&mut self, mut nodes: Vec<Node>, build: F) -> Result<Node, MalformedRegex>
	where
		F: FnOnce(Vec<Regex<char>>) -> Regex<char>,
	{
		if nodes.len() == 1 {
			if let Some(node) = nodes.pop() {
				return Ok(node);
			}
		}
		let height = nodes.iter().map(|&(_, height)| height).max().unwrap_or(0) + 1;
		let items = nodes.into_iter().map(|(regex, _)| regex).collect();
		self.nest(build(items), height)
	}

	fn parse_factor(&mut self) -> Result<Node, MalformedRegex> {
		let (atom, height) = self.parse_atom()?;
		if self.peek() != Some('*') {
			return Ok((atom, height));
		}
		self.chars.next();
		if self.peek() == Some('*') {
			return Err(self.error(RegexErrorKind::DanglingStar));
		}
		self.nest(Regex::Star(Box::new(atom)), height + 1)
	}

	fn parse_atom(&mut self) -> Result<Node, MalformedRegex> {
		let open = self.position();
		match self.chars.next() {
			Some((_, '(')) => {
				if self.depth >= self.nest_limit {
					return Err(MalformedRegex {
						kind: RegexErrorKind::NestingTooDeep,
						position: open,
					});
				}
				self.depth += 1;
				let (inner, height) = self.parse_alternation()?;
				self.depth -= 1;
				match self.chars.next() {
					Some((_, ')')) => self.nest(Regex::Group(Box::new(inner)), height + 1),
					_ => Err(MalformedRegex {
						kind: RegexErrorKind::UnmatchedOpen,
						position: open,
					}),
				}
			}
			Some((i, '*')) => Err(MalformedRegex {
				kind: RegexErrorKind::DanglingStar,
				position: i,
			}),
			Some((_, c)) => Ok((Regex::Literal(c), 0)),
			None => Err(self.error(RegexErrorKind::EmptyAlternative)),
		}
	}
}

impl Regex<char> {
	/// Parses a pattern into its tree, without checking literals against any alphabet.
	///
	/// Fails with `NestingTooDeep` once the tree grows deeper than [`DEFAULT_NEST_LIMIT`].
	pub fn parse(pattern: &str) -> Result<Self, MalformedRegex> {
		Self::parse_nested(pattern, DEFAULT_NEST_LIMIT)
	}

	fn parse_nested(pattern: &str, nest_limit: usize) -> Result<Self, MalformedRegex> {
		let regex = Parser::new(pattern, nest_limit).parse()?;
		trace!("parsed {:?} into {:?}", pattern, regex);
		Ok(regex)
	}
}

impl<I> Regex<I>
where
	I: Input,
{
	/// Collects the literals of the tree from left to right.
	pub fn literals(&self) -> Vec<&I> {
		let mut literals = Vec::new();
		let mut pending = vec![self];
		while let Some(node) = pending.pop() {
			match node {
				Self::Literal(input) => literals.push(input),
				Self::Concat(items) | Self::Alternation(items) => {
					pending.extend(items.iter().rev());
				}
				Self::Star(inner) | Self::Group(inner) => pending.push(inner.as_ref()),
			}
		}
		literals
	}

	/// Compiles the tree into an NFA over `alphabet` with the default configuration.
	pub fn compile(&self, alphabet: &Alphabet<I>) -> Result<NFA<I>, AutomatonError<I>> {
		Compiler::new(alphabet.clone()).build(self)
	}
}

impl<I> fmt::Display for Regex<I>
where
	I: fmt::Display,
{
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Literal(input) => write!(f, "{}", input),
			Self::Concat(items) => {
				for item in items {
					match item {
						Self::Alternation(_) => write!(f, "({})", item)?,
						_ => write!(f, "{}", item)?,
					}
				}
				Ok(())
			}
			Self::Alternation(items) => {
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						write!(f, "|")?;
					}
					write!(f, "{}", item)?;
				}
				Ok(())
			}
			Self::Star(inner) => match **inner {
				Self::Literal(_) | Self::Group(_) => write!(f, "{}*", inner),
				_ => write!(f, "({})*", inner),
			},
			Self::Group(inner) => write!(f, "({})", inner),
		}
	}
}

/// Regex to NFA compiler configuration.
#[derive(Clone, Debug)]
pub struct Compiler<I>
where
	I: Input,
{
	alphabet: Alphabet<I>,
	size_limit: Option<usize>,
	nest_limit: usize,
}

impl<I> Compiler<I>
where
	I: Input,
{
	/// Creates a compiler for literals drawn from `alphabet`, without a size limit
	/// and with [`DEFAULT_NEST_LIMIT`] as nesting limit.
	pub fn new(alphabet: Alphabet<I>) -> Self {
		Self {
			alphabet,
			size_limit: None,
			nest_limit: DEFAULT_NEST_LIMIT,
		}
	}

	/// Sets the maximum number of states a compiled automaton may have.
	pub fn size_limit(mut self, limit: Option<usize>) -> Self {
		self.size_limit = limit;
		self
	}

	/// Sets how deep groups may nest in a pattern, and how deep a parse tree
	/// handed to [`Compiler::build`] may be.
	pub fn nest_limit(mut self, limit: usize) -> Self {
		self.nest_limit = limit;
		self
	}

	pub fn alphabet(&self) -> &Alphabet<I> {
		&self.alphabet
	}

	/// Compiles a parse tree.
	///
	/// Every literal is checked against the alphabet before any automaton is built.
	pub fn build(&self, regex: &Regex<I>) -> Result<NFA<I>, AutomatonError<I>> {
		if let Some(foreign) = self.alphabet.first_foreign(regex.literals()) {
			return Err(AutomatonError::AlphabetViolation(foreign.clone()));
		}
		self.build_node(regex, 0)
	}

	fn build_node(&self, regex: &Regex<I>, depth: usize) -> Result<NFA<I>, AutomatonError<I>> {
		if depth > self.nest_limit {
			return Err(AutomatonError::NestLimitExceeded {
				limit: self.nest_limit,
			});
		}
		let nfa = match regex {
			Regex::Literal(input) => NFA::symbol(self.alphabet.clone(), input.clone())?,
			Regex::Concat(items) => self.fold(items, depth + 1, NFA::concat, true)?,
			Regex::Alternation(items) => self.fold(items, depth + 1, NFA::alternate, false)?,
			Regex::Star(inner) => self.build_node(inner, depth + 1)?.kleene(),
			Regex::Group(inner) => self.build_node(inner, depth + 1)?,
		};
		self.check_size(nfa)
	}

	/// Folds the compiled items left to right with `combine`.
	/// An empty list yields the automaton accepting only the empty string
	/// when `empty_accepts`, and nothing otherwise.
	fn fold<F>(
		&self,
		items: &[Regex<I>],
		depth: usize,
		combine: F,
		empty_accepts: bool,
	) -> Result<NFA<I>, AutomatonError<I>>
	where
		F: Fn(NFA<I>, NFA<I>) -> NFA<I>,
	{
		let mut items = items.iter();
		let mut nfa = match items.next() {
			Some(first) => self.build_node(first, depth)?,
			None => return Ok(NFA::with_start(self.alphabet.clone(), 0, empty_accepts)),
		};
		for item in items {
			nfa = self.check_size(combine(nfa, self.build_node(item, depth)?))?;
		}
		Ok(nfa)
	}

	fn check_size(&self, nfa: NFA<I>) -> Result<NFA<I>, AutomatonError<I>> {
		match self.size_limit {
			Some(limit) if nfa.len() > limit => Err(AutomatonError::SizeLimitExceeded {
				limit,
				states: nfa.len(),
			}),
			_ => Ok(nfa),
		}
	}
}

impl Compiler<char> {
	/// Parses and compiles a pattern.
	pub fn compile(&self, pattern: &str) -> Result<NFA<char>, AutomatonError<char>> {
		let regex = Regex::parse_nested(pattern, self.nest_limit)?;
		let nfa = self.build(&regex)?;
		debug!("compiled {:?} into {} NFA states", pattern, nfa.len());
		Ok(nfa)
	}
}

/// Parses and compiles a pattern over `alphabet`.
pub fn compile(
	pattern: &str,
	alphabet: &Alphabet<char>,
) -> Result<NFA<char>, AutomatonError<char>> {
	Compiler::new(alphabet.clone()).compile(pattern)
}
