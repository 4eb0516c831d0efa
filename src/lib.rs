//! Finite automata over a fixed alphabet.
//!
//! [`NFA`] models an automaton with epsilon moves, [`DFA`] a deterministic one.
//! Both are simulated through the [`Automaton`] trait. An NFA can be turned
//! into a DFA with [`NFA::to_dfa`], combined with other NFAs through
//! [`NFA::concat`], [`NFA::alternate`] and [`NFA::kleene`], or compiled from a
//! regular expression with [`compile`].
//!
//! ```
//! use finite::{compile, Alphabet, CharAutomaton};
//!
//! let nfa = compile("5(6*7)*8|1234", &Alphabet::digits()).unwrap();
//! assert_eq!(Ok(true), nfa.run_str("5666766778"));
//! assert_eq!(Ok(false), nfa.run_str("56667667768"));
//! assert_eq!(Ok(false), nfa.to_dfa().run_str("1235"));
//! ```

mod algebra;
mod automaton;
mod closure;
mod dfa;
mod nfa;
pub mod regex;
mod state;
mod subset;
mod symbol;

pub use automaton::{Automaton, AutomatonError, CharAutomaton, InvalidAutomaton};
pub use dfa::{DFADefinition, DFA};
pub use nfa::{NFADefinition, NFA};
pub use regex::{compile, Compiler, MalformedRegex, Regex, RegexErrorKind};
pub use state::{StateId, StateSet};
pub use symbol::{Alphabet, Input, Symbol};
