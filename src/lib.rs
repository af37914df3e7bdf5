//! Koala is a SAT-based learner of k-occurrence automata.
//!
//! Given an alphabet, a bound `k` on the number of internal copies (slots) of each symbol,
//! a set of positive samples and a set of negative samples,
//! Koala builds a boolean formula which is satisfiable iff an automaton with at most `k` slots per symbol
//! accepts the positive samples and rejects the negative ones.
//! The formula is translated into CNF and given to a SAT solver; a model is translated back into an automaton.

#![warn(missing_docs)]

pub mod encodings;

pub mod formula;

pub mod io;

pub mod koa;

pub mod sat;

pub mod solvers;
