use super::{Alphabet, LabelType, Position};
use crate::{
    encodings::{Edge, VariableSpace, CANONICAL_SLOT, SENTINEL_SLOT},
    sat::Assignment,
};
use anyhow::{Context, Result};
use std::{collections::BTreeSet, fmt::Display};

/// A k-occurrence automaton, given by its edges.
///
/// The states of the automaton are the slots of the symbols, plus a source and a sink.
/// A word is accepted if there is a path from the source to the sink labeled by the word,
/// the first symbol being entered in its canonical slot.
pub struct KoaAutomaton<'a, T>
where
    T: LabelType,
{
    alphabet: &'a Alphabet<T>,
    edges: BTreeSet<Edge>,
    unassigned_edges: BTreeSet<Edge>,
}

impl<'a, T> KoaAutomaton<'a, T>
where
    T: LabelType,
{
    /// Builds an automaton given its edges.
    pub fn new<I>(alphabet: &'a Alphabet<T>, edges: I) -> Self
    where
        I: IntoIterator<Item = Edge>,
    {
        Self {
            alphabet,
            edges: edges.into_iter().collect(),
            unassigned_edges: BTreeSet::new(),
        }
    }

    /// Builds an automaton from a model of an identification formula.
    ///
    /// The edges of the automaton are the ones which variable is set to `true` in the model.
    pub fn new_from_assignment(
        alphabet: &'a Alphabet<T>,
        space: &VariableSpace,
        assignment: &Assignment,
    ) -> Result<Self> {
        let with_value = |value| {
            (1..=space.n_edge_vars())
                .filter(|v| assignment.value_of(*v) == value)
                .map(|v| space.var_to_edge(v))
                .collect::<Result<BTreeSet<Edge>>>()
                .context("while translating a model into an automaton")
        };
        Ok(Self {
            alphabet,
            edges: with_value(Some(true))?,
            unassigned_edges: with_value(None)?,
        })
    }

    /// Returns the value of the variable of an edge in the model this automaton comes from.
    ///
    /// [Option::None] is returned if the variable was unassigned.
    /// Automata that were not built from a model have no unassigned edge.
    pub fn edge_value(&self, edge: &Edge) -> Option<bool> {
        if self.edges.contains(edge) {
            Some(true)
        } else if self.unassigned_edges.contains(edge) {
            None
        } else {
            Some(false)
        }
    }

    /// Returns the number of edges.
    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    /// Returns an iterator to the edges, in increasing order.
    pub fn iter_edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter()
    }

    /// Returns a human readable name for an edge, like `src -> a_1`.
    pub fn edge_name(&self, edge: &Edge) -> String {
        format!(
            "{} -> {}",
            self.node_name(edge.from, edge.from_slot),
            self.node_name(edge.to, edge.to_slot)
        )
    }

    fn node_name(&self, position: Position, slot: usize) -> String {
        match position {
            Position::Symbol(_) => format!("{}_{}", self.alphabet.position_name(position), slot),
            _ => self.alphabet.position_name(position),
        }
    }

    fn has_edge(&self, from: Position, from_slot: usize, to: Position, to_slot: usize) -> bool {
        self.edges
            .contains(&Edge::new(from, from_slot, to, to_slot))
    }

    /// Checks whether a word is accepted by the automaton.
    ///
    /// An error is returned if the word contains a symbol that is not in the alphabet.
    ///
    /// ```
    /// # use koala::encodings::Edge;
    /// # use koala::koa::{Alphabet, KoaAutomaton, Position};
    /// let alphabet = Alphabet::new_with_labels(&['a']);
    /// let a = Position::Symbol(1);
    /// let automaton = KoaAutomaton::new(
    ///     &alphabet,
    ///     vec![
    ///         Edge::new(Position::Source, 0, a, 1),
    ///         Edge::new(a, 1, a, 2),
    ///         Edge::new(a, 2, Position::Sink, 0),
    ///     ],
    /// );
    /// assert!(automaton.accepts(&['a', 'a']).unwrap());
    /// assert!(!automaton.accepts(&['a']).unwrap());
    /// assert!(!automaton.accepts(&[]).unwrap());
    /// ```
    pub fn accepts(&self, word: &[T]) -> Result<bool> {
        let ids = self.alphabet.sentence_ids(word)?;
        if ids.is_empty() {
            return Ok(self.has_edge(
                Position::Source,
                SENTINEL_SLOT,
                Position::Sink,
                SENTINEL_SLOT,
            ));
        }
        if !self.has_edge(
            Position::Source,
            SENTINEL_SLOT,
            Position::Symbol(ids[0]),
            CANONICAL_SLOT,
        ) {
            return Ok(false);
        }
        let mut current = BTreeSet::from([CANONICAL_SLOT]);
        for w in ids.windows(2) {
            let (from, to) = (Position::Symbol(w[0]), Position::Symbol(w[1]));
            current = self
                .edges
                .iter()
                .filter(|e| e.from == from && e.to == to && current.contains(&e.from_slot))
                .map(|e| e.to_slot)
                .collect();
            if current.is_empty() {
                return Ok(false);
            }
        }
        let last = Position::Symbol(ids[ids.len() - 1]);
        Ok(current
            .iter()
            .any(|k| self.has_edge(last, *k, Position::Sink, SENTINEL_SLOT)))
    }
}

impl<T> Display for KoaAutomaton<'_, T>
where
    T: LabelType,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for e in self.edges.iter() {
            writeln!(f, "{}", self.edge_name(e))?;
        }
        Ok(())
    }
}
