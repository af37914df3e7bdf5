use crate::koa::Position;
use anyhow::{anyhow, Context, Result};
use std::fmt::Display;

/// The slot used by the sentinel positions ([`Position::Source`] and [`Position::Sink`]).
pub const SENTINEL_SLOT: usize = 0;

/// The slot of a symbol which is the only one reachable from the source.
pub const CANONICAL_SLOT: usize = 1;

/// A directed edge between two (position, slot) pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    /// The origin position.
    pub from: Position,
    /// The slot of the origin.
    pub from_slot: usize,
    /// The destination position.
    pub to: Position,
    /// The slot of the destination.
    pub to_slot: usize,
}

impl Edge {
    /// Builds a new edge.
    pub fn new(from: Position, from_slot: usize, to: Position, to_slot: usize) -> Self {
        Self {
            from,
            from_slot,
            to,
            to_slot,
        }
    }
}

impl Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}) -> ({}, {})",
            self.from, self.from_slot, self.to, self.to_slot
        )
    }
}

/// The bijection between the edges of a k-occurrence automaton and the variables of the encodings.
///
/// Given an alphabet of size `S` and `k` slots per symbol, there are `N = k*S + 1` nodes an edge may leave
/// (the source and the symbol slots) and `N` nodes an edge may enter (the symbol slots and the sink).
/// The `N²` edges are mapped to the variables `1..=N²` as follows:
///
/// * the edge from the source to the sink is the variable `1`, whatever `S` and `k`;
/// * the edges from the source to the symbol slots come next, in the variables `2..=N`;
/// * the edges between symbol slots form a dense `(N-1)×(N-1)` block;
/// * the edges from the symbol slots to the sink end the range.
///
/// The index `0` and the index `N²+1` are the always-true and the always-false sentinels,
/// which makes a universe of `N²+2` indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariableSpace {
    alphabet_size: usize,
    n_slots: usize,
    n_nodes: usize,
    n_edge_vars: usize,
}

impl VariableSpace {
    /// Builds the variable space for an alphabet size and a number of slots.
    ///
    /// An error is returned if the number of slots is `0` or if the space does not fit the machine integers.
    ///
    /// ```
    /// # use koala::encodings::VariableSpace;
    /// let space = VariableSpace::new(2, 2).unwrap();
    /// assert_eq!(5, space.n_nodes());
    /// assert_eq!(25, space.n_edge_vars());
    /// assert_eq!(27, space.universe_size());
    /// assert!(VariableSpace::new(2, 0).is_err());
    /// ```
    pub fn new(alphabet_size: usize, n_slots: usize) -> Result<Self> {
        if n_slots == 0 {
            return Err(anyhow!(
                "configuration error: the number of slots must be at least 1"
            ));
        }
        let overflow = || {
            anyhow!(
                "configuration error: too many variables for {} symbols and {} slots",
                alphabet_size,
                n_slots
            )
        };
        let n_nodes = alphabet_size
            .checked_mul(n_slots)
            .and_then(|n| n.checked_add(1))
            .ok_or_else(overflow)?;
        let n_edge_vars = n_nodes
            .checked_mul(n_nodes)
            .filter(|n| n.checked_add(2).is_some())
            .ok_or_else(overflow)?;
        Ok(Self {
            alphabet_size,
            n_slots,
            n_nodes,
            n_edge_vars,
        })
    }

    /// Returns the size of the alphabet.
    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// Returns the number of slots per symbol.
    pub fn n_slots(&self) -> usize {
        self.n_slots
    }

    /// Returns an iterator over the slots of a symbol.
    pub fn slots(&self) -> impl Iterator<Item = usize> + Clone {
        CANONICAL_SLOT..=self.n_slots
    }

    /// Returns `N = k*S + 1`.
    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    /// Returns the number of edge variables (`N²`).
    pub fn n_edge_vars(&self) -> usize {
        self.n_edge_vars
    }

    /// Returns the size of the universe, including the sentinels (`N² + 2`).
    pub fn universe_size(&self) -> usize {
        self.n_edge_vars + 2
    }

    /// Returns the index of the always-true sentinel.
    pub fn true_sentinel(&self) -> usize {
        0
    }

    /// Returns the index of the always-false sentinel.
    pub fn false_sentinel(&self) -> usize {
        self.n_edge_vars + 1
    }

    /// Translates a sentinel index into its boolean value.
    ///
    /// An error is returned for the indices that are not sentinels.
    pub fn sentinel_value(&self, index: usize) -> Result<bool> {
        if index == self.true_sentinel() {
            Ok(true)
        } else if index == self.false_sentinel() {
            Ok(false)
        } else {
            Err(anyhow!("invalid index: {} is not a sentinel", index))
        }
    }

    /// Returns the variable associated with an edge.
    ///
    /// An error is returned if the edge is not valid:
    /// edges cannot enter the source nor leave the sink,
    /// sentinels must use the slot [`SENTINEL_SLOT`] and symbols a slot in `1..=k`.
    ///
    /// ```
    /// # use koala::encodings::{Edge, VariableSpace};
    /// # use koala::koa::Position;
    /// let space = VariableSpace::new(3, 2).unwrap();
    /// let edge = Edge::new(Position::Source, 0, Position::Sink, 0);
    /// assert_eq!(1, space.edge_to_var(&edge).unwrap());
    /// assert_eq!(edge, space.var_to_edge(1).unwrap());
    /// ```
    pub fn edge_to_var(&self, edge: &Edge) -> Result<usize> {
        let n = self.n_nodes;
        let from = self
            .from_node(edge.from, edge.from_slot)
            .with_context(|| format!("while encoding edge {}", edge))?;
        let to = self
            .to_node(edge.to, edge.to_slot)
            .with_context(|| format!("while encoding edge {}", edge))?;
        Ok(match (from, to) {
            (None, None) => 1,
            (None, Some(c)) => 1 + c,
            (Some(r), Some(c)) => n + (r - 1) * (n - 1) + c,
            (Some(r), None) => n + (n - 1) * (n - 1) + r,
        })
    }

    /// Returns the variable associated with the edge `(from, from_slot) -> (to, to_slot)`.
    ///
    /// See [`VariableSpace::edge_to_var`].
    pub fn edge_var(
        &self,
        from: Position,
        from_slot: usize,
        to: Position,
        to_slot: usize,
    ) -> Result<usize> {
        self.edge_to_var(&Edge::new(from, from_slot, to, to_slot))
    }

    /// Returns the edge associated with a variable.
    ///
    /// An error is returned if the variable is not in `1..=N²`.
    pub fn var_to_edge(&self, var: usize) -> Result<Edge> {
        let n = self.n_nodes;
        if var == 0 || var > self.n_edge_vars {
            return Err(anyhow!(
                "invalid index: {} is not an edge variable (edge variables range from 1 to {})",
                var,
                self.n_edge_vars
            ));
        }
        let (from, to) = if var == 1 {
            (None, None)
        } else if var <= n {
            (None, Some(var - 1))
        } else if var <= n + (n - 1) * (n - 1) {
            let w = var - n - 1;
            (Some(w / (n - 1) + 1), Some(w % (n - 1) + 1))
        } else {
            (Some(var - n - (n - 1) * (n - 1)), None)
        };
        let (from, from_slot) = match from {
            None => (Position::Source, SENTINEL_SLOT),
            Some(r) => self.node_position(r),
        };
        let (to, to_slot) = match to {
            None => (Position::Sink, SENTINEL_SLOT),
            Some(c) => self.node_position(c),
        };
        Ok(Edge::new(from, from_slot, to, to_slot))
    }

    /// Returns an iterator over all the edges, in increasing variable order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        (1..=self.n_edge_vars).filter_map(|v| self.var_to_edge(v).ok())
    }

    fn symbol_node(&self, position: Position, slot: usize) -> Result<usize> {
        match position {
            Position::Symbol(id) if id >= 1 && id <= self.alphabet_size => {
                if slot < CANONICAL_SLOT || slot > self.n_slots {
                    return Err(anyhow!(
                        "invalid index: slot {} of symbol {} is out of range 1..={}",
                        slot,
                        id,
                        self.n_slots
                    ));
                }
                Ok((id - 1) * self.n_slots + slot)
            }
            _ => Err(anyhow!(
                "invalid index: {} is not a symbol of an alphabet of size {}",
                position,
                self.alphabet_size
            )),
        }
    }

    fn from_node(&self, position: Position, slot: usize) -> Result<Option<usize>> {
        match position {
            Position::Source => Self::check_sentinel_slot(position, slot).map(|_| None),
            Position::Sink => Err(anyhow!("invalid index: an edge cannot leave the sink")),
            _ => self.symbol_node(position, slot).map(Some),
        }
    }

    fn to_node(&self, position: Position, slot: usize) -> Result<Option<usize>> {
        match position {
            Position::Sink => Self::check_sentinel_slot(position, slot).map(|_| None),
            Position::Source => Err(anyhow!("invalid index: an edge cannot enter the source")),
            _ => self.symbol_node(position, slot).map(Some),
        }
    }

    fn check_sentinel_slot(position: Position, slot: usize) -> Result<()> {
        if slot == SENTINEL_SLOT {
            Ok(())
        } else {
            Err(anyhow!(
                "invalid index: {} must use slot {}, got {}",
                position,
                SENTINEL_SLOT,
                slot
            ))
        }
    }

    fn node_position(&self, node: usize) -> (Position, usize) {
        (
            Position::Symbol((node - 1) / self.n_slots + 1),
            (node - 1) % self.n_slots + 1,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn all_valid_edges(space: &VariableSpace) -> Vec<Edge> {
        let mut sources = vec![(Position::Source, SENTINEL_SLOT)];
        let mut targets = vec![(Position::Sink, SENTINEL_SLOT)];
        for id in 1..=space.alphabet_size() {
            for s in space.slots() {
                sources.push((Position::Symbol(id), s));
                targets.push((Position::Symbol(id), s));
            }
        }
        let mut edges = vec![];
        for (from, from_slot) in &sources {
            for (to, to_slot) in &targets {
                edges.push(Edge::new(*from, *from_slot, *to, *to_slot));
            }
        }
        edges
    }

    #[test]
    fn test_bijection() {
        for alphabet_size in 0..=4 {
            for n_slots in 1..=3 {
                let space = VariableSpace::new(alphabet_size, n_slots).unwrap();
                let edges = all_valid_edges(&space);
                assert_eq!(space.n_edge_vars(), edges.len());
                let mut seen = HashSet::new();
                for edge in edges {
                    let var = space.edge_to_var(&edge).unwrap();
                    assert!(var >= 1 && var <= space.n_edge_vars());
                    assert!(seen.insert(var));
                    assert_eq!(edge, space.var_to_edge(var).unwrap());
                }
            }
        }
    }

    #[test]
    fn test_blocks() {
        let space = VariableSpace::new(2, 2).unwrap();
        let src = Position::Source;
        let snk = Position::Sink;
        let a = Position::Symbol(1);
        let b = Position::Symbol(2);
        assert_eq!(1, space.edge_var(src, 0, snk, 0).unwrap());
        assert_eq!(2, space.edge_var(src, 0, a, 1).unwrap());
        assert_eq!(5, space.edge_var(src, 0, b, 2).unwrap());
        assert_eq!(6, space.edge_var(a, 1, a, 1).unwrap());
        assert_eq!(21, space.edge_var(b, 2, b, 2).unwrap());
        assert_eq!(22, space.edge_var(a, 1, snk, 0).unwrap());
        assert_eq!(25, space.edge_var(b, 2, snk, 0).unwrap());
        assert_eq!(Edge::new(b, 1, snk, 0), space.var_to_edge(24).unwrap());
        assert_eq!(Edge::new(a, 2, b, 1), space.var_to_edge(12).unwrap());
    }

    #[test]
    fn test_source_to_sink_index_is_fixed() {
        for (alphabet_size, n_slots) in [(0, 1), (1, 1), (3, 2), (5, 4)] {
            let space = VariableSpace::new(alphabet_size, n_slots).unwrap();
            assert_eq!(
                1,
                space
                    .edge_var(Position::Source, 0, Position::Sink, 0)
                    .unwrap()
            );
        }
    }

    #[test]
    fn test_sentinels() {
        let space = VariableSpace::new(1, 1).unwrap();
        assert_eq!(0, space.true_sentinel());
        assert_eq!(5, space.false_sentinel());
        assert_eq!(6, space.universe_size());
        assert!(space.sentinel_value(0).unwrap());
        assert!(!space.sentinel_value(5).unwrap());
        assert!(space.sentinel_value(1).is_err());
    }

    #[test]
    fn test_invalid_edges() {
        let space = VariableSpace::new(2, 2).unwrap();
        let a = Position::Symbol(1);
        for (from, from_slot, to, to_slot) in [
            (a, 0, a, 1),
            (a, 3, a, 1),
            (Position::Symbol(3), 1, a, 1),
            (Position::Source, 1, a, 1),
            (a, 1, Position::Source, 0),
            (Position::Sink, 0, a, 1),
            (a, 1, Position::Sink, 2),
        ] {
            let err = space.edge_var(from, from_slot, to, to_slot).unwrap_err();
            assert!(format!("{:#}", err).contains("invalid index"));
        }
    }

    #[test]
    fn test_invalid_vars() {
        let space = VariableSpace::new(2, 2).unwrap();
        assert!(space.var_to_edge(0).is_err());
        assert!(space.var_to_edge(26).is_err());
    }

    #[test]
    fn test_configuration_errors() {
        let err = VariableSpace::new(3, 0).unwrap_err();
        assert!(err.to_string().starts_with("configuration error"));
        assert!(VariableSpace::new(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_empty_alphabet() {
        let space = VariableSpace::new(0, 3).unwrap();
        assert_eq!(1, space.n_edge_vars());
        assert_eq!(
            vec![Edge::new(Position::Source, 0, Position::Sink, 0)],
            space.edges().collect::<Vec<_>>()
        );
    }
}
