use super::{
    edge_formulas::{canonical_source_edge, edge},
    VariableSpace, SENTINEL_SLOT,
};
use crate::{formula::Formula, koa::Position};
use anyhow::Result;
use log::debug;
use permutator::CartesianProduct;

/// Builds the constraints making the automaton deterministic and canonical.
///
/// For each symbol `c`, the source may only enter the canonical slot of `c`:
/// either `src -> (c, 1)` holds or no edge goes from the source to a slot of `c`.
///
/// For each pair of symbols `(c1, c2)` and each slot `k1` of `c1`,
/// at most one edge goes from `(c1, k1)` to a slot of `c2`.
///
/// When there is a single slot per symbol, the automaton is deterministic by construction and the constraint is the constant `true`.
pub struct DeterminismConstraintBuilder<'a> {
    space: &'a VariableSpace,
}

impl<'a> DeterminismConstraintBuilder<'a> {
    /// Builds a new constraint builder for the given variable space.
    pub fn new(space: &'a VariableSpace) -> Self {
        Self { space }
    }

    /// Builds the determinism constraint.
    pub fn build(&self) -> Result<Formula> {
        let n_slots = self.space.n_slots();
        if n_slots == 1 || self.space.alphabet_size() == 0 {
            return Ok(Formula::TRUE);
        }
        let ids = (1..=self.space.alphabet_size()).collect::<Vec<usize>>();
        let slots = self.space.slots().collect::<Vec<usize>>();
        let mut constraints = Vec::with_capacity(ids.len() * (1 + ids.len() * n_slots));
        for c in ids.iter() {
            constraints.push(self.canonical_source_constraint(*c)?);
        }
        let domains = vec![ids.as_slice(), ids.as_slice(), slots.as_slice()];
        for t in domains.cart_prod() {
            constraints.push(self.at_most_one_target_slot(*t[0], *t[1], *t[2])?);
        }
        let formula = Formula::and(constraints);
        debug!("determinism constraint has size {}", formula.size());
        Ok(formula)
    }

    fn canonical_source_constraint(&self, c: usize) -> Result<Formula> {
        let no_source_edge = self
            .space
            .slots()
            .map(|s| {
                edge(
                    self.space,
                    Position::Source,
                    SENTINEL_SLOT,
                    Position::Symbol(c),
                    s,
                )
                .map(Formula::not)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Formula::or(vec![
            canonical_source_edge(self.space, c)?,
            Formula::and(no_source_edge),
        ]))
    }

    fn at_most_one_target_slot(&self, c1: usize, c2: usize, k1: usize) -> Result<Formula> {
        let edges = self
            .space
            .slots()
            .map(|m| edge(self.space, Position::Symbol(c1), k1, Position::Symbol(c2), m))
            .collect::<Result<Vec<_>>>()?;
        let mut cases = Vec::with_capacity(edges.len() + 1);
        for (i, e) in edges.iter().enumerate() {
            let mut case = Vec::with_capacity(edges.len());
            case.push(e.clone());
            edges
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .for_each(|(_, other)| case.push(Formula::not(other.clone())));
            cases.push(Formula::and(case));
        }
        cases.push(Formula::and(edges.into_iter().map(Formula::not)));
        Ok(Formula::or(cases))
    }
}
