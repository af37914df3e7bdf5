use super::{
    edge_formulas::{
        any_slot_pair, any_slot_to_sink, canonical_pair, canonical_source_edge, continuity,
    },
    OccurrenceTables, Predecessor, Successor, VariableSpace,
};
use crate::formula::Formula;
use anyhow::Result;
use log::debug;

/// Builds the constraint stating the automaton accepts all the positive samples aggregated in some occurrence tables.
///
/// The constraint is made of two parts.
/// The first one requires the existence of the edges observed in the samples:
/// the canonical source edges of the first symbols,
/// an edge from the canonical slot of a first symbol to some slot of the second symbol,
/// an edge between some slots of the other consecutive symbols,
/// and an edge from some slot of each last symbol to the sink.
///
/// The second part links the edges: for each observed triple of consecutive symbols `(c1, c2, c3)` and each slot `k2` of `c2`,
/// entering `(c2, k2)` from `c1` implies leaving `(c2, k2)` to `c3`.
/// The same holds for the last symbols of the sentences, which must then be linked to the sink.
/// This second part is the constant `true` when there is a single slot per symbol.
///
/// The formula is built once for all the samples; patterns observed many times do not increase its size.
pub struct GlobalConstraintBuilder<'a> {
    space: &'a VariableSpace,
    tables: &'a OccurrenceTables,
}

impl<'a> GlobalConstraintBuilder<'a> {
    /// Builds a new constraint builder.
    pub fn new(space: &'a VariableSpace, tables: &'a OccurrenceTables) -> Self {
        Self { space, tables }
    }

    /// Builds the constraint for the samples aggregated so far.
    pub fn build(&self) -> Result<Formula> {
        let formula = Formula::and(vec![self.build_existence()?, self.build_continuity()?]);
        debug!("global constraint has size {}", formula.size());
        Ok(formula)
    }

    /// Builds the part of the constraint requiring the existence of the observed edges.
    pub fn build_existence(&self) -> Result<Formula> {
        let space = self.space;
        let mut constraints = Vec::new();
        for c in self.tables.source_to_first() {
            constraints.push(canonical_source_edge(space, c)?);
        }
        for (c1, c2) in self.tables.first_to_second() {
            constraints.push(canonical_pair(space, c1, c2)?);
        }
        for (c1, c2) in self.tables.interior() {
            constraints.push(any_slot_pair(space, c1, c2)?);
        }
        for c in self.tables.last_to_sink() {
            constraints.push(any_slot_to_sink(space, c)?);
        }
        Ok(Formula::and(constraints))
    }

    /// Builds the part of the constraint linking the observed edges.
    pub fn build_continuity(&self) -> Result<Formula> {
        let space = self.space;
        if space.n_slots() <= 1 {
            return Ok(Formula::TRUE);
        }
        let mut constraints = Vec::new();
        for (c1, c2, c3) in self.tables.first_triples() {
            constraints.push(continuity(
                space,
                Predecessor::Canonical(c1),
                c2,
                Successor::Symbol(c3),
            )?);
        }
        for (c1, c2, c3) in self.tables.interior_triples() {
            constraints.push(continuity(
                space,
                Predecessor::AnySlot(c1),
                c2,
                Successor::Symbol(c3),
            )?);
        }
        for (pred, c) in self.tables.pairs_before_sink() {
            constraints.push(continuity(space, pred, c, Successor::Sink)?);
        }
        Ok(Formula::and(constraints))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::koa::Position;

    #[test]
    fn test_no_sample_is_true() {
        let space = VariableSpace::new(2, 2).unwrap();
        let tables = OccurrenceTables::default();
        assert!(GlobalConstraintBuilder::new(&space, &tables)
            .build()
            .unwrap()
            .is_true());
    }

    #[test]
    fn test_single_slot_has_no_continuity() {
        let space = VariableSpace::new(2, 1).unwrap();
        let mut tables = OccurrenceTables::default();
        tables.add_sentence(&[1, 2, 1, 2]);
        let builder = GlobalConstraintBuilder::new(&space, &tables);
        assert!(builder.build_continuity().unwrap().is_true());
        assert_eq!(
            builder.build_existence().unwrap(),
            builder.build().unwrap()
        );
    }

    #[test]
    fn test_single_symbol_sentence() {
        let space = VariableSpace::new(1, 1).unwrap();
        let mut tables = OccurrenceTables::default();
        tables.add_sentence(&[1]);
        let src_a = space
            .edge_var(Position::Source, 0, Position::Symbol(1), 1)
            .unwrap();
        let a_snk = space
            .edge_var(Position::Symbol(1), 1, Position::Sink, 0)
            .unwrap();
        assert_eq!(
            Formula::and(vec![Formula::var(src_a), Formula::var(a_snk)]),
            GlobalConstraintBuilder::new(&space, &tables).build().unwrap()
        );
    }

    #[test]
    fn test_single_symbol_sentence_forces_canonical_sink_edge() {
        let space = VariableSpace::new(1, 2).unwrap();
        let mut tables = OccurrenceTables::default();
        tables.add_sentence(&[1]);
        let formula = GlobalConstraintBuilder::new(&space, &tables).build().unwrap();
        let src_a1 = space
            .edge_var(Position::Source, 0, Position::Symbol(1), 1)
            .unwrap();
        let a1_snk = space
            .edge_var(Position::Symbol(1), 1, Position::Sink, 0)
            .unwrap();
        let a2_snk = space
            .edge_var(Position::Symbol(1), 2, Position::Sink, 0)
            .unwrap();
        assert!(!formula.eval(&|v| v == src_a1 || v == a2_snk));
        assert!(formula.eval(&|v| v == src_a1 || v == a1_snk));
    }

    #[test]
    fn test_aggregating_twice_is_idempotent() {
        let space = VariableSpace::new(2, 2).unwrap();
        let mut tables = OccurrenceTables::default();
        tables.add_sentence(&[1, 2, 2, 1]);
        let once = GlobalConstraintBuilder::new(&space, &tables).build().unwrap();
        tables.add_sentence(&[1, 2, 2, 1]);
        let twice = GlobalConstraintBuilder::new(&space, &tables).build().unwrap();
        assert_eq!(once, twice);
    }
}
