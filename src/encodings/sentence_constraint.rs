use super::{
    edge_formulas::{
        any_slot_pair, any_slot_to_sink, canonical_pair, canonical_source_edge, continuity,
        sink_edge,
    },
    Predecessor, Successor, VariableSpace, CANONICAL_SLOT,
};
use crate::formula::Formula;
use anyhow::Result;

/// Builds the constraint stating the automaton accepts a single sentence.
///
/// The sentence is given by the ids of its symbols.
/// This constraint is negated to reject the negative samples.
/// Conjoining the constraints of positive samples gives a formula equivalent to the [`GlobalConstraintBuilder`](super::GlobalConstraintBuilder) one.
///
/// ```
/// # use koala::encodings::{SentenceConstraintBuilder, VariableSpace};
/// let space = VariableSpace::new(2, 2).unwrap();
/// assert!(SentenceConstraintBuilder::new(&space).build(&[]).unwrap().is_true());
/// assert!(!SentenceConstraintBuilder::new(&space).build(&[1, 2]).unwrap().is_true());
/// ```
pub struct SentenceConstraintBuilder<'a> {
    space: &'a VariableSpace,
}

impl<'a> SentenceConstraintBuilder<'a> {
    /// Builds a new constraint builder.
    pub fn new(space: &'a VariableSpace) -> Self {
        Self { space }
    }

    /// Builds the constraint for a sentence.
    pub fn build(&self, sentence: &[usize]) -> Result<Formula> {
        Ok(Formula::and(vec![
            self.build_existence(sentence)?,
            self.build_continuity(sentence)?,
        ]))
    }

    /// Builds the part of the constraint requiring the existence of the edges of the sentence.
    ///
    /// This part is the constant `true` for the empty sentence.
    pub fn build_existence(&self, s: &[usize]) -> Result<Formula> {
        let space = self.space;
        let n = s.len();
        if n == 0 {
            return Ok(Formula::TRUE);
        }
        let mut constraints = Vec::with_capacity(n + 1);
        constraints.push(canonical_source_edge(space, s[0])?);
        if n > 1 {
            constraints.push(canonical_pair(space, s[0], s[1])?);
        }
        if n > 2 {
            for w in s[1..].windows(2) {
                constraints.push(any_slot_pair(space, w[0], w[1])?);
            }
        }
        constraints.push(if n == 1 {
            sink_edge(space, s[0], CANONICAL_SLOT)?
        } else {
            any_slot_to_sink(space, s[n - 1])?
        });
        Ok(Formula::and(constraints))
    }

    /// Builds the part of the constraint linking the edges of the sentence.
    ///
    /// This part is the constant `true` if there is a single slot per symbol or if the sentence has less than two symbols.
    pub fn build_continuity(&self, s: &[usize]) -> Result<Formula> {
        let space = self.space;
        let n = s.len();
        if space.n_slots() <= 1 || n <= 1 {
            return Ok(Formula::TRUE);
        }
        let mut constraints = Vec::with_capacity(n);
        if n > 2 {
            constraints.push(continuity(
                space,
                Predecessor::Canonical(s[0]),
                s[1],
                Successor::Symbol(s[2]),
            )?);
            for w in s[1..].windows(3) {
                constraints.push(continuity(
                    space,
                    Predecessor::AnySlot(w[0]),
                    w[1],
                    Successor::Symbol(w[2]),
                )?);
            }
        }
        let last_pred = if n == 2 {
            Predecessor::Canonical(s[0])
        } else {
            Predecessor::AnySlot(s[n - 2])
        };
        constraints.push(continuity(space, last_pred, s[n - 1], Successor::Sink)?);
        Ok(Formula::and(constraints))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::koa::Position;

    #[test]
    fn test_empty_sentence() {
        let space = VariableSpace::new(3, 2).unwrap();
        let builder = SentenceConstraintBuilder::new(&space);
        assert_eq!(Formula::TRUE, builder.build_existence(&[]).unwrap());
        assert_eq!(Formula::TRUE, builder.build(&[]).unwrap());
    }

    #[test]
    fn test_single_symbol() {
        let space = VariableSpace::new(2, 2).unwrap();
        let src_b = space
            .edge_var(Position::Source, 0, Position::Symbol(2), 1)
            .unwrap();
        let b_snk = space
            .edge_var(Position::Symbol(2), 1, Position::Sink, 0)
            .unwrap();
        assert_eq!(
            Formula::and(vec![Formula::var(src_b), Formula::var(b_snk)]),
            SentenceConstraintBuilder::new(&space).build(&[2]).unwrap()
        );
    }

    #[test]
    fn test_single_slot_has_no_continuity() {
        let space = VariableSpace::new(2, 1).unwrap();
        let builder = SentenceConstraintBuilder::new(&space);
        assert!(builder.build_continuity(&[1, 2, 1]).unwrap().is_true());
        let formula = builder.build(&[1, 2, 1]).unwrap();
        let slot = |p| match p {
            Position::Symbol(_) => 1,
            _ => 0,
        };
        let e = |from, to| space.edge_var(from, slot(from), to, slot(to)).unwrap();
        let (a, b) = (Position::Symbol(1), Position::Symbol(2));
        let run = [e(Position::Source, a), e(a, b), e(b, a), e(a, Position::Sink)];
        assert!(formula.eval(&|v| run.contains(&v)));
        assert!(!formula.eval(&|v| run[..3].contains(&v)));
    }

    #[test]
    fn test_continuity_of_two_symbols() {
        let space = VariableSpace::new(2, 2).unwrap();
        let builder = SentenceConstraintBuilder::new(&space);
        let (a, b) = (Position::Symbol(1), Position::Symbol(2));
        let a1_b2 = space.edge_var(a, 1, b, 2).unwrap();
        let a2_b1 = space.edge_var(a, 2, b, 1).unwrap();
        let b1_snk = space.edge_var(b, 1, Position::Sink, 0).unwrap();
        let b2_snk = space.edge_var(b, 2, Position::Sink, 0).unwrap();
        let continuity = builder.build_continuity(&[1, 2]).unwrap();
        assert!(continuity.eval(&|v| v == a1_b2 || v == b2_snk));
        assert!(!continuity.eval(&|v| v == a1_b2 || v == b1_snk));
        assert!(continuity.eval(&|v| v == a2_b1));
    }
}
