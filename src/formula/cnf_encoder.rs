use super::Formula;
use crate::sat::{Literal, SatSolver};

/// Translates formulas into clauses given to a SAT solver.
///
/// The variables of the formulas are kept as they are in the solver.
/// The auxiliary variables introduced by the translation (Tseitin encoding) are allocated after the ones already known by the solver,
/// so that the formula variables are never shadowed.
///
/// ```
/// # use koala::formula::{CnfEncoder, Formula};
/// # use koala::sat::{self, SatSolver};
/// let mut solver = sat::default_solver();
/// let mut encoder = CnfEncoder::new(solver.as_mut(), 2);
/// encoder.assert_formula(&Formula::and(vec![
///     Formula::or(vec![Formula::var(1), Formula::var(2)]),
///     Formula::not(Formula::var(1)),
/// ]));
/// let model = solver.solve().unwrap_model().unwrap();
/// assert_eq!(Some(true), model.value_of(2));
/// ```
pub struct CnfEncoder<'a> {
    solver: &'a mut dyn SatSolver,
    next_var: usize,
    n_aux_vars: usize,
    true_literal: Option<Literal>,
}

impl<'a> CnfEncoder<'a> {
    /// Builds a new encoder feeding the provided solver.
    ///
    /// The variables from `1` to `n_formula_vars` are made known by the solver, even if they appear in no clause.
    pub fn new(solver: &'a mut dyn SatSolver, n_formula_vars: usize) -> Self {
        solver.reserve(n_formula_vars);
        let next_var = usize::max(solver.n_vars(), n_formula_vars) + 1;
        Self {
            solver,
            next_var,
            n_aux_vars: 0,
            true_literal: None,
        }
    }

    /// Adds clauses to the solver so that its models are the ones of the formula (up to the auxiliary variables).
    pub fn assert_formula(&mut self, formula: &Formula) {
        match formula {
            Formula::Const(true) => {}
            Formula::Const(false) => {
                let t = self.true_literal();
                self.solver.add_clause(vec![t.negate()]);
            }
            Formula::Literal(..) => {
                let l = self.literal_of(formula);
                self.solver.add_clause(vec![l]);
            }
            Formula::And(children) => children.iter().for_each(|c| self.assert_formula(c)),
            Formula::Or(children) => {
                let cl = children.iter().map(|c| self.literal_of(c)).collect();
                self.solver.add_clause(cl);
            }
            Formula::Implies(premise, conclusion) => {
                let mut cl = vec![self.literal_of(premise).negate()];
                match conclusion.as_ref() {
                    Formula::Or(children) => children
                        .iter()
                        .for_each(|c| cl.push(self.literal_of(c))),
                    c => cl.push(self.literal_of(c)),
                }
                self.solver.add_clause(cl);
            }
            Formula::Not(negated) => self.assert_negation(negated),
        }
    }

    fn assert_negation(&mut self, negated: &Formula) {
        match negated {
            Formula::Not(f) => self.assert_formula(f),
            Formula::Or(children) => children
                .iter()
                .for_each(|c| self.assert_formula(&Formula::not(c.clone()))),
            Formula::And(children) => {
                let cl = children
                    .iter()
                    .map(|c| self.literal_of(c).negate())
                    .collect();
                self.solver.add_clause(cl);
            }
            Formula::Implies(premise, conclusion) => {
                self.assert_formula(premise);
                self.assert_negation(conclusion);
            }
            f => {
                let l = self.literal_of(f);
                self.solver.add_clause(vec![l.negate()]);
            }
        }
    }

    /// Returns the number of auxiliary variables introduced so far.
    pub fn n_aux_vars(&self) -> usize {
        self.n_aux_vars
    }

    fn fresh_literal(&mut self) -> Literal {
        let l = Literal::from(self.next_var as isize);
        self.next_var += 1;
        self.n_aux_vars += 1;
        l
    }

    fn true_literal(&mut self) -> Literal {
        if let Some(t) = self.true_literal {
            return t;
        }
        let t = self.fresh_literal();
        self.solver.add_clause(vec![t]);
        self.true_literal = Some(t);
        t
    }

    fn literal_of(&mut self, formula: &Formula) -> Literal {
        match formula {
            Formula::Const(true) => self.true_literal(),
            Formula::Const(false) => self.true_literal().negate(),
            Formula::Literal(v, polarity) => {
                let l = Literal::from(*v as isize);
                if *polarity {
                    l
                } else {
                    l.negate()
                }
            }
            Formula::Not(f) => self.literal_of(f).negate(),
            Formula::And(children) => {
                let lits = children
                    .iter()
                    .map(|c| self.literal_of(c))
                    .collect::<Vec<_>>();
                let x = self.fresh_literal();
                lits.iter()
                    .for_each(|l| self.solver.add_clause(vec![x.negate(), *l]));
                let mut cl = lits.iter().map(|l| l.negate()).collect::<Vec<_>>();
                cl.push(x);
                self.solver.add_clause(cl);
                x
            }
            Formula::Or(children) => {
                let lits = children
                    .iter()
                    .map(|c| self.literal_of(c))
                    .collect::<Vec<_>>();
                let x = self.fresh_literal();
                lits.iter()
                    .for_each(|l| self.solver.add_clause(vec![l.negate(), x]));
                let mut cl = lits;
                cl.push(x.negate());
                self.solver.add_clause(cl);
                x
            }
            Formula::Implies(premise, conclusion) => {
                let p = self.literal_of(premise);
                let c = self.literal_of(conclusion);
                let x = self.fresh_literal();
                self.solver.add_clause(vec![x.negate(), p.negate(), c]);
                self.solver.add_clause(vec![p, x]);
                self.solver.add_clause(vec![c.negate(), x]);
                x
            }
        }
    }
}
