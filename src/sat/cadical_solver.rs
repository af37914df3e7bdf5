use super::{
    sat_solver::{SolvingListener, SolvingResult},
    Assignment, Literal, SatSolver,
};
use cadical::Solver as CadicalCSolver;

/// A wrapper around the Cadical SAT solver.
///
/// Variables made known by [`SatSolver::reserve`] but involved in no clause are reported as unassigned in the models.
#[derive(Default)]
pub struct CadicalSolver {
    solver: CadicalCSolver,
    n_clauses: usize,
    reserved: usize,
    listeners: Vec<Box<dyn SolvingListener>>,
}

impl SatSolver for CadicalSolver {
    fn add_clause(&mut self, cl: Vec<Literal>) {
        self.n_clauses += 1;
        self.solver
            .add_clause(cl.into_iter().map(|l| isize::from(l) as i32))
    }

    fn solve(&mut self) -> SolvingResult {
        self.solve_under_assumptions(&[])
    }

    fn solve_under_assumptions(&mut self, assumptions: &[Literal]) -> SolvingResult {
        self.listeners
            .iter()
            .for_each(|l| l.solving_start(self.n_vars(), self.n_clauses));
        let result = match self
            .solver
            .solve_with(assumptions.iter().map(|l| isize::from(*l) as i32))
        {
            Some(true) => {
                let max_variable = self.solver.max_variable();
                let assignment = Assignment::new(
                    (1..=self.n_vars() as i32)
                        .map(|i| {
                            if i <= max_variable {
                                self.solver.value(i)
                            } else {
                                None
                            }
                        })
                        .collect(),
                );
                SolvingResult::Satisfiable(assignment)
            }
            Some(false) => SolvingResult::Unsatisfiable,
            None => SolvingResult::Unknown,
        };
        self.listeners.iter().for_each(|l| l.solving_end(&result));
        result
    }

    fn n_vars(&self) -> usize {
        usize::max(self.solver.max_variable() as usize, self.reserved)
    }

    fn add_listener(&mut self, listener: Box<dyn SolvingListener>) {
        self.listeners.push(listener);
    }

    fn reserve(&mut self, new_max_id: usize) {
        self.reserved = usize::max(self.reserved, new_max_id);
    }
}
