use super::cadical_solver::CadicalSolver;
use std::{
    fmt::Display,
    num::{NonZeroIsize, NonZeroUsize},
};

/// A variable in a SAT solver.
///
/// A variable is represented by a non-null positive integer.
/// Edge variables of the encodings keep their index as variable; auxiliary variables come after them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(NonZeroUsize);

macro_rules! impl_var_from {
    ($t: ty) => {
        impl From<$t> for Variable {
            fn from(v: $t) -> Self {
                Self(NonZeroUsize::try_from(v as usize).unwrap())
            }
        }
    };
}
impl_var_from!(usize);
impl_var_from!(u64);
impl_var_from!(u32);

macro_rules! impl_var_from_neg {
    ($t: ty) => {
        impl From<$t> for Variable {
            fn from(v: $t) -> Self {
                if v < 0 {
                    panic!("cannot build a variable from a negative integer")
                }
                Self(NonZeroUsize::try_from(v as usize).unwrap())
            }
        }
    };
}
impl_var_from_neg!(isize);
impl_var_from_neg!(i64);
impl_var_from_neg!(i32);

impl From<Variable> for usize {
    fn from(v: Variable) -> Self {
        v.0.into()
    }
}

/// A literal in a SAT solver.
///
/// A literal is represented by a non-null integer, negative integers standing for negative literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal(NonZeroIsize);

impl Literal {
    /// Builds the literal of a variable with the given polarity.
    pub fn new(var: Variable, polarity: bool) -> Self {
        let v = usize::from(var) as isize;
        Self::from(if polarity { v } else { -v })
    }

    /// Returns the opposite literal.
    pub fn negate(self) -> Self {
        Self::from(-self.0.get())
    }

    /// Returns the variable of this literal.
    pub fn var(&self) -> Variable {
        Variable(self.0.unsigned_abs())
    }
}

macro_rules! impl_lit_from {
    ($t: ty) => {
        impl From<$t> for Literal {
            fn from(l: $t) -> Self {
                Self(NonZeroIsize::try_from(l as isize).unwrap())
            }
        }
    };
}
impl_lit_from!(isize);
impl_lit_from!(i64);
impl_lit_from!(i32);

impl From<Literal> for isize {
    fn from(l: Literal) -> Self {
        l.0.into()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Builds a clause from a list of integers.
#[macro_export]
macro_rules! clause {
    () => (
        vec![] as Vec<$crate::sat::Literal>
    );
    ($($x:expr),+ $(,)?) => (
        [$($x),+].into_iter().map($crate::sat::Literal::from).collect::<Vec<$crate::sat::Literal>>()
    );
}

/// An assignment of a set of variables.
///
/// Inside the set of variables involved in the assignment, some may be unassigned.
/// This is the reason why accessors to assigned value returns an [Option<bool>].
#[derive(Debug, PartialEq, Eq)]
pub struct Assignment(Vec<Option<bool>>);

impl Assignment {
    pub(crate) fn new(assignment: Vec<Option<bool>>) -> Self {
        Self(assignment)
    }

    /// Returns the value potentially assigned to the variable.
    ///
    /// In case the variable is not assigned (or is out of the range of the assignment), [Option::None] is returned.
    /// Else, [Option::Some] is returned and contains the assigned value.
    pub fn value_of<T>(&self, v: T) -> Option<bool>
    where
        T: Into<Variable>,
    {
        self.0.get(usize::from(v.into()) - 1).copied().flatten()
    }

    /// Returns the number of variables covered by this assignment.
    pub fn n_vars(&self) -> usize {
        self.0.len()
    }

    /// Returns an iterator over the variables and their values.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<bool>)> + '_ {
        self.0.iter().enumerate().map(|(i, v)| (i + 1, *v))
    }
}

/// The result of a call to a SAT solver.
#[derive(Debug, PartialEq, Eq)]
pub enum SolvingResult {
    /// The problem is satisfiable; a model is given.
    Satisfiable(Assignment),
    /// The problem is unsatisfiable.
    Unsatisfiable,
    /// The solver was not able to decide the problem.
    Unknown,
}

impl SolvingResult {
    /// Returns the underlying model if it exists, or [Option::None].
    ///
    /// # Panics
    ///
    /// If the solving result is set [SolvingResult::Unknown], this function panics.
    pub fn unwrap_model(self) -> Option<Assignment> {
        match self {
            SolvingResult::Satisfiable(assignment) => Some(assignment),
            SolvingResult::Unsatisfiable => None,
            SolvingResult::Unknown => {
                panic!(r#"cannot unwrap solving result when the solver returned "Unknown""#)
            }
        }
    }
}

/// A trait for objects listening to the solving steps.
pub trait SolvingListener {
    /// Called when the solving starts, with the size of the instance.
    fn solving_start(&self, n_vars: usize, n_clauses: usize);

    /// Called when the solving ends.
    fn solving_end(&self, result: &SolvingResult);
}

/// A trait for SAT solvers.
pub trait SatSolver {
    /// Adds a clause to this solver.
    fn add_clause(&mut self, cl: Vec<Literal>);

    /// Solves the problem formed by the clauses added so far.
    fn solve(&mut self) -> SolvingResult;

    /// Solves the problem formed by the clauses added so far and the provided assumptions.
    fn solve_under_assumptions(&mut self, assumptions: &[Literal]) -> SolvingResult;

    /// Returns the highest variable known by this solver.
    fn n_vars(&self) -> usize;

    /// Adds a listener to the solving steps.
    fn add_listener(&mut self, listener: Box<dyn SolvingListener>);

    /// Makes the variables up to `new_max_id` known by the solver, even if they appear in no clause.
    ///
    /// Such variables are part of the models, in which they may be unassigned.
    fn reserve(&mut self, new_max_id: usize);
}

/// A trait for objects building new SAT solvers.
pub trait SatSolverFactory {
    /// Returns a new, empty, SAT solver.
    fn new_solver(&self) -> Box<dyn SatSolver>;
}

/// The factory for the default SAT solver.
#[derive(Default)]
pub struct DefaultSatSolverFactory;

impl SatSolverFactory for DefaultSatSolverFactory {
    fn new_solver(&self) -> Box<dyn SatSolver> {
        default_solver()
    }
}

/// The default SAT solver (Cadical).
pub fn default_solver() -> Box<dyn SatSolver> {
    Box::<CadicalSolver>::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause;

    #[test]
    fn test_var_from_pos() {
        let v = Variable::from(1);
        assert_eq!(1, usize::from(v))
    }

    #[test]
    #[allow(unused_must_use)]
    #[should_panic]
    fn test_var_from_null() {
        Variable::from(0);
    } // kcov-ignore

    #[test]
    #[allow(unused_must_use)]
    #[should_panic]
    fn test_var_from_neg() {
        Variable::from(-1);
    } // kcov-ignore

    #[test]
    fn test_lit_new() {
        assert_eq!(Literal::from(3), Literal::new(Variable::from(3), true));
        assert_eq!(Literal::from(-3), Literal::new(Variable::from(3), false));
    }

    #[test]
    fn test_negate_lit() {
        assert_eq!(Literal::from(-1), Literal::from(1).negate());
        assert_eq!(Literal::from(1), Literal::from(-1).negate());
        assert_eq!(Variable::from(1), Literal::from(-1).var());
    }

    #[test]
    fn test_assignment_value_of() {
        let assignment = Assignment::new(vec![Some(true), None, Some(false)]);
        assert_eq!(Some(true), assignment.value_of(1));
        assert_eq!(None, assignment.value_of(2));
        assert_eq!(Some(false), assignment.value_of(3));
        assert_eq!(None, assignment.value_of(4));
        assert_eq!(3, assignment.n_vars());
        assert_eq!(
            vec![(1, Some(true)), (2, None), (3, Some(false))],
            assignment.iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_solving_result_unwrap_model_none() {
        assert_eq!(None, SolvingResult::Unsatisfiable.unwrap_model());
    }

    #[test]
    #[should_panic]
    fn test_solving_result_unwrap_model_unknown() {
        SolvingResult::Unknown.unwrap_model();
    } // kcov-ignore

    #[test]
    fn test_default_factory() {
        let mut solver = DefaultSatSolverFactory.new_solver();
        solver.add_clause(clause![1, 2]);
        solver.add_clause(clause![-1]);
        let model = solver.solve().unwrap_model().unwrap();
        assert_eq!(Some(true), model.value_of(2));
    }
}
