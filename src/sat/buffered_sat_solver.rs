use super::{
    sat_solver::{SolvingListener, SolvingResult},
    Assignment, Literal, SatSolver,
};
use anyhow::{anyhow, Context, Result};
use log::error;
use std::io::{BufRead, BufReader, Cursor, Read};

/// The type of the functions used by [`BufferedSatSolver`] to solve a DIMACS instance.
///
/// The function takes the instance as a reader and returns a reader to the solver output,
/// which must follow the format of the SAT competitions.
pub type SolvingFn = dyn Fn(DimacsInstanceRead) -> Box<dyn Read>;

/// A reader to a DIMACS instance, as given to the [`SolvingFn`] of a [`BufferedSatSolver`].
///
/// The assumptions are given as unit clauses at the end of the instance.
pub struct DimacsInstanceRead {
    preamble: Cursor<String>,
    clauses: Cursor<String>,
    assumptions: Cursor<String>,
}

impl Read for DimacsInstanceRead {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        for part in [
            &mut self.preamble,
            &mut self.clauses,
            &mut self.assumptions,
        ] {
            let r = part.read(buf)?;
            if r > 0 {
                return Ok(r);
            }
        }
        Ok(0)
    }
}

const DEFAULT_BUFFER_CAP: usize = 1 << 20;

/// A SAT solver that stores the clauses in DIMACS format and delegates the solving to a function.
///
/// This is the base of the [`ExternalSatSolver`](super::ExternalSatSolver),
/// and it is also used to export the formulas without solving them.
pub struct BufferedSatSolver {
    n_vars: usize,
    n_clauses: usize,
    clauses: String,
    solving_fn: Box<SolvingFn>,
    listeners: Vec<Box<dyn SolvingListener>>,
}

impl BufferedSatSolver {
    /// Builds a new buffered solver given the function used to solve the instances.
    pub fn new(solving_fn: Box<SolvingFn>) -> Self {
        Self {
            n_vars: 0,
            n_clauses: 0,
            clauses: String::with_capacity(DEFAULT_BUFFER_CAP),
            solving_fn,
            listeners: Vec::new(),
        }
    }

    fn instance(&self, assumptions: &[Literal]) -> DimacsInstanceRead {
        let preamble = format!(
            "p cnf {} {}\n",
            self.n_vars,
            self.n_clauses + assumptions.len()
        );
        let assumptions = assumptions.iter().fold(String::new(), |mut acc, a| {
            acc.push_str(&format!("{} 0\n", a));
            acc
        });
        DimacsInstanceRead {
            preamble: Cursor::new(preamble),
            clauses: Cursor::new(self.clauses.clone()),
            assumptions: Cursor::new(assumptions),
        }
    }
}

impl SatSolver for BufferedSatSolver {
    fn add_clause(&mut self, cl: Vec<Literal>) {
        cl.iter().for_each(|l| {
            self.n_vars = usize::max(self.n_vars, usize::from(l.var()));
            self.clauses.push_str(&format!("{} ", l));
        });
        self.clauses.push_str("0\n");
        self.n_clauses += 1;
    }

    fn solve(&mut self) -> SolvingResult {
        self.solve_under_assumptions(&[])
    }

    fn solve_under_assumptions(&mut self, assumptions: &[Literal]) -> SolvingResult {
        self.listeners
            .iter()
            .for_each(|l| l.solving_start(self.n_vars, self.n_clauses));
        let solver_output = (self.solving_fn)(self.instance(assumptions));
        let solving_result = match read_solver_output(solver_output, self.n_vars) {
            Ok(r) => r,
            Err(e) => {
                error!("{:#}", e);
                SolvingResult::Unknown
            }
        };
        self.listeners
            .iter()
            .for_each(|l| l.solving_end(&solving_result));
        solving_result
    }

    fn n_vars(&self) -> usize {
        self.n_vars
    }

    fn add_listener(&mut self, listener: Box<dyn SolvingListener>) {
        self.listeners.push(listener);
    }

    fn reserve(&mut self, new_max_id: usize) {
        self.n_vars = usize::max(self.n_vars, new_max_id);
    }
}

fn read_solver_output(output: Box<dyn Read>, n_vars: usize) -> Result<SolvingResult> {
    let context = "while reading the output of the SAT solver";
    let mut status = None;
    let mut assignment = vec![None; n_vars];
    let mut assignment_line_seen = false;
    let mut assignment_line_end = false;
    for line in BufReader::new(output).lines() {
        let line = line.context(context)?;
        if line == "s SATISFIABLE" || line == "s UNSATISFIABLE" {
            if status.is_some() {
                return Err(anyhow!("multiple status lines")).context(context);
            }
            status = Some(line == "s SATISFIABLE");
        } else if let Some(values) = line.strip_prefix("v ") {
            assignment_line_seen = true;
            for w in values.split_ascii_whitespace() {
                let n = w
                    .parse::<isize>()
                    .with_context(|| format!(r#""{}" is not a literal"#, w))
                    .context(context)?;
                if n == 0 {
                    if assignment_line_end {
                        return Err(anyhow!("multiple zeroes on value lines")).context(context);
                    }
                    assignment_line_end = true;
                    continue;
                }
                let v = n.unsigned_abs() - 1;
                if v >= n_vars {
                    return Err(anyhow!("variable {} is out of bounds", v + 1)).context(context);
                }
                assignment[v] = Some(n > 0);
            }
        } else if !(line.is_empty() || line == "c" || line == "v" || line.starts_with("c ")) {
            return Err(anyhow!(r#"unexpected line "{}""#, line)).context(context);
        }
    }
    Ok(match status {
        Some(true) if assignment_line_seen => {
            SolvingResult::Satisfiable(Assignment::new(assignment))
        }
        Some(false) => SolvingResult::Unsatisfiable,
        _ => SolvingResult::Unknown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause;

    fn input_check_solving_fn(expected_input: &'static str) -> Box<SolvingFn> {
        Box::new(move |mut r| {
            let mut buffer = String::new();
            r.read_to_string(&mut buffer).unwrap();
            assert_eq!(expected_input, buffer);
            Box::new(&[] as &[u8])
        })
    }

    fn fake_output_solving_fn(output: &'static str) -> Box<SolvingFn> {
        Box::new(|_| Box::new(output.as_bytes()))
    }

    #[test]
    fn test_input_with_assumptions() {
        let expected = "p cnf 2 3\n1 2 0\n-1 -2 0\n1 0\n";
        let mut s = BufferedSatSolver::new(input_check_solving_fn(expected));
        s.add_clause(clause![1, 2]);
        s.add_clause(clause![-1, -2]);
        s.solve_under_assumptions(&[1.into()]);
    }

    #[test]
    fn test_input_with_reserved_vars() {
        let expected = "p cnf 4 1\n-2 0\n";
        let mut s = BufferedSatSolver::new(input_check_solving_fn(expected));
        s.reserve(4);
        s.add_clause(clause![-2]);
        assert_eq!(4, s.n_vars());
        s.solve();
    }

    #[test]
    fn test_output_sat() {
        let solver_output = "c a comment\ns SATISFIABLE\nv\nv -1\nv 2 0\n";
        let mut s = BufferedSatSolver::new(fake_output_solving_fn(solver_output));
        s.add_clause(clause![-1, 2]);
        let assignment = s.solve().unwrap_model().unwrap();
        assert_eq!(Some(false), assignment.value_of(1));
        assert_eq!(Some(true), assignment.value_of(2));
    }

    #[test]
    fn test_output_unsat() {
        let solver_output = "c\ns UNSATISFIABLE\n";
        let mut s = BufferedSatSolver::new(fake_output_solving_fn(solver_output));
        s.add_clause(clause![1]);
        s.add_clause(clause![-1]);
        assert_eq!(SolvingResult::Unsatisfiable, s.solve());
    }

    #[test]
    fn test_output_incomplete() {
        for output in ["", "v 1 2 0\n", "s SATISFIABLE\n"] {
            let mut s = BufferedSatSolver::new(fake_output_solving_fn(output));
            s.add_clause(clause![1, 2]);
            assert_eq!(SolvingResult::Unknown, s.solve());
        }
    }

    #[test]
    fn test_output_malformed() {
        for output in [
            "s SATISFIABLE\nv 1 2 3 0\n",
            "s SATISFIABLE\nv 1 foo 0\n",
            "s SATISFIABLE\ns SATISFIABLE\nv 1 2 0\n",
            "s SATISFIABLE\nv 1 0\nv 2 0\n",
            "foo\ns SATISFIABLE\nv 1 2 0\n",
        ] {
            let mut s = BufferedSatSolver::new(fake_output_solving_fn(output));
            s.add_clause(clause![1, 2]);
            assert_eq!(SolvingResult::Unknown, s.solve());
        }
    }
}
