use super::{
    buffered_sat_solver::{BufferedSatSolver, DimacsInstanceRead},
    sat_solver::{SolvingListener, SolvingResult},
    Literal, SatSolver, SatSolverFactory,
};
use anyhow::{Context, Result};
use log::error;
use std::{
    io::{Read, Write},
    process::{Command, Stdio},
};

/// A SAT solver which execution is made by a system command.
///
/// The system command is composed by an executable program, and a potential list of CLI arguments.
///
/// The SAT solver must read the instance from the standard input (if it does not by default, this may be possible with the right CLI arguments).
/// The input and output formats must follow the ones from the SAT competitions.
/// A solver that cannot be run, or which output cannot be read, leads to an [`SolvingResult::Unknown`] result.
pub struct ExternalSatSolver {
    buffered_sat_solver: BufferedSatSolver,
}

impl ExternalSatSolver {
    /// Builds a new external SAT solver.
    ///
    /// The `program` argument is the path to the software to execute.
    /// The `options` parameter is the CLI options to provide to the software under execution.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use koala::sat::{ExternalSatSolver, Literal, SatSolver};
    /// let mut solver = ExternalSatSolver::new(
    ///     "/home/me/my_solver".to_string(),
    ///     vec!["-i".to_string(), "/dev/stdin".to_string()],
    /// );
    /// solver.add_clause(vec![Literal::from(-1), Literal::from(-2)]);
    /// solver.add_clause(vec![Literal::from(-1), Literal::from(2)]);
    /// let model = solver.solve().unwrap_model().unwrap();
    /// assert_eq!(Some(false), model.value_of(1));
    /// ```
    pub fn new(program: String, options: Vec<String>) -> Self {
        Self {
            buffered_sat_solver: BufferedSatSolver::new(Box::new(move |r| {
                match exec_solver(r, &program, &options) {
                    Ok(output) => output,
                    Err(e) => {
                        error!("{:#}", e);
                        Box::new(&[] as &[u8])
                    }
                }
            })),
        }
    }
}

impl SatSolver for ExternalSatSolver {
    fn add_clause(&mut self, cl: Vec<Literal>) {
        self.buffered_sat_solver.add_clause(cl)
    }

    fn solve(&mut self) -> SolvingResult {
        self.buffered_sat_solver.solve()
    }

    fn solve_under_assumptions(&mut self, assumptions: &[Literal]) -> SolvingResult {
        self.buffered_sat_solver
            .solve_under_assumptions(assumptions)
    }

    fn n_vars(&self) -> usize {
        self.buffered_sat_solver.n_vars()
    }

    fn add_listener(&mut self, listener: Box<dyn SolvingListener>) {
        self.buffered_sat_solver.add_listener(listener);
    }

    fn reserve(&mut self, new_max_id: usize) {
        self.buffered_sat_solver.reserve(new_max_id)
    }
}

fn exec_solver(
    mut reader: DimacsInstanceRead,
    program: &str,
    options: &[String],
) -> Result<Box<dyn Read>> {
    let mut child = Command::new(program)
        .args(options)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .with_context(|| format!(r#"while spawning the external SAT solver "{}""#, program))?;
    let mut stdin = child
        .stdin
        .take()
        .context("cannot open the standard input of the external SAT solver")?;
    std::thread::spawn(move || -> std::io::Result<()> {
        std::io::copy(&mut reader, &mut stdin)?;
        stdin.flush()
    });
    let mut stdout = child
        .stdout
        .take()
        .context("cannot open the standard output of the external SAT solver")?;
    let mut output = Vec::new();
    stdout
        .read_to_end(&mut output)
        .context("while reading the output of the external SAT solver")?;
    child
        .wait()
        .context("while waiting for the external SAT solver to terminate")?;
    Ok(Box::new(std::io::Cursor::new(output)))
}

/// A factory for external SAT solvers.
///
/// Listeners to be registered to each new solver can be provided by factories of listeners.
pub struct ExternalSatSolverFactory {
    program: String,
    options: Vec<String>,
    listener_factories: Vec<Box<dyn Fn() -> Box<dyn SolvingListener>>>,
}

impl ExternalSatSolverFactory {
    /// Builds a new factory given the program to execute and its options.
    ///
    /// See [`ExternalSatSolver::new`] for more information.
    pub fn new(program: String, options: Vec<String>) -> Self {
        Self {
            program,
            options,
            listener_factories: vec![],
        }
    }

    /// Adds a factory of listeners; a new listener is registered to each solver built by this factory.
    pub fn add_solver_listener(&mut self, listener_factory: Box<dyn Fn() -> Box<dyn SolvingListener>>) {
        self.listener_factories.push(listener_factory)
    }
}

impl SatSolverFactory for ExternalSatSolverFactory {
    fn new_solver(&self) -> Box<dyn SatSolver> {
        let mut solver = ExternalSatSolver::new(self.program.clone(), self.options.clone());
        self.listener_factories
            .iter()
            .for_each(|f| solver.add_listener(f()));
        Box::new(solver)
    }
}
