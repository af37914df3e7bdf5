use super::specs::AutomatonIdentifier;
use crate::{
    encodings::{KoaEncoder, VariableSpace},
    formula::{CnfEncoder, Formula},
    koa::{KoaAutomaton, LabelType, SampleSet},
    sat::{DefaultSatSolverFactory, SatSolver, SatSolverFactory, SolvingResult},
};
use anyhow::{anyhow, Result};
use log::{info, warn};

/// A SAT-based solver for the k-OA identification problem.
pub struct KoaIdentificationSolver {
    solver_factory: Box<dyn SatSolverFactory>,
}

impl Default for KoaIdentificationSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl KoaIdentificationSolver {
    /// Builds a new SAT based identification solver.
    ///
    /// The underlying SAT solver is one returned by [default_solver](crate::sat::default_solver).
    pub fn new() -> Self {
        Self::new_with_sat_solver_factory(Box::new(DefaultSatSolverFactory))
    }

    /// Builds a new SAT based identification solver.
    ///
    /// The SAT solver to use in given through the solver factory.
    pub fn new_with_sat_solver_factory(solver_factory: Box<dyn SatSolverFactory>) -> Self {
        Self { solver_factory }
    }
}

/// Translates an identification formula into the clauses of a SAT solver.
///
/// All the edge variables of the space are made known by the solver, so that they appear in the models.
pub fn encode(formula: &Formula, space: &VariableSpace, solver: &mut dyn SatSolver) {
    let mut encoder = CnfEncoder::new(solver, space.n_edge_vars());
    encoder.assert_formula(formula);
    info!(
        "formula translated with {} edge variables and {} auxiliary variables",
        space.n_edge_vars(),
        encoder.n_aux_vars()
    );
}

impl<T> AutomatonIdentifier<T> for KoaIdentificationSolver
where
    T: LabelType,
{
    fn identify<'a>(
        &mut self,
        encoder: &'a KoaEncoder<T>,
        negatives: &SampleSet<T>,
    ) -> Result<Option<KoaAutomaton<'a, T>>> {
        let formula = encoder.full_constraint(negatives)?;
        let mut solver = self.solver_factory.new_solver();
        encode(&formula, encoder.variable_space(), solver.as_mut());
        match solver.solve() {
            SolvingResult::Satisfiable(assignment) => Ok(Some(KoaAutomaton::new_from_assignment(
                encoder.alphabet(),
                encoder.variable_space(),
                &assignment,
            )?)),
            SolvingResult::Unsatisfiable => Ok(None),
            SolvingResult::Unknown => Err(anyhow!(
                "the SAT solver was not able to decide the identification problem"
            )),
        }
    }
}

/// Checks the samples are correctly classified by an automaton, and returns the number of misclassified ones.
///
/// Each misclassified sample is reported with a warning.
pub fn check_witness<T>(
    automaton: &KoaAutomaton<T>,
    positives: &SampleSet<T>,
    negatives: &SampleSet<T>,
) -> Result<usize>
where
    T: LabelType,
{
    let mut n_misclassified = 0;
    for (expected, samples, kind) in [(true, positives, "positive"), (false, negatives, "negative")] {
        for (i, sample) in samples.iter().enumerate() {
            if automaton.accepts(sample)? != expected {
                warn!(
                    "the {} sample with index {} is misclassified by the automaton",
                    kind, i
                );
                n_misclassified += 1;
            }
        }
    }
    Ok(n_misclassified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        koa::Alphabet,
        sat::{BufferedSatSolver, SatSolver},
    };

    fn encoder_for(labels: &[char], n_slots: usize, positives: &SampleSet<char>) -> KoaEncoder<char> {
        let mut encoder = KoaEncoder::new(Alphabet::new_with_labels(labels), n_slots).unwrap();
        encoder.add_positive_samples(positives).unwrap();
        encoder
    }

    fn samples(words: &[&str]) -> SampleSet<char> {
        SampleSet::new(words.iter().map(|w| w.chars().collect()).collect())
    }

    #[test]
    fn test_sat_instance() {
        let positives = samples(&["a", "ab"]);
        let negatives = samples(&["b"]);
        let encoder = encoder_for(&['a', 'b'], 2, &positives);
        let mut solver = KoaIdentificationSolver::new();
        let automaton = solver.identify(&encoder, &negatives).unwrap().unwrap();
        assert!(automaton.accepts(&['a']).unwrap());
        assert!(automaton.accepts(&['a', 'b']).unwrap());
        assert!(!automaton.accepts(&['b']).unwrap());
        assert_eq!(0, check_witness(&automaton, &positives, &negatives).unwrap());
    }

    #[test]
    fn test_unsat_instance() {
        let positives = samples(&["a"]);
        let negatives = samples(&["a"]);
        let encoder = encoder_for(&['a'], 1, &positives);
        let mut solver = KoaIdentificationSolver::new();
        assert!(solver.identify(&encoder, &negatives).unwrap().is_none());
    }

    #[test]
    fn test_longer_samples() {
        let positives = samples(&["ab", "abab", "ababab"]);
        let negatives = samples(&["a", "aba", "b", "abb"]);
        let encoder = encoder_for(&['a', 'b'], 2, &positives);
        let mut solver = KoaIdentificationSolver::new();
        let automaton = solver.identify(&encoder, &negatives).unwrap().unwrap();
        for w in positives.iter() {
            assert!(automaton.accepts(w).unwrap());
        }
    }

    #[test]
    fn test_empty_negative_sample_is_unsat() {
        let encoder = encoder_for(&['a'], 2, &samples(&["a"]));
        let mut solver = KoaIdentificationSolver::new();
        assert!(solver.identify(&encoder, &samples(&[""])).unwrap().is_none());
    }

    struct UnknownSolverFactory;

    impl SatSolverFactory for UnknownSolverFactory {
        fn new_solver(&self) -> Box<dyn SatSolver> {
            Box::new(BufferedSatSolver::new(Box::new(|_| Box::new(&[] as &[u8]))))
        }
    }

    #[test]
    fn test_unknown_is_an_error() {
        let encoder = encoder_for(&['a'], 1, &samples(&["a"]));
        let mut solver =
            KoaIdentificationSolver::new_with_sat_solver_factory(Box::new(UnknownSolverFactory));
        assert!(solver.identify(&encoder, &samples(&[])).is_err());
    }

    #[test]
    fn test_check_witness_counts_errors() {
        let alphabet = Alphabet::new_with_labels(&['a']);
        let automaton = KoaAutomaton::new(&alphabet, vec![]);
        assert_eq!(
            2,
            check_witness(&automaton, &samples(&["a", ""]), &samples(&["aa"])).unwrap()
        );
    }
}
