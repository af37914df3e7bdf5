use super::{
    DeterminismConstraintBuilder, GlobalConstraintBuilder, OccurrenceTables,
    SentenceConstraintBuilder, VariableSpace,
};
use crate::{
    formula::Formula,
    koa::{Alphabet, LabelType, SampleSet},
};
use anyhow::{Context, Result};
use log::{debug, info};

/// The context of the encoding of a k-OA identification problem.
///
/// The alphabet and the number of slots per symbol are fixed at creation;
/// the variable space and the determinism constraint are computed once at this time.
/// Positive samples are then aggregated into occurrence tables, from which a single global constraint is built.
///
/// ```
/// # use koala::encodings::KoaEncoder;
/// # use koala::koa::{Alphabet, SampleSet};
/// let mut encoder = KoaEncoder::new(Alphabet::new_with_labels(&['a', 'b']), 2).unwrap();
/// encoder.add_positive_sample(&['a', 'b']).unwrap();
/// let negatives = SampleSet::new(vec![vec!['b']]);
/// let formula = encoder.full_constraint(&negatives).unwrap();
/// assert!(!formula.is_false());
/// ```
pub struct KoaEncoder<T>
where
    T: LabelType,
{
    alphabet: Alphabet<T>,
    space: VariableSpace,
    tables: OccurrenceTables,
    determinism: Formula,
}

impl<T> KoaEncoder<T>
where
    T: LabelType,
{
    /// Builds a new encoder for an alphabet and a number of slots per symbol.
    ///
    /// An error is returned if the number of slots is `0`.
    pub fn new(alphabet: Alphabet<T>, n_slots: usize) -> Result<Self> {
        let space = VariableSpace::new(alphabet.len(), n_slots)?;
        let determinism = DeterminismConstraintBuilder::new(&space).build()?;
        info!(
            "encoding over {} symbols with {} slots per symbol ({} edge variables)",
            alphabet.len(),
            n_slots,
            space.n_edge_vars()
        );
        Ok(Self {
            alphabet,
            space,
            tables: OccurrenceTables::default(),
            determinism,
        })
    }

    /// Returns the alphabet.
    pub fn alphabet(&self) -> &Alphabet<T> {
        &self.alphabet
    }

    /// Returns the variable space.
    pub fn variable_space(&self) -> &VariableSpace {
        &self.space
    }

    /// Returns the occurrence tables aggregating the positive samples added so far.
    pub fn occurrence_tables(&self) -> &OccurrenceTables {
        &self.tables
    }

    /// Adds a positive sample to the occurrence tables.
    ///
    /// An error is returned if the sample contains a symbol that is not in the alphabet;
    /// in this case, the tables are left unchanged.
    pub fn add_positive_sample(&mut self, sample: &[T]) -> Result<()> {
        let ids = self.alphabet.sentence_ids(sample)?;
        self.tables.add_sentence(&ids);
        Ok(())
    }

    /// Adds a set of positive samples to the occurrence tables.
    pub fn add_positive_samples(&mut self, samples: &SampleSet<T>) -> Result<()> {
        for (i, sample) in samples.iter().enumerate() {
            self.add_positive_sample(sample)
                .with_context(|| format!("while adding the positive sample with index {}", i))?;
        }
        debug!("{} positive samples aggregated", self.tables.n_sentences());
        Ok(())
    }

    /// Returns the constraint making the automaton deterministic and canonical.
    pub fn determinism_constraint(&self) -> &Formula {
        &self.determinism
    }

    /// Returns the constraint stating the positive samples added so far are accepted.
    pub fn global_constraint(&self) -> Result<Formula> {
        GlobalConstraintBuilder::new(&self.space, &self.tables).build()
    }

    /// Returns the constraint stating a single sentence is accepted.
    pub fn sentence_constraint(&self, sentence: &[T]) -> Result<Formula> {
        let ids = self.alphabet.sentence_ids(sentence)?;
        SentenceConstraintBuilder::new(&self.space).build(&ids)
    }

    /// Returns the constraint stating all the negative samples are rejected.
    pub fn negative_constraint(&self, samples: &SampleSet<T>) -> Result<Formula> {
        let constraints = samples
            .iter()
            .enumerate()
            .map(|(i, s)| {
                self.sentence_constraint(s)
                    .map(Formula::not)
                    .with_context(|| format!("while encoding the negative sample with index {}", i))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Formula::and(constraints))
    }

    /// Returns the whole identification constraint: determinism, acceptance of the positive samples and rejection of the negative ones.
    pub fn full_constraint(&self, negatives: &SampleSet<T>) -> Result<Formula> {
        let global = self.global_constraint()?;
        let negative = self.negative_constraint(negatives)?;
        debug!(
            "constraint sizes: determinism={}, global={}, negative={}",
            self.determinism.size(),
            global.size(),
            negative.size()
        );
        Ok(Formula::and(vec![self.determinism.clone(), global, negative]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        formula::CnfEncoder,
        sat::{self, SolvingResult},
    };

    fn is_sat(formula: &Formula, n_vars: usize) -> bool {
        let mut solver = sat::default_solver();
        CnfEncoder::new(solver.as_mut(), n_vars).assert_formula(formula);
        matches!(solver.solve(), SolvingResult::Satisfiable(_))
    }

    fn assert_equivalent(f: &Formula, g: &Formula, n_vars: usize) {
        assert!(!is_sat(
            &Formula::and(vec![f.clone(), Formula::not(g.clone())]),
            n_vars
        ));
        assert!(!is_sat(
            &Formula::and(vec![g.clone(), Formula::not(f.clone())]),
            n_vars
        ));
    }

    #[test]
    fn test_aggregation_equivalence() {
        let sample_sets = vec![
            vec!["ab", "ba"],
            vec!["aab", "ab"],
            vec!["abba", "bb", "aba"],
            vec!["aa", "abab"],
        ];
        for n_slots in 1..=2 {
            for samples in sample_sets.iter() {
                let alphabet = Alphabet::new_with_labels(&['a', 'b']);
                let mut encoder = KoaEncoder::new(alphabet, n_slots).unwrap();
                let mut standalone = vec![];
                for s in samples {
                    let sample = s.chars().collect::<Vec<char>>();
                    encoder.add_positive_sample(&sample).unwrap();
                    let ids = encoder.alphabet().sentence_ids(&sample).unwrap();
                    standalone.push(
                        SentenceConstraintBuilder::new(encoder.variable_space())
                            .build_existence(&ids)
                            .unwrap(),
                    );
                }
                let global = GlobalConstraintBuilder::new(
                    encoder.variable_space(),
                    encoder.occurrence_tables(),
                )
                .build_existence()
                .unwrap();
                assert_equivalent(
                    &Formula::and(standalone),
                    &global,
                    encoder.variable_space().n_edge_vars(),
                );
            }
        }
    }

    #[test]
    fn test_single_slot_determinism() {
        let encoder = KoaEncoder::new(Alphabet::new_with_labels(&['a', 'b', 'c']), 1).unwrap();
        assert!(encoder.determinism_constraint().is_true());
    }

    #[test]
    fn test_zero_slots() {
        let err = KoaEncoder::new(Alphabet::new_with_labels(&['a']), 0)
            .err()
            .unwrap();
        assert!(err.to_string().starts_with("configuration error"));
    }

    #[test]
    fn test_unknown_symbol() {
        let mut encoder = KoaEncoder::new(Alphabet::new_with_labels(&['a']), 2).unwrap();
        assert!(encoder.add_positive_sample(&['a', 'z']).is_err());
        assert!(encoder.occurrence_tables().is_empty());
        let negatives = SampleSet::new(vec![vec!['a'], vec!['z']]);
        let err = encoder.negative_constraint(&negatives).unwrap_err();
        assert_eq!(
            "while encoding the negative sample with index 1",
            err.to_string()
        );
        assert_eq!("no such symbol: z", err.root_cause().to_string());
    }

    #[test]
    fn test_empty_sentence_constraint() {
        let encoder = KoaEncoder::new(Alphabet::new_with_labels(&['a']), 2).unwrap();
        assert!(encoder.sentence_constraint(&[]).unwrap().is_true());
        let negatives = SampleSet::new(vec![vec![]]);
        assert!(encoder.full_constraint(&negatives).unwrap().is_false());
    }

    #[test]
    fn test_same_positive_and_negative_is_unsat() {
        let mut encoder = KoaEncoder::new(Alphabet::new_with_labels(&['a']), 1).unwrap();
        encoder.add_positive_sample(&['a']).unwrap();
        let formula = encoder
            .full_constraint(&SampleSet::new(vec![vec!['a']]))
            .unwrap();
        assert!(!is_sat(&formula, encoder.variable_space().n_edge_vars()));
    }

    #[test]
    fn test_empty_alphabet() {
        let encoder = KoaEncoder::<char>::new(Alphabet::new_with_labels(&[]), 2).unwrap();
        assert!(encoder.global_constraint().unwrap().is_true());
        assert!(encoder.determinism_constraint().is_true());
        assert_eq!(1, encoder.variable_space().n_edge_vars());
    }
}
