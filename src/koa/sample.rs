use super::LabelType;

/// An ordered collection of samples (sentences) over some symbols.
///
/// Samples may be empty and may be repeated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleSet<T>
where
    T: LabelType,
{
    samples: Vec<Vec<T>>,
}

impl<T> Default for SampleSet<T>
where
    T: LabelType,
{
    fn default() -> Self {
        Self {
            samples: Vec::new(),
        }
    }
}

impl<T> SampleSet<T>
where
    T: LabelType,
{
    /// Builds a sample set from a list of samples.
    pub fn new(samples: Vec<Vec<T>>) -> Self {
        Self { samples }
    }

    /// Adds a sample at the end of the set.
    pub fn push(&mut self, sample: Vec<T>) {
        self.samples.push(sample)
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` iff the set has no sample.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the length of the longest sample, or `0` if there is no sample.
    pub fn max_length(&self) -> usize {
        self.samples.iter().map(|s| s.len()).max().unwrap_or(0)
    }

    /// Returns the distinct symbols used in the samples, sorted.
    ///
    /// ```
    /// # use koala::koa::SampleSet;
    /// let samples = SampleSet::new(vec![vec!['b', 'a'], vec![], vec!['a', 'c']]);
    /// assert_eq!(vec!['a', 'b', 'c'], samples.symbols());
    /// ```
    pub fn symbols(&self) -> Vec<T> {
        let mut symbols = self
            .samples
            .iter()
            .flat_map(|s| s.iter().cloned())
            .collect::<Vec<T>>();
        symbols.sort_unstable();
        symbols.dedup();
        symbols
    }

    /// Returns an iterator to the samples.
    pub fn iter(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.samples.iter().map(|s| s.as_slice())
    }
}
