use super::Predecessor;
use std::collections::BTreeMap;
use strum_macros::{AsRefStr, EnumIter};

/// The kinds of tables used to aggregate the positive samples.
#[derive(AsRefStr, Clone, Copy, Debug, EnumIter, PartialEq, Eq)]
pub enum OccurrenceTableKind {
    /// The first symbols of the sentences.
    #[strum(serialize = "src->first")]
    SourceToFirst,
    /// The last symbols of the sentences.
    #[strum(serialize = "last->snk")]
    LastToSink,
    /// The pairs made of the first two symbols of the sentences.
    #[strum(serialize = "first->second")]
    FirstToSecond,
    /// The pairs of consecutive symbols, excluding the first pair of each sentence.
    #[strum(serialize = "interior")]
    Interior,
    /// The triples made of the first three symbols of the sentences.
    #[strum(serialize = "first-triple")]
    FirstTriple,
    /// The triples of consecutive symbols, excluding the first triple of each sentence.
    #[strum(serialize = "interior-triple")]
    InteriorTriple,
    /// The last symbol of the sentences along with their predecessor.
    #[strum(serialize = "pair-before-snk")]
    PairBeforeSink,
}

/// A key of an occurrence table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableKey {
    /// A key made of a single symbol id.
    Symbol(usize),
    /// A key made of two symbol ids.
    Pair(usize, usize),
    /// A key made of three symbol ids.
    Triple(usize, usize, usize),
    /// A key made of the last symbol of a sentence and the way it is entered.
    PairBeforeSink(Predecessor, usize),
}

/// The tables aggregating the positive samples.
///
/// Each table counts the occurrences of some patterns (first symbols, consecutive pairs, triples, ...) in the sentences.
/// A positive count means the pattern was observed; the counts themselves are only used for diagnostics.
/// Tables are ordered maps, so that iterating over them does not depend on the insertion order.
///
/// ```
/// # use koala::encodings::{OccurrenceTableKind, OccurrenceTables};
/// let mut tables = OccurrenceTables::default();
/// tables.add_sentence(&[1, 2, 1]);
/// tables.add_sentence(&[1, 2, 1]);
/// assert_eq!(1, tables.n_entries(OccurrenceTableKind::FirstTriple));
/// assert_eq!(2, tables.n_occurrences(OccurrenceTableKind::FirstTriple));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OccurrenceTables {
    source_to_first: BTreeMap<usize, usize>,
    last_to_sink: BTreeMap<usize, usize>,
    first_to_second: BTreeMap<(usize, usize), usize>,
    interior: BTreeMap<(usize, usize), usize>,
    first_triples: BTreeMap<(usize, usize, usize), usize>,
    interior_triples: BTreeMap<(usize, usize, usize), usize>,
    pairs_before_sink: BTreeMap<(Predecessor, usize), usize>,
    n_sentences: usize,
}

fn increment<K: Ord>(table: &mut BTreeMap<K, usize>, key: K) {
    *table.entry(key).or_insert(0) += 1;
}

impl OccurrenceTables {
    /// Adds a sentence, given by the ids of its symbols, to the tables.
    ///
    /// Empty sentences leave the tables unchanged.
    pub fn add_sentence(&mut self, s: &[usize]) {
        self.n_sentences += 1;
        let n = s.len();
        if n == 0 {
            return;
        }
        increment(&mut self.source_to_first, s[0]);
        increment(&mut self.last_to_sink, s[n - 1]);
        match n {
            1 => increment(&mut self.pairs_before_sink, (Predecessor::Source, s[0])),
            2 => increment(
                &mut self.pairs_before_sink,
                (Predecessor::Canonical(s[0]), s[1]),
            ),
            _ => increment(
                &mut self.pairs_before_sink,
                (Predecessor::AnySlot(s[n - 2]), s[n - 1]),
            ),
        }
        if n > 1 {
            increment(&mut self.first_to_second, (s[0], s[1]));
        }
        if n > 2 {
            s[1..].windows(2).for_each(|w| increment(&mut self.interior, (w[0], w[1])));
            increment(&mut self.first_triples, (s[0], s[1], s[2]));
            s[1..]
                .windows(3)
                .for_each(|w| increment(&mut self.interior_triples, (w[0], w[1], w[2])));
        }
    }

    /// Returns the number of sentences added so far, including the empty ones.
    pub fn n_sentences(&self) -> usize {
        self.n_sentences
    }

    /// Returns `true` iff no pattern was observed.
    pub fn is_empty(&self) -> bool {
        self.source_to_first.is_empty()
    }

    /// Returns the first symbols of the sentences.
    pub fn source_to_first(&self) -> impl Iterator<Item = usize> + '_ {
        self.source_to_first.keys().copied()
    }

    /// Returns the last symbols of the sentences.
    pub fn last_to_sink(&self) -> impl Iterator<Item = usize> + '_ {
        self.last_to_sink.keys().copied()
    }

    /// Returns the pairs made of the first two symbols of the sentences.
    pub fn first_to_second(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.first_to_second.keys().copied()
    }

    /// Returns the pairs of consecutive symbols that do not start a sentence.
    pub fn interior(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.interior.keys().copied()
    }

    /// Returns the triples made of the first three symbols of the sentences.
    pub fn first_triples(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.first_triples.keys().copied()
    }

    /// Returns the triples of consecutive symbols that do not start a sentence.
    pub fn interior_triples(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.interior_triples.keys().copied()
    }

    /// Returns the last symbols of the sentences, along with the way they are entered.
    pub fn pairs_before_sink(&self) -> impl Iterator<Item = (Predecessor, usize)> + '_ {
        self.pairs_before_sink.keys().copied()
    }

    /// Returns the entries of a table with their occurrence counts, in key order.
    pub fn entries(&self, kind: OccurrenceTableKind) -> Vec<(TableKey, usize)> {
        match kind {
            OccurrenceTableKind::SourceToFirst => collect(&self.source_to_first, |k| {
                TableKey::Symbol(*k)
            }),
            OccurrenceTableKind::LastToSink => {
                collect(&self.last_to_sink, |k| TableKey::Symbol(*k))
            }
            OccurrenceTableKind::FirstToSecond => {
                collect(&self.first_to_second, |(a, b)| TableKey::Pair(*a, *b))
            }
            OccurrenceTableKind::Interior => {
                collect(&self.interior, |(a, b)| TableKey::Pair(*a, *b))
            }
            OccurrenceTableKind::FirstTriple => collect(&self.first_triples, |(a, b, c)| {
                TableKey::Triple(*a, *b, *c)
            }),
            OccurrenceTableKind::InteriorTriple => {
                collect(&self.interior_triples, |(a, b, c)| TableKey::Triple(*a, *b, *c))
            }
            OccurrenceTableKind::PairBeforeSink => {
                collect(&self.pairs_before_sink, |(p, b)| TableKey::PairBeforeSink(*p, *b))
            }
        }
    }

    /// Returns the number of distinct entries of a table.
    pub fn n_entries(&self, kind: OccurrenceTableKind) -> usize {
        self.entries(kind).len()
    }

    /// Returns the total number of occurrences recorded by a table.
    pub fn n_occurrences(&self, kind: OccurrenceTableKind) -> usize {
        self.entries(kind).iter().map(|(_, n)| n).sum()
    }
}

fn collect<K, F>(table: &BTreeMap<K, usize>, to_key: F) -> Vec<(TableKey, usize)>
where
    F: Fn(&K) -> TableKey,
{
    table.iter().map(|(k, n)| (to_key(k), *n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_empty_sentence() {
        let mut tables = OccurrenceTables::default();
        tables.add_sentence(&[]);
        assert!(tables.is_empty());
        assert_eq!(1, tables.n_sentences());
        for kind in OccurrenceTableKind::iter() {
            assert_eq!(0, tables.n_entries(kind));
        }
    }

    #[test]
    fn test_single_symbol() {
        let mut tables = OccurrenceTables::default();
        tables.add_sentence(&[2]);
        assert_eq!(vec![2], tables.source_to_first().collect::<Vec<_>>());
        assert_eq!(vec![2], tables.last_to_sink().collect::<Vec<_>>());
        assert_eq!(
            vec![(Predecessor::Source, 2)],
            tables.pairs_before_sink().collect::<Vec<_>>()
        );
        assert_eq!(0, tables.first_to_second().count());
        assert_eq!(0, tables.interior().count());
    }

    #[test]
    fn test_two_symbols() {
        let mut tables = OccurrenceTables::default();
        tables.add_sentence(&[1, 2]);
        assert_eq!(vec![(1, 2)], tables.first_to_second().collect::<Vec<_>>());
        assert_eq!(
            vec![(Predecessor::Canonical(1), 2)],
            tables.pairs_before_sink().collect::<Vec<_>>()
        );
        assert_eq!(0, tables.interior().count());
        assert_eq!(0, tables.first_triples().count());
    }

    #[test]
    fn test_long_sentence() {
        let mut tables = OccurrenceTables::default();
        tables.add_sentence(&[1, 2, 3, 1, 2]);
        assert_eq!(vec![1], tables.source_to_first().collect::<Vec<_>>());
        assert_eq!(vec![2], tables.last_to_sink().collect::<Vec<_>>());
        assert_eq!(vec![(1, 2)], tables.first_to_second().collect::<Vec<_>>());
        assert_eq!(
            vec![(1, 2), (2, 3), (3, 1)],
            tables.interior().collect::<Vec<_>>()
        );
        assert_eq!(vec![(1, 2, 3)], tables.first_triples().collect::<Vec<_>>());
        assert_eq!(
            vec![(2, 3, 1), (3, 1, 2)],
            tables.interior_triples().collect::<Vec<_>>()
        );
        assert_eq!(
            vec![(Predecessor::AnySlot(1), 2)],
            tables.pairs_before_sink().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_repeated_evidence_only_counts() {
        let mut once = OccurrenceTables::default();
        once.add_sentence(&[1, 2, 1]);
        let mut twice = once.clone();
        twice.add_sentence(&[1, 2, 1]);
        for kind in OccurrenceTableKind::iter() {
            assert_eq!(once.n_entries(kind), twice.n_entries(kind));
            assert_eq!(2 * once.n_occurrences(kind), twice.n_occurrences(kind));
        }
    }

    #[test]
    fn test_entries() {
        let mut tables = OccurrenceTables::default();
        tables.add_sentence(&[1, 2, 2]);
        tables.add_sentence(&[2, 2]);
        assert_eq!(
            vec![(TableKey::Pair(1, 2), 1), (TableKey::Pair(2, 2), 1)],
            tables.entries(OccurrenceTableKind::FirstToSecond)
        );
        assert_eq!(2, tables.n_occurrences(OccurrenceTableKind::LastToSink));
        assert_eq!(1, tables.n_entries(OccurrenceTableKind::LastToSink));
        assert_eq!("pair-before-snk", OccurrenceTableKind::PairBeforeSink.as_ref());
    }
}
