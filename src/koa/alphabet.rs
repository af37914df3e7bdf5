use anyhow::{anyhow, Result};
use std::{
    collections::HashMap,
    fmt::{Debug, Display},
    hash::Hash,
};

/// The trait for symbol labels.
///
/// Symbols may be labeled by any type implementing some traits allowing their use in maps, their ordering and their display.
/// This trait is just a shortcut used to combine them.
///
/// Simple types like [usize], [char] and [String] implements [LabelType].
pub trait LabelType: Clone + Debug + Display + Eq + Hash + Ord {}
impl<T: Clone + Debug + Display + Eq + Hash + Ord> LabelType for T {}

/// A symbol of an alphabet, associated with a unique identifier.
///
/// Identifiers of symbols range from `1` to the size of the alphabet;
/// `0` and `size + 1` are reserved for the [`Position::Source`] and [`Position::Sink`] sentinels.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Symbol<T>
where
    T: LabelType,
{
    id: usize,
    label: T,
}

impl<T> Symbol<T>
where
    T: LabelType,
{
    /// Returns the symbol label.
    pub fn label(&self) -> &T {
        &self.label
    }

    /// Returns the symbol identifier.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the position associated with this symbol.
    pub fn position(&self) -> Position {
        Position::Symbol(self.id)
    }
}

impl<T> Display for Symbol<T>
where
    T: LabelType,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// A position in a sentence: a symbol, or one of the sentinels before the first symbol and after the last one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Position {
    /// The sentinel before the first symbol.
    Source,
    /// A symbol, given by its identifier.
    Symbol(usize),
    /// The sentinel after the last symbol.
    Sink,
}

impl Position {
    /// Returns the integer identifier of this position given the size of the alphabet.
    ///
    /// ```
    /// # use koala::koa::Position;
    /// assert_eq!(0, Position::Source.id(2));
    /// assert_eq!(1, Position::Symbol(1).id(2));
    /// assert_eq!(3, Position::Sink.id(2));
    /// ```
    pub fn id(&self, alphabet_size: usize) -> usize {
        match self {
            Position::Source => 0,
            Position::Symbol(id) => *id,
            Position::Sink => alphabet_size + 1,
        }
    }

    /// Builds a position from its integer identifier.
    ///
    /// An error is returned if the identifier is greater than the size of the alphabet plus one.
    ///
    /// ```
    /// # use koala::koa::Position;
    /// assert_eq!(Position::Sink, Position::from_id(3, 2).unwrap());
    /// assert!(Position::from_id(4, 2).is_err());
    /// ```
    pub fn from_id(id: usize, alphabet_size: usize) -> Result<Self> {
        match id {
            0 => Ok(Position::Source),
            i if i <= alphabet_size => Ok(Position::Symbol(i)),
            i if i == alphabet_size + 1 => Ok(Position::Sink),
            _ => Err(anyhow!(
                "invalid index: position id {} is out of range for an alphabet of size {}",
                id,
                alphabet_size
            )),
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Source => write!(f, "src"),
            Position::Symbol(id) => write!(f, "#{}", id),
            Position::Sink => write!(f, "snk"),
        }
    }
}

/// An ordered set of symbols, each one with a unique id.
///
/// The ids are given in the order the labels are provided, starting at `1`.
/// Repeated labels are ignored.
#[derive(Debug)]
pub struct Alphabet<T>
where
    T: LabelType,
{
    symbols: Vec<Symbol<T>>,
    label_to_id: HashMap<T, usize>,
}

impl<T> Alphabet<T>
where
    T: LabelType,
{
    /// Builds a new alphabet given the labels of its symbols.
    ///
    /// If a label appears multiple times, the first occurrence is the only one that is considered.
    ///
    /// ```
    /// # use koala::koa::Alphabet;
    /// let alphabet = Alphabet::new_with_labels(&["a", "b", "a"]);
    /// assert_eq!(2, alphabet.len());
    /// assert_eq!(1, alphabet.get_symbol(&"a").unwrap().id());
    /// assert_eq!(2, alphabet.get_symbol(&"b").unwrap().id());
    /// ```
    pub fn new_with_labels(labels: &[T]) -> Self {
        let mut alphabet = Alphabet {
            symbols: Vec::with_capacity(labels.len()),
            label_to_id: HashMap::with_capacity(labels.len()),
        };
        labels.iter().for_each(|l| {
            alphabet.label_to_id.entry(l.clone()).or_insert_with(|| {
                alphabet.symbols.push(Symbol {
                    id: alphabet.symbols.len() + 1,
                    label: l.clone(),
                });
                alphabet.symbols.len()
            });
        });
        alphabet.symbols.shrink_to_fit();
        alphabet.label_to_id.shrink_to_fit();
        alphabet
    }

    /// Returns the number of symbols in the alphabet.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` iff the alphabet has no symbol.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns the symbol associated to a label.
    ///
    /// An error is returned if no symbol has this label.
    pub fn get_symbol(&self, label: &T) -> Result<&Symbol<T>> {
        self.label_to_id
            .get(label)
            .map(|id| &self.symbols[id - 1])
            .ok_or_else(|| anyhow!("no such symbol: {}", label))
    }

    /// Returns the symbol with the corresponding id.
    ///
    /// An error is returned if the id does not refer to a symbol (this includes the sentinel ids).
    pub fn get_symbol_by_id(&self, id: usize) -> Result<&Symbol<T>> {
        if id == 0 || id > self.symbols.len() {
            return Err(anyhow!(
                "invalid index: {} is not a symbol id for an alphabet of size {}",
                id,
                self.symbols.len()
            ));
        }
        Ok(&self.symbols[id - 1])
    }

    /// Translates a sentence into the sequence of the ids of its symbols.
    ///
    /// An error is returned if a label of the sentence is not in the alphabet.
    ///
    /// ```
    /// # use koala::koa::Alphabet;
    /// let alphabet = Alphabet::new_with_labels(&['a', 'b']);
    /// assert_eq!(vec![2, 1, 1], alphabet.sentence_ids(&['b', 'a', 'a']).unwrap());
    /// assert!(alphabet.sentence_ids(&['c']).is_err());
    /// ```
    pub fn sentence_ids(&self, sentence: &[T]) -> Result<Vec<usize>> {
        sentence
            .iter()
            .map(|l| self.get_symbol(l).map(|s| s.id()))
            .collect()
    }

    /// Returns a human readable name for a position.
    pub fn position_name(&self, position: Position) -> String {
        match position {
            Position::Symbol(id) => match self.get_symbol_by_id(id) {
                Ok(s) => s.label().to_string(),
                Err(_) => position.to_string(),
            },
            _ => position.to_string(),
        }
    }

    /// Returns an iterator to the symbols, in increasing id order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol<T>> + '_ {
        self.symbols.iter()
    }
}
