use super::{VariableSpace, CANONICAL_SLOT, SENTINEL_SLOT};
use crate::{formula::Formula, koa::Position};
use anyhow::Result;
use std::fmt::Display;

/// The way a symbol is entered in a sequence of symbols.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Predecessor {
    /// The symbol is the first one of the sentence: it is entered from the source.
    Source,
    /// The symbol follows the first symbol of the sentence (given by its id), which is in its canonical slot.
    Canonical(usize),
    /// The symbol follows an inner symbol (given by its id), which may be in any slot.
    AnySlot(usize),
}

impl Display for Predecessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Predecessor::Source => write!(f, "src"),
            Predecessor::Canonical(id) => write!(f, "#{}@{}", id, CANONICAL_SLOT),
            Predecessor::AnySlot(id) => write!(f, "#{}", id),
        }
    }
}

/// The way a symbol is left in a sequence of symbols.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Successor {
    /// The symbol is followed by another one (given by its id), in any slot.
    Symbol(usize),
    /// The symbol is the last one of the sentence.
    Sink,
}

pub(crate) fn edge(
    space: &VariableSpace,
    from: Position,
    from_slot: usize,
    to: Position,
    to_slot: usize,
) -> Result<Formula> {
    Ok(Formula::var(space.edge_var(from, from_slot, to, to_slot)?))
}

/// `src -> (c, 1)`
pub(crate) fn canonical_source_edge(space: &VariableSpace, c: usize) -> Result<Formula> {
    edge(
        space,
        Position::Source,
        SENTINEL_SLOT,
        Position::Symbol(c),
        CANONICAL_SLOT,
    )
}

/// `(c, k) -> snk`
pub(crate) fn sink_edge(space: &VariableSpace, c: usize, k: usize) -> Result<Formula> {
    edge(
        space,
        Position::Symbol(c),
        k,
        Position::Sink,
        SENTINEL_SLOT,
    )
}

fn or_over<I, F>(iter: I, f: F) -> Result<Formula>
where
    I: Iterator,
    F: Fn(I::Item) -> Result<Formula>,
{
    Ok(Formula::or(iter.map(f).collect::<Result<Vec<_>>>()?))
}

/// `⋁_j (c1, 1) -> (c2, j)`
pub(crate) fn canonical_pair(space: &VariableSpace, c1: usize, c2: usize) -> Result<Formula> {
    or_over(space.slots(), |j| {
        edge(
            space,
            Position::Symbol(c1),
            CANONICAL_SLOT,
            Position::Symbol(c2),
            j,
        )
    })
}

/// `⋁_{k1, k2} (c1, k1) -> (c2, k2)`
pub(crate) fn any_slot_pair(space: &VariableSpace, c1: usize, c2: usize) -> Result<Formula> {
    or_over(space.slots(), |k1| {
        or_over(space.slots(), |k2| {
            edge(space, Position::Symbol(c1), k1, Position::Symbol(c2), k2)
        })
    })
}

/// `⋁_k (c, k) -> snk`
pub(crate) fn any_slot_to_sink(space: &VariableSpace, c: usize) -> Result<Formula> {
    or_over(space.slots(), |k| sink_edge(space, c, k))
}

/// The formula stating an edge enters `(c2, k2)` from the predecessor.
fn incoming(space: &VariableSpace, pred: Predecessor, c2: usize, k2: usize) -> Result<Formula> {
    let to = Position::Symbol(c2);
    match pred {
        Predecessor::Source => edge(space, Position::Source, SENTINEL_SLOT, to, k2),
        Predecessor::Canonical(c1) => edge(space, Position::Symbol(c1), CANONICAL_SLOT, to, k2),
        Predecessor::AnySlot(c1) => or_over(space.slots(), |k1| {
            edge(space, Position::Symbol(c1), k1, to, k2)
        }),
    }
}

/// The formula stating an edge leaves `(c2, k2)` to the successor.
fn outgoing(space: &VariableSpace, c2: usize, k2: usize, succ: Successor) -> Result<Formula> {
    match succ {
        Successor::Symbol(c3) => or_over(space.slots(), |k3| {
            edge(space, Position::Symbol(c2), k2, Position::Symbol(c3), k3)
        }),
        Successor::Sink => sink_edge(space, c2, k2),
    }
}

/// For each slot `k2` of `c2`, entering `(c2, k2)` from the predecessor implies leaving it to the successor.
pub(crate) fn continuity(
    space: &VariableSpace,
    pred: Predecessor,
    c2: usize,
    succ: Successor,
) -> Result<Formula> {
    let implications = space
        .slots()
        .map(|k2| {
            Ok(Formula::implies(
                incoming(space, pred, c2, k2)?,
                outgoing(space, c2, k2, succ)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Formula::and(implications))
}
