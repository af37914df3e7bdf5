use crate::{
    encodings::KoaEncoder,
    koa::{KoaAutomaton, LabelType, SampleSet},
};
use anyhow::Result;

/// A trait for solvers able to identify a k-OA from samples.
pub trait AutomatonIdentifier<T>
where
    T: LabelType,
{
    /// Looks for an automaton accepting the positive samples aggregated by the encoder and rejecting the negative ones.
    ///
    /// In case no such automaton exists, [Option::None] is returned.
    /// An error is returned if the problem cannot be encoded or decided.
    fn identify<'a>(
        &mut self,
        encoder: &'a KoaEncoder<T>,
        negatives: &SampleSet<T>,
    ) -> Result<Option<KoaAutomaton<'a, T>>>;
}
