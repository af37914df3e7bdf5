use crate::{
    encodings::VariableSpace,
    koa::{KoaAutomaton, LabelType, SampleSet},
};
use anyhow::{Context, Result};
use std::io::{Read, Write};

/// The type of callback functions to call when warnings are raised while reading samples.
///
/// The arguments are the index of the line and the warning message.
pub type WarningHandler = Box<dyn Fn(usize, String)>;

/// A trait implemented by objects able to read sets of samples.
pub trait SamplesReader<T>
where
    T: LabelType,
{
    /// Reads a [`SampleSet`].
    ///
    /// In case warnings are raised, the callback functions registered by [add_warning_handler](Self::add_warning_handler) are triggered.
    ///
    /// # Example
    ///
    /// ```
    /// # use koala::io::{DelimitedSamplesReader, SamplesReader};
    /// # use koala::koa::SampleSet;
    /// fn read_samples_from_str(s: &str) -> SampleSet<String> {
    ///     let reader = DelimitedSamplesReader::default();
    ///     reader.read(&mut s.as_bytes()).expect("invalid samples")
    /// }
    /// # assert_eq!(2, read_samples_from_str("a,b\nb\n").len());
    /// ```
    fn read(&self, reader: &mut dyn Read) -> Result<SampleSet<T>>;

    /// Adds a callback function to call when warnings are raised while reading samples.
    fn add_warning_handler(&mut self, h: WarningHandler);
}

/// A trait implemented by objects that write the results of identification problems.
pub trait ResponseWriter<T>
where
    T: LabelType,
{
    /// Writes the text associated with the fact no automaton exists.
    fn write_no_automaton(&self, writer: &mut dyn Write) -> Result<()>;

    /// Writes an automaton.
    fn write_automaton(&self, writer: &mut dyn Write, automaton: &KoaAutomaton<T>) -> Result<()>;

    /// Writes the values of all the edge variables of a model.
    fn write_model(
        &self,
        writer: &mut dyn Write,
        space: &VariableSpace,
        automaton: &KoaAutomaton<T>,
    ) -> Result<()>;
}

pub(crate) fn write_no_automaton(writer: &mut dyn Write) -> Result<()> {
    let context = "while writing the absence of automaton";
    writeln!(writer, "NO").context(context)?;
    writer.flush().context(context)
}
