use super::{SamplesReader, WarningHandler};
use crate::koa::SampleSet;
use anyhow::{anyhow, Context, Result};
use std::{
    collections::HashSet,
    io::{BufRead, BufReader, Read},
};

/// The default symbol delimiter.
pub const DEFAULT_DELIMITER: &str = ",";

/// A reader for samples written one per line, the symbols being separated by a delimiter.
///
/// Symbols are strings; whitespaces around them are removed.
/// An empty line stands for the empty sample.
/// A trailing carriage return is ignored, so that files written with Windows line endings can be read.
///
/// # Format
///
/// The following content defines four samples over the symbols `a`, `b` and `c`, the third one being empty.
///
/// ```text
/// a,b,c
/// b
///
/// c,c
/// ```
///
/// A warning is raised for each sample that is a repetition of a previous one.
pub struct DelimitedSamplesReader {
    delimiter: String,
    warning_handlers: Vec<WarningHandler>,
}

impl Default for DelimitedSamplesReader {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl DelimitedSamplesReader {
    /// Builds a reader using a custom delimiter.
    ///
    /// # Panics
    ///
    /// Panics if the delimiter is empty.
    pub fn new(delimiter: &str) -> Self {
        if delimiter.is_empty() {
            panic!("the symbol delimiter cannot be empty")
        }
        Self {
            delimiter: delimiter.to_string(),
            warning_handlers: vec![],
        }
    }

    fn warn(&self, line: usize, msg: String) {
        self.warning_handlers
            .iter()
            .for_each(|h| h(line, msg.clone()));
    }

    fn read_sample(&self, line: &str) -> Result<Vec<String>> {
        if line.trim().is_empty() {
            return Ok(vec![]);
        }
        line.split(self.delimiter.as_str())
            .enumerate()
            .map(|(i, w)| {
                let symbol = w.trim();
                if symbol.is_empty() {
                    Err(anyhow!("empty symbol at position {}", i))
                } else {
                    Ok(symbol.to_string())
                }
            })
            .collect()
    }
}

impl SamplesReader<String> for DelimitedSamplesReader {
    fn read(&self, reader: &mut dyn Read) -> Result<SampleSet<String>> {
        let br = BufReader::new(reader);
        let mut samples = SampleSet::default();
        let mut seen = HashSet::new();
        for (i, line) in br.lines().enumerate() {
            let context = || format!("while reading line with index {}", i);
            let l = line.with_context(context)?;
            let sample = self
                .read_sample(l.strip_suffix('\r').unwrap_or(l.as_str()))
                .with_context(context)?;
            if !seen.insert(sample.clone()) {
                self.warn(i, "duplicate sample".to_string());
            }
            samples.push(sample);
        }
        Ok(samples)
    }

    fn add_warning_handler(&mut self, h: WarningHandler) {
        self.warning_handlers.push(h);
    }
}
