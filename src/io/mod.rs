//! Objects used to read samples and write the results of identification problems.

mod delimited_reader;
pub use delimited_reader::DelimitedSamplesReader;
pub use delimited_reader::DEFAULT_DELIMITER;

mod specs;
pub use specs::ResponseWriter;
pub use specs::SamplesReader;
pub use specs::WarningHandler;

mod text_writer;
pub use text_writer::TextWriter;
