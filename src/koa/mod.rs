//! Alphabets, samples and k-occurrence automata.

mod alphabet;
pub use alphabet::Alphabet;
pub use alphabet::LabelType;
pub use alphabet::Position;
pub use alphabet::Symbol;

mod automaton;
pub use automaton::KoaAutomaton;

mod sample;
pub use sample::SampleSet;
