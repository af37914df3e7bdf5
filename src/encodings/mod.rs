//! Encodings of the k-OA identification problem into boolean formulas.

mod determinism_constraint;
pub use determinism_constraint::DeterminismConstraintBuilder;

mod edge_formulas;
pub use edge_formulas::Predecessor;
pub use edge_formulas::Successor;

mod global_constraint;
pub use global_constraint::GlobalConstraintBuilder;

mod koa_encoder;
pub use koa_encoder::KoaEncoder;

mod occurrence_tables;
pub use occurrence_tables::OccurrenceTableKind;
pub use occurrence_tables::OccurrenceTables;
pub use occurrence_tables::TableKey;

mod sentence_constraint;
pub use sentence_constraint::SentenceConstraintBuilder;

mod variable_space;
pub use variable_space::Edge;
pub use variable_space::VariableSpace;
pub use variable_space::CANONICAL_SLOT;
pub use variable_space::SENTINEL_SLOT;
