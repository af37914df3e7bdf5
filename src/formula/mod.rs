//! Boolean formulas and their translation into clauses.

mod boolean_formula;
pub use boolean_formula::Formula;

mod cnf_encoder;
pub use cnf_encoder::CnfEncoder;
