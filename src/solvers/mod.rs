//! Solvers for the k-OA identification problem.

mod identification_solver;
pub use identification_solver::check_witness;
pub use identification_solver::encode;
pub use identification_solver::KoaIdentificationSolver;

mod specs;
pub use specs::AutomatonIdentifier;
