//! Curated API for callers (UNSTABLE).
//!
//! Important
//! - Convenience surface for the CLI, benches and examples. Breaking changes
//!   are allowed; prefer these re-exports over reaching into submodules.

// Solve entry points
pub use crate::solve::{
    grow_precision, initial_edge_len, solve, solve_report, solve_with_defaults, SolveCfg,
    SolveReport,
};
// Results
pub use crate::classify::{Root, RootKind};
pub use crate::error::SolveError;
pub use crate::rect::SearchRect;
// Mesh stages (for diagnostics and benches)
pub use crate::classify::{build_triangles, classify, complete_candidates, regions, Region};
pub use crate::mesh::{build_mesh, Mesh};
pub use crate::quadrant::{quadrant, quadrant_delta};
pub use crate::refine::{refine_round, refinement_rounds, RoundStats};
// Sample functions
pub use crate::sample::{draw_rational, FactorCount, RationalCfg, RationalFn, ReplayToken};
pub use crate::C64;
