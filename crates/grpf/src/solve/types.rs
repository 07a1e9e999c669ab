//! Configuration and diagnostics for a solve.

use crate::cfg::{DEFAULT_EDGE_LIMIT, DEFAULT_RETRIANGULATION_DEPTH};
use crate::classify::Root;
use crate::refine::RoundStats;

/// Solve configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveCfg {
    /// Edge length of the initial lattice. `None` (or a non-positive or
    /// non-finite value) picks `min(width, height) / 40`.
    pub initial_edge_len: Option<f64>,
    /// Live edge count above which the solve aborts. `0` = unlimited.
    pub edge_limit: usize,
    /// Hops re-triangulation may follow fine candidates into neighboring
    /// coarse triangles within one round.
    pub max_retriangulation_depth: usize,
}

impl Default for SolveCfg {
    fn default() -> Self {
        Self {
            initial_edge_len: None,
            edge_limit: DEFAULT_EDGE_LIMIT,
            max_retriangulation_depth: DEFAULT_RETRIANGULATION_DEPTH,
        }
    }
}

impl SolveCfg {
    pub fn with_initial_edge_len(mut self, len: f64) -> Self {
        self.initial_edge_len = Some(len);
        self
    }
    pub fn with_edge_limit(mut self, limit: usize) -> Self {
        self.edge_limit = limit;
        self
    }
    pub fn with_max_retriangulation_depth(mut self, depth: usize) -> Self {
        self.max_retriangulation_depth = depth;
        self
    }
}

/// Roots plus the numbers that explain how they were obtained.
#[derive(Clone, Debug, PartialEq)]
pub struct SolveReport {
    pub roots: Vec<Root>,
    /// Precision as requested by the caller.
    pub requested_precision: f64,
    /// Final edge length actually reached (`initial_edge_len / 2^rounds`).
    pub precision: f64,
    /// Whether the requested precision had to be coarsened to stay
    /// representable around the search region.
    pub precision_grown: bool,
    pub initial_edge_len: f64,
    pub rounds: u32,
    pub per_round: Vec<RoundStats>,
    /// Distinct samples of `f`.
    pub evaluations: usize,
    /// Mesh size at classification time.
    pub nodes: usize,
    pub edges: usize,
    pub triangles: usize,
}
