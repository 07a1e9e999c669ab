//! Numeric defaults for the mesh engine (internal).
//!
//! Policy
//! - Defaults are fixed constants; the few knobs callers legitimately tune
//!   (initial edge length, edge limit, re-triangulation depth) live in
//!   `SolveCfg` instead.

/// Live edge count above which a solve aborts. `0` disables the check.
pub const DEFAULT_EDGE_LIMIT: usize = 50_000;
/// Initial edge length = `min(width, height) / DEFAULT_GRID_DIVISIONS`.
pub const DEFAULT_GRID_DIVISIONS: f64 = 40.0;
/// Extra factor applied once precision had to grow to stay representable.
pub const PRECISION_SLACK: f64 = 1024.0;
/// Quantization cells per unit of precision (node dedup granularity).
pub const QUANT_CELLS_PER_PRECISION: f64 = 4.0;
/// Hop budget for chasing fine candidates across refined triangle sides.
pub const DEFAULT_RETRIANGULATION_DEPTH: usize = 6;
/// Completion passes before classification gives up on missing neighbors.
pub const MAX_COMPLETION_PASSES: usize = 4;
/// Largest quantized coordinate magnitude that stays exact in `f64`.
pub(crate) const MAX_EXACT_KEY: f64 = 4_503_599_627_370_496.0; // 2^52
/// sin(π/3): row spacing factor of the equilateral lattice.
pub const SIN_60: f64 = 0.866_025_403_784_438_6;
