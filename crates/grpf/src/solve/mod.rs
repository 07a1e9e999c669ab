//! Solve orchestration: from corners and precision to classified roots.
//!
//! Purpose
//! - Validate the request, pick the working precision and initial edge
//!   length, then run build → refine rounds → classify on a fresh mesh.
//!
//! Why this design
//! - The working precision is snapped to `initial_edge_len / 2^rounds`, so
//!   every lattice point created during refinement sits a whole number of
//!   quantization cells away from the anchor (the upper-left corner). Nodes
//!   reached along different paths then always land in the same cell.
//! - Precision that `f64` cannot resolve near the region's extremes is grown
//!   before anything is sampled instead of being reported as an error.
//! - Any failure discards the whole mesh; there are no partial results.

mod types;

use tracing::{debug, info};

use crate::cfg::{DEFAULT_GRID_DIVISIONS, MAX_EXACT_KEY, PRECISION_SLACK, QUANT_CELLS_PER_PRECISION};
use crate::classify::{classify, Root};
use crate::error::SolveError;
use crate::mesh::{build_mesh, Mesh};
use crate::rect::SearchRect;
use crate::refine::{refine_round, refinement_rounds};
use crate::C64;

pub use types::{SolveCfg, SolveReport};

/// Whether quantizing at `precision` breaks down at `coord` (measured from `anchor`).
fn collides(coord: f64, anchor: f64, precision: f64) -> bool {
    let key = ((coord - anchor) * QUANT_CELLS_PER_PRECISION / precision).abs();
    let resolved = ((coord + precision) - coord - precision).abs();
    !(key < MAX_EXACT_KEY) || !(resolved <= precision / 8.0)
}

/// Coarsen `precision` until half of it stays resolvable at every extreme of
/// `rect`. Returns the (possibly unchanged) precision and whether it grew.
pub fn grow_precision(rect: &SearchRect, precision: f64) -> (f64, bool) {
    let mut p = precision;
    let mut grown = false;
    while p.is_finite()
        && rect
            .extremes()
            .iter()
            .any(|&(coord, anchor)| collides(coord, anchor, p * 0.5))
    {
        p *= 2.0;
        grown = true;
    }
    if grown {
        p *= PRECISION_SLACK;
        debug!(requested = precision, grown_to = p, "precision grown");
    }
    (p, grown)
}

/// Initial lattice edge length: the configured value if usable, else
/// `min(width, height) / 40`.
pub fn initial_edge_len(rect: &SearchRect, cfg: &SolveCfg) -> f64 {
    match cfg.initial_edge_len {
        Some(len) if len.is_finite() && len > 0.0 => len,
        _ => rect.min_side() / DEFAULT_GRID_DIVISIONS,
    }
}

/// Full solve with diagnostics.
pub fn solve_report(
    upper_left: C64,
    lower_right: C64,
    precision: f64,
    f: impl Fn(C64) -> C64,
    cfg: &SolveCfg,
) -> Result<SolveReport, SolveError> {
    let rect = SearchRect::from_corners(upper_left, lower_right)?;
    if !precision.is_finite() || precision <= 0.0 {
        return Err(SolveError::InvalidPrecision(precision));
    }
    let (target, precision_grown) = grow_precision(&rect, precision);
    let initial = initial_edge_len(&rect, cfg);
    let rounds = refinement_rounds(initial, target);
    let working = initial / 2f64.powi(rounds as i32);

    let f: &dyn Fn(C64) -> C64 = &f;
    let mut mesh = Mesh::new(f, rect.upper_left(), working, cfg.edge_limit);
    build_mesh(&mut mesh, &rect, initial)?;
    let mut step = initial;
    let mut per_round = Vec::with_capacity(rounds as usize);
    for _ in 0..rounds {
        per_round.push(refine_round(&mut mesh, step, cfg.max_retriangulation_depth)?);
        step *= 0.5;
    }

    let roots = classify(&mut mesh, step)?;
    info!(
        roots = roots.len(),
        rounds,
        precision = working,
        evaluations = mesh.evaluations(),
        edges = mesh.edges().len(),
        "solve"
    );
    Ok(SolveReport {
        roots,
        requested_precision: precision,
        precision: working,
        precision_grown,
        initial_edge_len: initial,
        rounds,
        per_round,
        evaluations: mesh.evaluations(),
        nodes: mesh.nodes().len(),
        edges: mesh.edges().len(),
        triangles: mesh.triangles().len(),
    })
}

/// Every zero and pole of `f` inside the rectangle spanned by the two corners.
///
/// Corners may be given in any order. `precision` is the final mesh edge
/// length; reported locations are accurate to about that much.
pub fn solve(
    upper_left: C64,
    lower_right: C64,
    precision: f64,
    f: impl Fn(C64) -> C64,
    cfg: &SolveCfg,
) -> Result<Vec<Root>, SolveError> {
    solve_report(upper_left, lower_right, precision, f, cfg).map(|r| r.roots)
}

/// `solve` with `SolveCfg::default()`.
pub fn solve_with_defaults(
    upper_left: C64,
    lower_right: C64,
    precision: f64,
    f: impl Fn(C64) -> C64,
) -> Result<Vec<Root>, SolveError> {
    solve(upper_left, lower_right, precision, f, &SolveCfg::default())
}

#[cfg(test)]
mod tests;
