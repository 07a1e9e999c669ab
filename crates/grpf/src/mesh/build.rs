//! Initial tiling of the search rectangle.
//!
//! Rows of nodes `step * sin 60°` apart, odd rows shifted by half a step,
//! wired east / south-west / south-east. One extension pass then completes
//! the quad around every edge so that the lattice reaches one step past the
//! rectangle on every side.

use tracing::debug;

use crate::cfg::SIN_60;
use crate::error::SolveError;
use crate::rect::SearchRect;
use crate::C64;

use super::store::Mesh;
use super::types::{Direction, EdgeId, NodeId};

/// Row and column counts of the raster for `rect` at edge length `step`.
pub fn raster_shape(rect: &SearchRect, step: f64) -> (usize, usize) {
    let rows = (rect.height() / (step * SIN_60)).ceil() as usize + 1;
    let cols = (rect.width() / step).ceil() as usize + 1;
    (rows, cols)
}

/// Sample the raster nodes (no edges yet).
pub fn raster_nodes(mesh: &mut Mesh<'_>, rect: &SearchRect, step: f64) -> Vec<NodeId> {
    let (rows, cols) = raster_shape(rect, step);
    let mut ids = Vec::with_capacity(rows * cols);
    for j in 0..rows {
        let shift = if j % 2 == 1 { step * 0.5 } else { 0.0 };
        let im = rect.im_max - j as f64 * step * SIN_60;
        for i in 0..cols {
            let re = rect.re_min + i as f64 * step + shift;
            ids.push(mesh.insert(C64::new(re, im)));
        }
    }
    ids
}

/// Connect every raster node to its east, south-west and south-east neighbor.
pub fn raster_edges(mesh: &mut Mesh<'_>, nodes: &[NodeId], step: f64) -> Result<(), SolveError> {
    for &n in nodes {
        let loc = mesh.node(n).loc;
        for dir in [Direction::EAST, Direction::SOUTH_WEST, Direction::SOUTH_EAST] {
            if let Some(m) = mesh.find(loc + dir.unit() * step) {
                mesh.connect(n, m, dir)?;
            }
        }
    }
    Ok(())
}

/// Complete the quad of every edge present at entry (one ring of padding).
pub fn extend_mesh(mesh: &mut Mesh<'_>, step: f64) -> Result<(), SolveError> {
    let count = mesh.edges().len();
    for e in 0..count {
        mesh.complete_quad(EdgeId(e), step)?;
    }
    Ok(())
}

/// Build the padded initial lattice for `rect`.
pub fn build_mesh(mesh: &mut Mesh<'_>, rect: &SearchRect, step: f64) -> Result<(), SolveError> {
    let nodes = raster_nodes(mesh, rect, step);
    raster_edges(mesh, &nodes, step)?;
    extend_mesh(mesh, step)?;
    debug!(
        nodes = mesh.nodes().len(),
        edges = mesh.edges().len(),
        step,
        "initial mesh"
    );
    Ok(())
}
