//! Region classification: from surviving candidate edges to `(location, order)`.
//!
//! Purpose
//! - Recover the triangles bordering every candidate edge, group them into
//!   connected regions and read each region's winding number off its
//!   boundary.
//!
//! Why this design
//! - The quadrant step summed counter-clockwise around a closed boundary is
//!   four times the number of zeros minus poles enclosed (discrete argument
//!   principle), so the order needs no extra evaluations of `f`.
//! - Regions connect through shared edges and through shared vertices. Two
//!   triangles touching only at a corner near a multiple root still belong
//!   to the same root.
//!
//! References
//! - P. Kowalczyk, "Global complex roots and poles finding algorithm based
//!   on phase analysis for propagation and radiation problems", IEEE TAP 2018.

use tracing::{debug, warn};

use crate::cfg::MAX_COMPLETION_PASSES;
use crate::error::SolveError;
use crate::mesh::{Edge, EdgeId, Mesh, NodeId, Side, TriangleId};
use crate::C64;

/// What a root's order says about it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RootKind {
    Zero,
    Pole,
    /// Equal zero and pole weight inside one region.
    Ambiguous,
}

/// A zero (`order > 0`), pole (`order < 0`) or ambiguous region (`order == 0`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Root {
    pub location: C64,
    pub order: i32,
}

impl Root {
    pub fn kind(&self) -> RootKind {
        match self.order {
            o if o > 0 => RootKind::Zero,
            o if o < 0 => RootKind::Pole,
            _ => RootKind::Ambiguous,
        }
    }
}

impl std::fmt::Display for Root {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} of order {} at {:+.12e}{:+.12e}i",
            self.kind(),
            self.order.abs(),
            self.location.re,
            self.location.im
        )
    }
}

/// Connected set of triangles and the sums taken over its boundary.
#[derive(Clone, Debug, Default)]
pub struct Region {
    pub triangles: Vec<TriangleId>,
    /// Sum of both endpoints of every boundary edge.
    pub boundary_sum: C64,
    pub boundary_edges: usize,
    /// Quadrant steps along the boundary, walked with the region on the left.
    pub dq_sum: i32,
}

impl Region {
    pub fn root(&self) -> Root {
        debug_assert!(self.dq_sum % 4 == 0, "boundary dq sum {} is not a multiple of 4", self.dq_sum);
        let location = if self.boundary_edges == 0 {
            C64::new(f64::NAN, f64::NAN)
        } else {
            self.boundary_sum / (2.0 * self.boundary_edges as f64)
        };
        Root {
            location,
            order: self.dq_sum / 4,
        }
    }
}

/// Make sure every candidate edge has both flanking triangles' edges.
///
/// Returns the number of completion passes used. Gives up (with a warning)
/// after `MAX_COMPLETION_PASSES`.
pub fn complete_candidates(mesh: &mut Mesh<'_>, step: f64) -> Result<usize, SolveError> {
    let mut passes = 0;
    loop {
        let missing: Vec<EdgeId> = mesh
            .edge_ids()
            .filter(|&e| mesh.edge(e).is_candidate() && !mesh.has_complete_quad(e))
            .collect();
        if missing.is_empty() {
            return Ok(passes);
        }
        if passes == MAX_COMPLETION_PASSES {
            warn!(missing = missing.len(), passes, "candidate neighborhood still incomplete");
            return Ok(passes);
        }
        for e in missing {
            mesh.complete_quad(e, step)?;
        }
        passes += 1;
    }
}

/// Counter-clockwise `(edge, side)` ring of the triangle on `side` of `e`.
fn triangle_ring(mesh: &Mesh<'_>, e: EdgeId, side: Side) -> Option<[(EdgeId, Side); 3]> {
    let Edge { nodes: [a, b], .. } = *mesh.edge(e);
    let ring: [(NodeId, EdgeId); 3] = match side {
        Side::Left => {
            let to_apex = mesh.next_counterclockwise(e, a)?;
            let apex = mesh.edge(to_apex).other(a)?;
            let across = mesh.next_clockwise(e, b)?;
            [(a, e), (b, across), (apex, to_apex)]
        }
        Side::Right => {
            let to_apex = mesh.next_clockwise(e, a)?;
            let apex = mesh.edge(to_apex).other(a)?;
            let across = mesh.next_counterclockwise(e, b)?;
            [(a, to_apex), (apex, across), (b, e)]
        }
    };
    Some(ring.map(|(from, edge)| (edge, mesh.side_from(edge, from))))
}

/// Build the (at most two) triangles bordering every candidate edge.
pub fn build_triangles(mesh: &mut Mesh<'_>) -> usize {
    let candidates: Vec<EdgeId> = mesh.edge_ids().filter(|&e| mesh.edge(e).is_candidate()).collect();
    for e in candidates {
        for side in [Side::Left, Side::Right] {
            if mesh.edge(e).triangle(side).is_some() {
                continue;
            }
            if let Some(ring) = triangle_ring(mesh, e, side) {
                mesh.add_triangle(ring);
            }
        }
    }
    mesh.triangles().len()
}

/// Flood-fill triangles into regions (shared edges or shared vertices).
pub fn regions(mesh: &Mesh<'_>) -> Vec<Region> {
    let triangles = mesh.triangles();
    let mut by_node: Vec<Vec<TriangleId>> = vec![Vec::new(); mesh.nodes().len()];
    for (t, tri) in triangles.iter().enumerate() {
        for &(e, side) in &tri.sides {
            by_node[mesh.edge(e).start(side).0].push(TriangleId(t));
        }
    }

    let mut seen = vec![false; triangles.len()];
    let mut out = Vec::new();
    for first in 0..triangles.len() {
        if seen[first] {
            continue;
        }
        seen[first] = true;
        let mut region = Region::default();
        let mut stack = vec![TriangleId(first)];
        while let Some(t) = stack.pop() {
            region.triangles.push(t);
            for &(e, side) in &mesh.triangle(t).sides {
                let edge = mesh.edge(e);
                for &u in &by_node[edge.start(side).0] {
                    if !seen[u.0] {
                        seen[u.0] = true;
                        stack.push(u);
                    }
                }
                if edge.triangle(side.flip()).is_none() {
                    let (p, q) = mesh.endpoints(e);
                    region.boundary_sum += p + q;
                    region.boundary_edges += 1;
                    region.dq_sum += edge.oriented_dq(side);
                }
            }
        }
        out.push(region);
    }
    out
}

/// Classify the refined mesh at final edge length `step`.
pub fn classify(mesh: &mut Mesh<'_>, step: f64) -> Result<Vec<Root>, SolveError> {
    let passes = complete_candidates(mesh, step)?;
    let triangles = build_triangles(mesh);
    let regions = regions(mesh);
    debug!(passes, triangles, regions = regions.len(), "classified");
    Ok(regions.iter().map(Region::root).collect())
}
