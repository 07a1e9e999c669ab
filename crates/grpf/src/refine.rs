//! One refinement round: halve the edge length around every candidate edge.
//!
//! Purpose
//! - Bisect each candidate edge and rebuild the fine lattice on both
//!   triangles flanking it, so the next round again sees a closed band of
//!   equilateral triangles around every phase change.
//!
//! Why this design
//! - Each seed `(a, s)` describes a coarse edge `a → a + L·u(s)`. The fine
//!   lattice over its two flanking triangles is fixed by a short list of
//!   `(point, direction)` pairs; `ensure` makes each of them present at
//!   length `L/2`, splitting stale coarse edges it runs into.
//! - When a refined triangle side turns out to carry a candidate at the fine
//!   level, the triangle across that side is refined as well, up to a hop
//!   budget. This is what keeps roots sitting close to a coarse triangle
//!   boundary from losing half of their neighborhood.
//! - Everything not touched in the round is culled afterwards; only the
//!   neighborhood of phase changes survives.

use std::collections::HashSet;

use tracing::debug;

use crate::error::SolveError;
use crate::mesh::{Direction, EdgeId, Mesh, NodeKey};
use crate::C64;

/// Counters reported for one refinement round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoundStats {
    /// Candidate edges at the start of the round.
    pub candidates: usize,
    /// Coarse edges re-triangulated (seeds plus neighbors reached by hops).
    pub refined: usize,
    /// Live mesh after culling.
    pub nodes: usize,
    pub edges: usize,
}

/// Number of halvings needed to go from `initial_edge_len` down to `precision`.
pub fn refinement_rounds(initial_edge_len: f64, precision: f64) -> u32 {
    if initial_edge_len > precision {
        // Exact powers of two must not round up to an extra round.
        ((initial_edge_len / precision).log2() - 1e-9).ceil().max(0.0) as u32
    } else {
        0
    }
}

struct Seed {
    start: C64,
    dir: Direction,
    depth: usize,
}

struct Round<'m, 'f> {
    mesh: &'m mut Mesh<'f>,
    coarse: f64,
    fine: f64,
    generation: u32,
}

impl Round<'_, '_> {
    #[inline]
    fn step(&self, p: C64, dir: Direction, len: f64) -> C64 {
        p + dir.unit() * len
    }

    fn split_if_stale(&mut self, e: EdgeId) -> Result<(), SolveError> {
        if !self.mesh.edge(e).is_new(self.generation) {
            self.mesh.split(e)?;
        }
        Ok(())
    }

    /// Make the fine edge `p → p + fine·u(dir)` present and current.
    ///
    /// If a longer edge occupies either endpoint's slot it is split (once per
    /// round); an edge already refreshed this round is left alone.
    fn ensure(&mut self, p: C64, dir: Direction) -> Result<(), SolveError> {
        let n = self.mesh.insert(p);
        if let Some(e) = self.mesh.node(n).slot(dir) {
            return self.split_if_stale(e);
        }
        let q = self.step(p, dir, self.fine);
        let m = self.mesh.insert(q);
        if let Some(e) = self.mesh.node(m).slot(dir.opposite()) {
            return self.split_if_stale(e);
        }
        self.mesh.connect(n, m, dir)?;
        Ok(())
    }

    /// Whether the fine edges meeting at `mid` along `dir` carry a candidate.
    fn hot(&self, mid: C64, dir: Direction) -> bool {
        let Some(n) = self.mesh.find(mid) else {
            return false;
        };
        let node = self.mesh.node(n);
        [dir, dir.opposite()]
            .into_iter()
            .filter_map(|d| node.slot(d))
            .any(|e| self.mesh.edge(e).is_candidate())
    }

    /// Rebuild the fine lattice over both triangles flanking `a → a + L·u(s)`.
    /// Returns the triangle sides `(start, dir, midpoint)` that were refined.
    fn retriangulate(&mut self, a: C64, s: Direction) -> Result<[(C64, Direction, C64); 4], SolveError> {
        let b = self.step(a, s, self.coarse);
        let m = self.step(a, s, self.fine);
        self.ensure(a, s)?;
        self.ensure(m, s)?;
        let mut sides = [(a, s, m); 4];
        for (i, turn) in [1, -1].into_iter().enumerate() {
            let to_apex = s.rotate(turn);
            let from_b = s.rotate(2 * turn);
            let mac = self.step(a, to_apex, self.fine);
            let mbc = self.step(b, from_b, self.fine);
            self.ensure(a, to_apex)?;
            self.ensure(mac, to_apex)?;
            self.ensure(b, from_b)?;
            self.ensure(mbc, from_b)?;
            self.ensure(m, from_b)?;
            self.ensure(m, to_apex)?;
            self.ensure(mac, s)?;
            sides[2 * i] = (a, to_apex, mac);
            sides[2 * i + 1] = (b, from_b, mbc);
        }
        Ok(sides)
    }
}

/// Run one round at coarse edge length `coarse`; afterwards every live edge
/// has length `coarse / 2`.
///
/// `max_depth` bounds how far re-triangulation follows fine candidates into
/// neighboring coarse triangles.
pub fn refine_round(mesh: &mut Mesh<'_>, coarse: f64, max_depth: usize) -> Result<RoundStats, SolveError> {
    let generation = mesh.advance_generation();
    mesh.check_edge_limit()?;
    let candidates = mesh.partition_candidates();
    let seeds: Vec<(C64, Direction)> = (0..candidates)
        .map(|i| {
            let edge = mesh.edge(EdgeId(i));
            (mesh.node(edge.nodes[0]).loc, edge.dir)
        })
        .collect();
    for i in 0..candidates {
        mesh.split(EdgeId(i))?;
    }

    let mut round = Round {
        mesh,
        coarse,
        fine: coarse * 0.5,
        generation,
    };
    let mut work: Vec<Seed> = seeds
        .into_iter()
        .rev()
        .map(|(start, dir)| Seed { start, dir, depth: 0 })
        .collect();
    let mut done: HashSet<NodeKey> = HashSet::new();
    let mut refined = 0usize;
    while let Some(Seed { start, dir, depth }) = work.pop() {
        let key = round.mesh.key(round.step(start, dir, round.fine));
        if !done.insert(key) {
            continue;
        }
        refined += 1;
        let sides = round.retriangulate(start, dir)?;
        if depth < max_depth {
            for (side_start, side_dir, mid) in sides {
                if round.hot(mid, side_dir) {
                    work.push(Seed {
                        start: side_start,
                        dir: side_dir,
                        depth: depth + 1,
                    });
                }
            }
        }
    }

    round.mesh.retain_edges(|e| e.is_new(generation));
    let stats = RoundStats {
        candidates,
        refined,
        nodes: round.mesh.nodes().len(),
        edges: round.mesh.edges().len(),
    };
    debug!(
        generation,
        candidates = stats.candidates,
        refined = stats.refined,
        nodes = stats.nodes,
        edges = stats.edges,
        "refine round"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_mesh;
    use crate::rect::SearchRect;

    #[test]
    fn round_count_matches_halvings() {
        assert_eq!(refinement_rounds(1.0, 1.0), 0);
        assert_eq!(refinement_rounds(0.5, 1.0), 0);
        assert_eq!(refinement_rounds(1.0, 0.5), 1);
        assert_eq!(refinement_rounds(1.0, 0.25), 2);
        assert_eq!(refinement_rounds(1.0, 0.3), 2);
        assert_eq!(refinement_rounds(0.05, 1e-6), 16);
    }

    fn refined_mesh<'f>(f: &'f dyn Fn(C64) -> C64, rounds: u32, depth: usize) -> (Mesh<'f>, f64) {
        let rect = SearchRect::from_corners(C64::new(-1.0, -1.0), C64::new(1.0, 1.0)).unwrap();
        let mut step = 0.2;
        let mut mesh = Mesh::new(f, rect.upper_left(), step / 2f64.powi(rounds as i32), 0);
        build_mesh(&mut mesh, &rect, step).unwrap();
        for _ in 0..rounds {
            refine_round(&mut mesh, step, depth).unwrap();
            step *= 0.5;
        }
        (mesh, step)
    }

    #[test]
    fn round_halves_every_live_edge() {
        let f = |z: C64| z - C64::new(0.13, -0.07);
        let (mesh, step) = refined_mesh(&f, 3, 6);
        assert!(!mesh.edges().is_empty());
        for e in mesh.edge_ids() {
            let (p, q) = mesh.endpoints(e);
            assert!(((p - q).norm() - step).abs() < 1e-9, "edge length {}", (p - q).norm());
            assert!(mesh.edge(e).is_new(mesh.generation()));
        }
    }

    #[test]
    fn surviving_mesh_hugs_the_root() {
        let root = C64::new(0.13, -0.07);
        let f = move |z: C64| z - root;
        let (mesh, step) = refined_mesh(&f, 4, 6);
        let candidates: Vec<EdgeId> = mesh.edge_ids().filter(|&e| mesh.edge(e).is_candidate()).collect();
        assert!(!candidates.is_empty());
        for e in candidates {
            let (p, q) = mesh.endpoints(e);
            let d = ((p + q) * 0.5 - root).norm();
            assert!(d < 4.0 * step, "candidate {d} away from the root");
        }
    }

    #[test]
    fn no_candidates_culls_everything() {
        let f = |_: C64| C64::new(1.0, 1.0);
        let (mesh, _) = refined_mesh(&f, 1, 6);
        assert!(mesh.edges().is_empty());
        assert!(mesh.nodes().is_empty());
    }

    #[test]
    fn edge_limit_is_enforced_during_refinement() {
        let f = |z: C64| z;
        let rect = SearchRect::from_corners(C64::new(-1.0, -1.0), C64::new(1.0, 1.0)).unwrap();
        let mut mesh = Mesh::new(&f, rect.upper_left(), 1e-4, 0);
        build_mesh(&mut mesh, &rect, 0.2).unwrap();
        let live = mesh.edges().len();
        let mut capped = Mesh::new(&f, rect.upper_left(), 1e-4, live);
        build_mesh(&mut capped, &rect, 0.2).unwrap();
        let err = refine_round(&mut capped, 0.2, 6).unwrap_err();
        assert!(matches!(err, SolveError::EdgeLimitExceeded { limit, .. } if limit == live));
    }
}
