//! Edge graph operations on top of the node store.
//!
//! Every node carries one slot per lattice direction, so "the next edge
//! counter-clockwise around a node" is a slot lookup rather than an angular
//! sort. Edges are directed; an edge `a → b` along `d` occupies slot `d` of
//! `a` and slot `d + 3` of `b`.

use crate::error::SolveError;
use crate::quadrant::quadrant_delta;
use crate::C64;

use super::store::Mesh;
use super::types::{Direction, Edge, EdgeId, NodeId, Side, Triangle, TriangleId};

impl Mesh<'_> {
    fn delta(&self, a: NodeId, b: NodeId) -> i8 {
        quadrant_delta(self.nodes[a.0].quadrant, self.nodes[b.0].quadrant)
    }

    /// Edge `a → b` along `dir`, reusing whatever already occupies `a`'s slot.
    ///
    /// The caller guarantees that `b` sits one step from `a` along `dir`.
    pub fn connect(&mut self, a: NodeId, b: NodeId, dir: Direction) -> Result<EdgeId, SolveError> {
        if let Some(existing) = self.nodes[a.0].slot(dir) {
            return Ok(existing);
        }
        let id = EdgeId(self.edges.len());
        let dq = self.delta(a, b);
        self.edges.push(Edge {
            nodes: [a, b],
            dir,
            dq,
            stamp: self.generation(),
            triangles: [None; 2],
        });
        self.nodes[a.0].edges[dir.index()] = Some(id);
        let back = dir.opposite().index();
        debug_assert!(self.nodes[b.0].edges[back].is_none(), "slot clash at {:?}", self.nodes[b.0].loc);
        self.nodes[b.0].edges[back] = Some(id);
        self.check_edge_limit()?;
        Ok(id)
    }

    /// Bisect `e` in place: `e` keeps `node0` and ends at the new midpoint,
    /// a fresh edge covers the second half. Both halves carry the current stamp.
    pub fn split(&mut self, e: EdgeId) -> Result<NodeId, SolveError> {
        let Edge { nodes: [a, b], dir, .. } = self.edges[e.0];
        let mid_loc = (self.nodes[a.0].loc + self.nodes[b.0].loc) * 0.5;
        let mid = self.insert(mid_loc);
        let back = dir.opposite().index();
        self.nodes[b.0].edges[back] = None;
        let dq = self.delta(a, mid);
        let generation = self.generation();
        let edge = &mut self.edges[e.0];
        edge.nodes[1] = mid;
        edge.dq = dq;
        edge.stamp = generation;
        debug_assert!(self.nodes[mid.0].edges[back].is_none());
        self.nodes[mid.0].edges[back] = Some(e);
        self.connect(mid, b, dir)?;
        Ok(mid)
    }

    /// Next edge counter-clockwise from `e` around `node` (one sixth-turn).
    pub fn next_counterclockwise(&self, e: EdgeId, node: NodeId) -> Option<EdgeId> {
        let dir = self.edges[e.0].dir_from(node)?;
        self.nodes[node.0].slot(dir.rotate(1))
    }

    /// Next edge clockwise from `e` around `node` (one sixth-turn).
    pub fn next_clockwise(&self, e: EdgeId, node: NodeId) -> Option<EdgeId> {
        let dir = self.edges[e.0].dir_from(node)?;
        self.nodes[node.0].slot(dir.rotate(-1))
    }

    /// Move candidate edges to the front, preserving relative order, and
    /// return how many there are.
    pub fn partition_candidates(&mut self) -> usize {
        let (mut order, rest): (Vec<usize>, Vec<usize>) =
            (0..self.edges.len()).partition(|&i| self.edges[i].is_candidate());
        let k = order.len();
        order.extend(rest);
        self.permute_edges(&order);
        k
    }

    /// Keep only edges matching `keep`, then drop nodes left without edges.
    pub fn retain_edges(&mut self, mut keep: impl FnMut(&Edge) -> bool) {
        let order: Vec<usize> = (0..self.edges.len())
            .filter(|&i| keep(&self.edges[i]))
            .collect();
        self.permute_edges(&order);
        self.drop_isolated_nodes();
    }

    /// Add the two equilateral triangles flanking `e` (edge length `step`).
    pub fn complete_quad(&mut self, e: EdgeId, step: f64) -> Result<(), SolveError> {
        let Edge { nodes: [a, b], dir, .. } = self.edges[e.0];
        let origin = self.nodes[a.0].loc;
        for turn in [1, -1] {
            let apex = self.insert(origin + dir.rotate(turn).unit() * step);
            self.connect(a, apex, dir.rotate(turn))?;
            self.connect(b, apex, dir.rotate(2 * turn))?;
        }
        Ok(())
    }

    /// Whether both triangles flanking `e` already have all their edges.
    pub fn has_complete_quad(&self, e: EdgeId) -> bool {
        let Edge { nodes: [a, b], dir, .. } = self.edges[e.0];
        let (na, nb) = (&self.nodes[a.0], &self.nodes[b.0]);
        na.slot(dir.rotate(1)).is_some()
            && nb.slot(dir.rotate(2)).is_some()
            && na.slot(dir.rotate(-1)).is_some()
            && nb.slot(dir.rotate(-2)).is_some()
    }

    /// Side of `e` that a counter-clockwise walk leaving `from` runs along.
    pub fn side_from(&self, e: EdgeId, from: NodeId) -> Side {
        if self.edges[e.0].nodes[0] == from {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Record a triangle and attach it to its three edges. Returns `None`
    /// (and changes nothing) if any of those sides is already taken.
    pub fn add_triangle(&mut self, sides: [(EdgeId, Side); 3]) -> Option<TriangleId> {
        if sides
            .iter()
            .any(|&(e, side)| self.edges[e.0].triangle(side).is_some())
        {
            return None;
        }
        let id = TriangleId(self.triangles.len());
        self.triangles.push(Triangle { sides });
        for (e, side) in sides {
            self.edges[e.0].triangles[side.index()] = Some(id);
        }
        Some(id)
    }

    /// Endpoint locations of `e`.
    pub fn endpoints(&self, e: EdgeId) -> (C64, C64) {
        let [a, b] = self.edges[e.0].nodes;
        (self.nodes[a.0].loc, self.nodes[b.0].loc)
    }
}
