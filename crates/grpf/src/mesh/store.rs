//! Mesh arenas and the quantized node store.
//!
//! Nodes are deduplicated by a quantized coordinate: two insertions that land
//! in the same cell of side `precision / 4` (measured from the anchor) return
//! the same node, whatever the call order. This is what lets independently
//! built pieces of the mesh merge without an explicit adjacency search.

use std::collections::HashMap;

use crate::cfg::QUANT_CELLS_PER_PRECISION;
use crate::error::SolveError;
use crate::quadrant::quadrant;
use crate::C64;

use super::types::{Edge, EdgeId, Node, NodeId, NodeKey, Triangle, TriangleId};

/// Quantization key of `loc` relative to `anchor` for the given precision.
#[inline]
pub fn quantize(loc: C64, anchor: C64, precision: f64) -> NodeKey {
    let scale = QUANT_CELLS_PER_PRECISION / precision;
    let d = loc - anchor;
    ((d.re * scale).round() as i64, (d.im * scale).round() as i64)
}

/// Working mesh for one solve: node store, edge graph, triangles.
pub struct Mesh<'f> {
    f: &'f dyn Fn(C64) -> C64,
    pub(super) nodes: Vec<Node>,
    pub(super) edges: Vec<Edge>,
    pub(super) triangles: Vec<Triangle>,
    index: HashMap<NodeKey, NodeId>,
    anchor: C64,
    precision: f64,
    edge_limit: usize,
    generation: u32,
    evaluations: usize,
}

impl<'f> Mesh<'f> {
    /// Empty mesh sampling `f`, quantizing relative to `anchor`.
    ///
    /// `edge_limit == 0` disables the live edge check.
    pub fn new(f: &'f dyn Fn(C64) -> C64, anchor: C64, precision: f64, edge_limit: usize) -> Self {
        Self {
            f,
            nodes: Vec::new(),
            edges: Vec::new(),
            triangles: Vec::new(),
            index: HashMap::new(),
            anchor,
            precision,
            edge_limit,
            generation: 0,
            evaluations: 0,
        }
    }

    #[inline]
    pub fn key(&self, loc: C64) -> NodeKey {
        quantize(loc, self.anchor, self.precision)
    }

    /// Node at `loc`'s cell, evaluating `f` and classifying it on first touch.
    pub fn insert(&mut self, loc: C64) -> NodeId {
        let key = self.key(loc);
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let value = (self.f)(loc);
        self.evaluations += 1;
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            loc,
            value,
            quadrant: quadrant(value),
            edges: [None; 6],
        });
        self.index.insert(key, id);
        id
    }

    /// Existing node in `loc`'s cell, without sampling.
    #[inline]
    pub fn find(&self, loc: C64) -> Option<NodeId> {
        self.index.get(&self.key(loc)).copied()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }
    #[inline]
    pub fn triangle(&self, id: TriangleId) -> &Triangle {
        &self.triangles[id.0]
    }
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> {
        (0..self.edges.len()).map(EdgeId)
    }
    #[inline]
    pub fn anchor(&self) -> C64 {
        self.anchor
    }
    #[inline]
    pub fn precision(&self) -> f64 {
        self.precision
    }
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }
    /// Number of `f` evaluations so far.
    #[inline]
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Start a new refinement round; edges stamped earlier count as old.
    pub fn advance_generation(&mut self) -> u32 {
        self.generation += 1;
        self.generation
    }

    /// Fail once the live edge count passes the limit (if any).
    pub fn check_edge_limit(&self) -> Result<(), SolveError> {
        if self.edge_limit > 0 && self.edges.len() > self.edge_limit {
            return Err(SolveError::EdgeLimitExceeded {
                limit: self.edge_limit,
                live: self.edges.len(),
            });
        }
        Ok(())
    }

    /// Reorder (and possibly drop) edges: `order[new] = old`. Node slots follow.
    pub(super) fn permute_edges(&mut self, order: &[usize]) {
        let mut remap: Vec<Option<EdgeId>> = vec![None; self.edges.len()];
        for (new, &old) in order.iter().enumerate() {
            remap[old] = Some(EdgeId(new));
        }
        self.edges = order.iter().map(|&old| self.edges[old]).collect();
        for node in self.nodes.iter_mut() {
            for slot in node.edges.iter_mut() {
                *slot = slot.and_then(|e| remap[e.0]);
            }
        }
        // Triangles reference edges by index; they never survive a permutation.
        self.triangles.clear();
        for edge in self.edges.iter_mut() {
            edge.triangles = [None; 2];
        }
    }

    /// Drop nodes without edges and rebuild the quantized index.
    pub(super) fn drop_isolated_nodes(&mut self) {
        let mut remap: Vec<Option<NodeId>> = vec![None; self.nodes.len()];
        let mut kept = Vec::with_capacity(self.nodes.len());
        for (old, node) in self.nodes.iter().enumerate() {
            if node.degree() > 0 {
                remap[old] = Some(NodeId(kept.len()));
                kept.push(*node);
            }
        }
        self.nodes = kept;
        for edge in self.edges.iter_mut() {
            for n in edge.nodes.iter_mut() {
                // Endpoints of a live edge always have degree >= 1.
                if let Some(id) = remap[n.0] {
                    *n = id;
                }
            }
        }
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (quantize(node.loc, self.anchor, self.precision), NodeId(i)))
            .collect();
    }
}

impl std::fmt::Debug for Mesh<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mesh")
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .field("triangles", &self.triangles.len())
            .field("precision", &self.precision)
            .field("generation", &self.generation)
            .finish()
    }
}
