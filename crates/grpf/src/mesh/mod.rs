//! Hexagonal sampling mesh.
//!
//! Purpose
//! - Hold every sample of `f` taken during a solve, deduplicated by a
//!   quantized coordinate, together with the lattice edges between them.
//!
//! Why this design
//! - All edges lie along one of six fixed directions and have length
//!   `L0 / 2^k`, so each node stores its incident edges in six direction
//!   slots. Rotational queries, quad completion and triangle recovery are
//!   then plain slot arithmetic.
//! - Arena vectors with index newtypes; compaction rebuilds them wholesale.
//! - A generation counter on the mesh plus a stamp per edge replaces
//!   per-edge "new" and "boundary" flags: an edge is new if its stamp
//!   equals the current generation.

mod build;
mod graph;
mod store;
mod types;

pub use build::{build_mesh, extend_mesh, raster_edges, raster_nodes, raster_shape};
pub use store::{quantize, Mesh};
pub use types::{Direction, Edge, EdgeId, Node, NodeId, NodeKey, Side, Triangle, TriangleId};
