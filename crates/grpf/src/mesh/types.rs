//! Arena records for the hexagonal mesh.
//!
//! Kept small and `Copy` so that compaction passes can rebuild the arenas
//! without juggling borrows.

use crate::cfg::SIN_60;
use crate::quadrant::is_candidate_delta;
use crate::C64;

/// Identifier types (arena indices, stable between compactions).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriangleId(pub usize);

/// Quantized node coordinate (see `Mesh::key`).
pub type NodeKey = (i64, i64);

const UNIT: [C64; 6] = [
    C64::new(1.0, 0.0),
    C64::new(0.5, SIN_60),
    C64::new(-0.5, SIN_60),
    C64::new(-1.0, 0.0),
    C64::new(-0.5, -SIN_60),
    C64::new(0.5, -SIN_60),
];

/// One of the six lattice directions, numbered counter-clockwise from east.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Direction(u8);

impl Direction {
    pub const EAST: Direction = Direction(0);
    pub const SOUTH_WEST: Direction = Direction(4);
    pub const SOUTH_EAST: Direction = Direction(5);

    #[inline]
    pub fn new(k: usize) -> Self {
        Direction((k % 6) as u8)
    }
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
    /// `steps` sixth-turns counter-clockwise (negative = clockwise).
    #[inline]
    pub fn rotate(self, steps: i32) -> Self {
        Direction((self.0 as i32 + steps).rem_euclid(6) as u8)
    }
    #[inline]
    pub fn opposite(self) -> Self {
        self.rotate(3)
    }
    /// Unit step in this direction.
    #[inline]
    pub fn unit(self) -> C64 {
        UNIT[self.index()]
    }
    pub fn all() -> impl Iterator<Item = Direction> {
        (0..6).map(Direction::new)
    }
}

/// Side of a directed edge (looking from `node0` towards `node1`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
    #[inline]
    pub fn flip(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Mesh vertex: sample of `f` plus its six directional edge slots.
#[derive(Clone, Copy, Debug)]
pub struct Node {
    pub loc: C64,
    pub value: C64,
    pub quadrant: u8,
    pub edges: [Option<EdgeId>; 6],
}

impl Node {
    #[inline]
    pub fn slot(&self, dir: Direction) -> Option<EdgeId> {
        self.edges[dir.index()]
    }
    #[inline]
    pub fn degree(&self) -> usize {
        self.edges.iter().flatten().count()
    }
}

/// Directed lattice edge `node0 → node1` along `dir`.
#[derive(Clone, Copy, Debug)]
pub struct Edge {
    pub nodes: [NodeId; 2],
    pub dir: Direction,
    /// Wrapped quadrant step `q(node1) - q(node0)`.
    pub dq: i8,
    /// Generation in which the edge was created or last split.
    pub stamp: u32,
    /// Triangles on the left / right side; only populated by classification.
    pub triangles: [Option<TriangleId>; 2],
}

impl Edge {
    #[inline]
    pub fn is_candidate(&self) -> bool {
        is_candidate_delta(self.dq)
    }
    #[inline]
    pub fn is_new(&self, generation: u32) -> bool {
        self.stamp == generation
    }
    /// Direction in which this edge leaves `node`, if `node` is an endpoint.
    #[inline]
    pub fn dir_from(&self, node: NodeId) -> Option<Direction> {
        if self.nodes[0] == node {
            Some(self.dir)
        } else if self.nodes[1] == node {
            Some(self.dir.opposite())
        } else {
            None
        }
    }
    #[inline]
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if self.nodes[0] == node {
            Some(self.nodes[1])
        } else if self.nodes[1] == node {
            Some(self.nodes[0])
        } else {
            None
        }
    }
    #[inline]
    pub fn triangle(&self, side: Side) -> Option<TriangleId> {
        self.triangles[side.index()]
    }
    /// Vertex a counter-clockwise walk on `side` leaves this edge from.
    #[inline]
    pub fn start(&self, side: Side) -> NodeId {
        match side {
            Side::Left => self.nodes[0],
            Side::Right => self.nodes[1],
        }
    }
    /// Quadrant step seen when walking the edge with `side` on the left.
    #[inline]
    pub fn oriented_dq(&self, side: Side) -> i32 {
        match side {
            Side::Left => self.dq as i32,
            Side::Right => -(self.dq as i32),
        }
    }
}

/// Triangle as three `(edge, side)` pairs in counter-clockwise order.
#[derive(Clone, Copy, Debug)]
pub struct Triangle {
    pub sides: [(EdgeId, Side); 3],
}
