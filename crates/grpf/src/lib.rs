//! Global complex root and pole finding (phase analysis on a hexagonal mesh).
//!
//! Given a meromorphic `f`, a rectangle and a target precision, [`solve`]
//! returns every zero and pole of `f` inside the rectangle together with its
//! signed order (positive = zero multiplicity, negative = pole order).
//!
//! Pipeline
//! - `mesh`: quantized node store, six-direction edge graph, initial tiling.
//! - `refine`: bisect candidate edges (`|dq| = 2`) and re-triangulate their
//!   neighborhood, culling everything else each round.
//! - `classify`: triangles around surviving candidates, flood-filled into
//!   regions; each region yields one `(location, order)`.
//! - `solve`: corner normalization, precision growth, round count, driver.
//!
//! API Policy
//! - Arena indices (`NodeId`, `EdgeId`, `TriangleId`) are only stable between
//!   compactions of a single mesh; never keep them across `solve` calls.
//! - `api` is the curated surface; deeper modules may change shape freely.

pub mod api;
pub mod cfg;
pub mod classify;
pub mod error;
pub mod mesh;
pub mod quadrant;
pub mod rect;
pub mod refine;
pub mod sample;
pub mod solve;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Complex scalar used throughout the engine.
pub type C64 = nalgebra::Complex<f64>;

pub use classify::{Root, RootKind};
pub use error::SolveError;
pub use solve::{solve, solve_report, solve_with_defaults, SolveCfg, SolveReport};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::classify::{Root, RootKind};
    pub use crate::error::SolveError;
    pub use crate::rect::SearchRect;
    pub use crate::sample::{draw_rational, RationalCfg, RationalFn, ReplayToken};
    pub use crate::solve::{solve, solve_report, solve_with_defaults, SolveCfg, SolveReport};
    pub use crate::C64;
}

/// Shorthand for `C64::new(re, im)`.
#[inline]
pub fn c64(re: f64, im: f64) -> C64 {
    C64::new(re, im)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn c64_shorthand_matches_constructor() {
        let z = c64(1.5, -2.0);
        assert_eq!(z, C64::new(1.5, -2.0));
        assert!((z.norm() - 2.5).abs() < 1e-12);
    }
}
