//! SolveError: failure modes surfaced by `solve`.
//!
//! Precision that is too fine for `f64` is not an error; it is grown
//! internally before the mesh is built.

use thiserror::Error;

use crate::C64;

/// Unified error type for the engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolveError {
    /// Live edge count passed the configured limit; the whole solve is discarded.
    #[error("edge limit exceeded: {live} live edges > limit {limit}; retry with a coarser precision, a smaller region or a larger limit")]
    EdgeLimitExceeded { limit: usize, live: usize },
    /// The search rectangle has zero (or negative) width or height.
    #[error("degenerate search region ({width} x {height})")]
    DegenerateRegion { width: f64, height: f64 },
    /// A corner coordinate is NaN or infinite.
    #[error("non-finite corner {0}")]
    NonFiniteCorner(C64),
    /// Precision must be finite and strictly positive.
    #[error("invalid precision {0} (must be finite and > 0)")]
    InvalidPrecision(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let e = SolveError::EdgeLimitExceeded {
            limit: 10,
            live: 11,
        };
        let msg = e.to_string();
        assert!(msg.contains("11") && msg.contains("10"));
        let d = SolveError::DegenerateRegion {
            width: 0.0,
            height: 2.0,
        };
        assert!(d.to_string().contains("degenerate"));
    }
}
