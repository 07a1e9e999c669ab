//! Phase quadrants: the unit of phase information the mesh reasons about.
//!
//! `quadrant(z)` buckets `arg z` into four quarter turns:
//! `(-π/2, 0] → 0`, `(0, π/2] → 1`, `(π/2, π] → 2`, `(-π, -π/2] → 3`.
//! `dq` is the quadrant difference along an edge wrapped into `[-2, 2]`; an
//! edge with `|dq| = 2` cannot tell a left from a right half turn and is a
//! candidate for refinement.

use std::f64::consts::FRAC_PI_2;

use crate::C64;

/// Quadrant in `0..=3` of `arg z`. Zero and non-finite values (an exact hit on
/// a pole) map to quadrant 0.
#[inline]
pub fn quadrant(z: C64) -> u8 {
    if !z.re.is_finite() || !z.im.is_finite() || (z.re == 0.0 && z.im == 0.0) {
        return 0;
    }
    let q = (z.arg() / FRAC_PI_2).ceil() as i32;
    q.rem_euclid(4) as u8
}

/// Quadrant step `q1 - q0` wrapped into `[-2, 2]`. A half turn is reported as `-2`.
#[inline]
pub fn quadrant_delta(q0: u8, q1: u8) -> i8 {
    let d = q1 as i8 - q0 as i8;
    (d + 2).rem_euclid(4) - 2
}

/// Whether an edge with this quadrant step needs refinement.
#[inline]
pub fn is_candidate_delta(dq: i8) -> bool {
    dq.abs() == 2
}
