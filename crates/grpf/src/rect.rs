//! Axis-aligned search rectangle in the complex plane.
//!
//! Corners may be passed in any order; `SearchRect::from_corners` normalizes
//! them so that `upper_left` has the smallest real and the largest imaginary
//! part, and rejects rectangles that cannot be meshed.

use crate::error::SolveError;
use crate::C64;

/// Normalized rectangle `[re_min, re_max] x [im_min, im_max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchRect {
    pub re_min: f64,
    pub re_max: f64,
    pub im_min: f64,
    pub im_max: f64,
}

impl SearchRect {
    /// Normalize two opposite corners. Zero-area and non-finite input is rejected.
    pub fn from_corners(a: C64, b: C64) -> Result<Self, SolveError> {
        for z in [a, b] {
            if !z.re.is_finite() || !z.im.is_finite() {
                return Err(SolveError::NonFiniteCorner(z));
            }
        }
        let rect = Self {
            re_min: a.re.min(b.re),
            re_max: a.re.max(b.re),
            im_min: a.im.min(b.im),
            im_max: a.im.max(b.im),
        };
        let (width, height) = (rect.width(), rect.height());
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return Err(SolveError::DegenerateRegion { width, height });
        }
        Ok(rect)
    }

    #[inline]
    pub fn upper_left(&self) -> C64 {
        C64::new(self.re_min, self.im_max)
    }
    #[inline]
    pub fn lower_right(&self) -> C64 {
        C64::new(self.re_max, self.im_min)
    }
    #[inline]
    pub fn width(&self) -> f64 {
        self.re_max - self.re_min
    }
    #[inline]
    pub fn height(&self) -> f64 {
        self.im_max - self.im_min
    }
    #[inline]
    pub fn min_side(&self) -> f64 {
        self.width().min(self.height())
    }
    #[inline]
    pub fn contains(&self, z: C64) -> bool {
        (self.re_min..=self.re_max).contains(&z.re) && (self.im_min..=self.im_max).contains(&z.im)
    }

    /// The four extreme coordinates, real parts first.
    pub(crate) fn extremes(&self) -> [(f64, f64); 4] {
        let ul = self.upper_left();
        [
            (self.re_min, ul.re),
            (self.re_max, ul.re),
            (self.im_min, ul.im),
            (self.im_max, ul.im),
        ]
    }
}
