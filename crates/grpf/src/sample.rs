//! Random rational functions with known zeros and poles (replay tokens).
//!
//! Purpose
//! - Deterministic test inputs for the solver: every draw carries its own
//!   ground truth, so tests, benchmarks and the CLI can check recovered
//!   roots against it.
//!
//! Model
//! - `f(z) = scale · Π (z − a_k)^{m_k}` with `a_k` uniform in a disk,
//!   pairwise at least `min_separation` apart, and `m_k ≠ 0`.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::C64;

/// Factor count distribution.
#[derive(Clone, Copy, Debug)]
pub enum FactorCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}
impl FactorCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            FactorCount::Fixed(n) => n.max(1),
            FactorCount::Uniform { min, max } => {
                let lo = min.max(1);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct RationalCfg {
    pub factor_count: FactorCount,
    pub centre: C64,
    /// Singularities are drawn uniformly (by area) in this disk.
    pub radius: f64,
    pub min_separation: f64,
    /// Largest `|m_k|`; magnitudes are uniform in `1..=max_order`.
    pub max_order: u32,
    /// Probability that a factor is a pole.
    pub pole_probability: f64,
    /// Rejection attempts per factor before giving up on a draw.
    pub max_attempts: usize,
}
impl Default for RationalCfg {
    fn default() -> Self {
        Self {
            factor_count: FactorCount::Uniform { min: 1, max: 4 },
            centre: C64::new(0.0, 0.0),
            radius: 0.6,
            min_separation: 0.3,
            max_order: 2,
            pole_probability: 0.4,
            max_attempts: 1000,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}
impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// `scale · Π (z − a_k)^{m_k}`.
#[derive(Clone, Debug, PartialEq)]
pub struct RationalFn {
    pub scale: C64,
    pub factors: Vec<(C64, i32)>,
}

impl RationalFn {
    pub fn new(scale: C64, factors: Vec<(C64, i32)>) -> Self {
        Self { scale, factors }
    }

    /// Evaluate by repeated multiplication / division; exactly at a pole the
    /// result is non-finite.
    pub fn eval(&self, z: C64) -> C64 {
        let mut v = self.scale;
        for &(a, m) in &self.factors {
            let d = z - a;
            for _ in 0..m.unsigned_abs() {
                if m > 0 {
                    v *= d;
                } else {
                    v /= d;
                }
            }
        }
        v
    }

    pub fn zeros(&self) -> impl Iterator<Item = (C64, i32)> + '_ {
        self.factors.iter().copied().filter(|&(_, m)| m > 0)
    }
    pub fn poles(&self) -> impl Iterator<Item = (C64, i32)> + '_ {
        self.factors.iter().copied().filter(|&(_, m)| m < 0)
    }

    /// Net order (zeros minus poles, with multiplicity).
    pub fn net_order(&self) -> i32 {
        self.factors.iter().map(|&(_, m)| m).sum()
    }
}

/// Draw a rational function with separated singularities.
///
/// Returns `None` if the disk cannot host the requested number of factors
/// at the configured separation within `max_attempts` tries per factor.
pub fn draw_rational(cfg: RationalCfg, tok: ReplayToken) -> Option<RationalFn> {
    let mut rng = tok.to_std_rng();
    let n = cfg.factor_count.sample(&mut rng);
    let max_order = cfg.max_order.max(1) as i32;
    let pole_p = cfg.pole_probability.clamp(0.0, 1.0);
    let mut factors: Vec<(C64, i32)> = Vec::with_capacity(n);
    for _ in 0..n {
        let mut placed = false;
        for _ in 0..cfg.max_attempts.max(1) {
            let r = cfg.radius * rng.gen::<f64>().sqrt();
            let th = rng.gen::<f64>() * std::f64::consts::TAU;
            let a = cfg.centre + C64::from_polar(r, th);
            if factors.iter().all(|&(b, _)| (a - b).norm() >= cfg.min_separation) {
                let magnitude = rng.gen_range(1..=max_order);
                let m = if rng.gen_bool(pole_p) { -magnitude } else { magnitude };
                factors.push((a, m));
                placed = true;
                break;
            }
        }
        if !placed {
            return None;
        }
    }
    Some(RationalFn::new(C64::new(1.0, 0.0), factors))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_is_deterministic_and_indexed() {
        let cfg = RationalCfg::default();
        let a = draw_rational(cfg, ReplayToken { seed: 7, index: 3 }).unwrap();
        let b = draw_rational(cfg, ReplayToken { seed: 7, index: 3 }).unwrap();
        let c = draw_rational(cfg, ReplayToken { seed: 7, index: 4 }).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn draws_respect_disk_separation_and_orders() {
        let cfg = RationalCfg::default();
        for index in 0..64 {
            let r = draw_rational(cfg, ReplayToken { seed: 1, index }).unwrap();
            assert!((1..=4).contains(&r.factors.len()));
            for (i, &(a, m)) in r.factors.iter().enumerate() {
                assert!(a.norm() <= cfg.radius + 1e-12);
                assert!(m != 0 && m.abs() <= 2);
                for &(b, _) in &r.factors[i + 1..] {
                    assert!((a - b).norm() >= cfg.min_separation);
                }
            }
            assert_eq!(r.zeros().count() + r.poles().count(), r.factors.len());
        }
    }

    #[test]
    fn impossible_packing_gives_none() {
        let cfg = RationalCfg {
            factor_count: FactorCount::Fixed(3),
            radius: 0.1,
            min_separation: 1.0,
            max_attempts: 50,
            ..RationalCfg::default()
        };
        assert!(draw_rational(cfg, ReplayToken { seed: 0, index: 0 }).is_none());
    }

    #[test]
    fn eval_matches_closed_form() {
        let r = RationalFn::new(
            C64::new(2.0, 0.0),
            vec![(C64::new(1.0, 0.0), 2), (C64::new(0.0, 1.0), -1)],
        );
        let z = C64::new(0.5, -0.25);
        let expect = C64::new(2.0, 0.0) * (z - 1.0) * (z - 1.0) / (z - C64::new(0.0, 1.0));
        assert!((r.eval(z) - expect).norm() < 1e-12);
        assert_eq!(r.net_order(), 1);
        assert!(!r.eval(C64::new(0.0, 1.0)).re.is_finite());
    }
}
