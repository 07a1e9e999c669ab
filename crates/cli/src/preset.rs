use clap::ValueEnum;
use grpf::api::{draw_rational, RationalCfg, RationalFn, ReplayToken, C64};
use serde_json::{json, Value};

/// Built-in test functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// f(z) = z
    Z,
    /// f(z) = z²
    Z2,
    /// f(z) = z³
    Z3,
    /// f(z) = 1/z
    Inv,
    /// f(z) = 1/z²
    Inv2,
    /// f(z) = tan z
    Tan,
    /// f(z) = z + 10 (no root near the origin)
    Shifted,
    /// Random rational function drawn from `--seed` / `--index`
    Rational,
}

/// A function ready to hand to the solver, plus a JSON description of it.
pub struct Target {
    pub f: Box<dyn Fn(C64) -> C64>,
    pub description: Value,
    /// Known singularities `(location, order)`, when the function has any we can list.
    pub truth: Option<Vec<(C64, i32)>>,
}

impl Preset {
    pub fn name(self) -> &'static str {
        match self {
            Preset::Z => "z",
            Preset::Z2 => "z2",
            Preset::Z3 => "z3",
            Preset::Inv => "inv",
            Preset::Inv2 => "inv2",
            Preset::Tan => "tan",
            Preset::Shifted => "shifted",
            Preset::Rational => "rational",
        }
    }

    /// Build the target; `None` if a rational draw could not be placed.
    pub fn target(self, token: ReplayToken) -> Option<Target> {
        let origin = C64::new(0.0, 0.0);
        let simple = |f: fn(C64) -> C64, truth: Vec<(C64, i32)>| Target {
            f: Box::new(f),
            description: json!({ "preset": self.name() }),
            truth: Some(truth),
        };
        Some(match self {
            Preset::Z => simple(|z| z, vec![(origin, 1)]),
            Preset::Z2 => simple(|z| z * z, vec![(origin, 2)]),
            Preset::Z3 => simple(|z| z * z * z, vec![(origin, 3)]),
            Preset::Inv => simple(|z| z.inv(), vec![(origin, -1)]),
            Preset::Inv2 => simple(|z| (z * z).inv(), vec![(origin, -2)]),
            // Zeros at kπ, poles at π/2 + kπ; the caller's rectangle decides which count.
            Preset::Tan => Target {
                f: Box::new(|z: C64| z.tan()),
                description: json!({ "preset": "tan" }),
                truth: None,
            },
            Preset::Shifted => simple(|z| z + 10.0, vec![(C64::new(-10.0, 0.0), 1)]),
            Preset::Rational => {
                let r = draw_rational(RationalCfg::default(), token)?;
                rational_target(r, token)
            }
        })
    }
}

fn rational_target(r: RationalFn, token: ReplayToken) -> Target {
    let factors: Vec<Value> = r
        .factors
        .iter()
        .map(|&(a, m)| json!({ "re": a.re, "im": a.im, "order": m }))
        .collect();
    let truth = r.factors.clone();
    Target {
        description: json!({
            "preset": "rational",
            "seed": token.seed,
            "index": token.index,
            "factors": factors,
        }),
        truth: Some(truth),
        f: Box::new(move |z: C64| r.eval(z)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_evaluate_as_named() {
        let tok = ReplayToken { seed: 0, index: 0 };
        let z = C64::new(0.5, -0.25);
        let eval = |p: Preset| (p.target(tok).unwrap().f)(z);
        assert_eq!(eval(Preset::Z), z);
        assert_eq!(eval(Preset::Z2), z * z);
        assert_eq!(eval(Preset::Inv), z.inv());
        assert_eq!(eval(Preset::Shifted), z + 10.0);
    }

    #[test]
    fn rational_preset_carries_its_truth() {
        let tok = ReplayToken { seed: 3, index: 9 };
        let t = Preset::Rational.target(tok).unwrap();
        let truth = t.truth.unwrap();
        assert!(!truth.is_empty());
        assert_eq!(t.description["factors"].as_array().unwrap().len(), truth.len());
        assert_eq!(t.description["seed"], 3);
    }
}
