//! Locate zeros and poles of a few closed-form functions and one random rational.
//!
//! Purpose
//! - Show the solver end to end, including the diagnostics `solve_report`
//!   returns, and compare a random rational draw against its known factors.
//!
//! Run with `cargo run -p grpf --example locate_roots`.

use std::time::Instant;

use grpf::api::{draw_rational, solve_report, RationalCfg, ReplayToken, SolveCfg, C64};

fn main() {
    let ul = C64::new(-2.0, 2.0);
    let lr = C64::new(2.0, -2.0);
    let precision = 1e-9;
    let cfg = SolveCfg::default();

    let cases: [(&str, fn(C64) -> C64); 3] = [
        ("(z-1)(z+i)^2", |z| (z - 1.0) * (z + C64::new(0.0, 1.0)).powu(2)),
        ("tan z", |z| z.tan()),
        ("(z^2 - 1) / (z^2 + 1/4)", |z| (z * z - 1.0) / (z * z + 0.25)),
    ];
    for (name, f) in cases {
        let start = Instant::now();
        match solve_report(ul, lr, precision, f, &cfg) {
            Ok(report) => {
                println!(
                    "{name}: {} root(s), {} rounds, {} evaluations, {:.1} ms",
                    report.roots.len(),
                    report.rounds,
                    report.evaluations,
                    start.elapsed().as_secs_f64() * 1e3
                );
                for root in &report.roots {
                    println!("  {root}");
                }
            }
            Err(e) => println!("{name}: {e}"),
        }
    }

    let tok = ReplayToken { seed: 2024, index: 1 };
    let Some(r) = draw_rational(RationalCfg::default(), tok) else {
        println!("rational draw {tok:?} could not be placed");
        return;
    };
    println!("rational {tok:?}:");
    for &(a, m) in &r.factors {
        println!("  expected order {m:+} at {a}");
    }
    match solve_report(ul, lr, precision, |z| r.eval(z), &cfg) {
        Ok(report) => {
            for root in &report.roots {
                let err = r
                    .factors
                    .iter()
                    .filter(|&&(_, m)| m == root.order)
                    .map(|&(a, _)| (a - root.location).norm())
                    .fold(f64::INFINITY, f64::min);
                println!("  {root} (distance to truth {err:.2e})");
            }
        }
        Err(e) => println!("  {e}"),
    }
}
