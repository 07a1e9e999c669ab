//! End-to-end checks of the solver on functions with known zeros and poles.

use super::*;
use crate::classify::RootKind;
use crate::sample::{draw_rational, RationalCfg, ReplayToken};
use proptest::prelude::*;

fn ul() -> C64 {
    C64::new(-1.0, 1.0)
}
fn lr() -> C64 {
    C64::new(1.0, -1.0)
}

fn single(roots: &[Root]) -> Root {
    assert_eq!(roots.len(), 1, "expected one root, got {roots:?}");
    roots[0]
}

#[test]
fn identity_has_one_simple_zero_at_origin() {
    for precision in [1e-2, 1e-3, 1e-4] {
        let roots = solve_with_defaults(ul(), lr(), precision, |z: C64| z).unwrap();
        let root = single(&roots);
        assert_eq!(root.order, 1);
        assert_eq!(root.kind(), RootKind::Zero);
        assert!(root.location.norm() < precision, "{} at precision {precision}", root.location);
    }
}

#[test]
fn multiple_zeros_and_poles_keep_their_order() {
    let cases: [(&str, fn(C64) -> C64, i32); 4] = [
        ("z^2", |z| z * z, 2),
        ("z^3", |z| z * z * z, 3),
        ("1/z", |z| z.inv(), -1),
        ("1/z^2", |z| (z * z).inv(), -2),
    ];
    for (name, f, order) in cases {
        let roots = solve_with_defaults(ul(), lr(), 1e-3, f).unwrap();
        let root = single(&roots);
        assert_eq!(root.order, order, "{name}");
        assert!(root.location.norm() < 1e-3, "{name}: {}", root.location);
    }
}

#[test]
fn tangent_has_only_the_zero_at_origin_inside() {
    let roots = solve_with_defaults(ul(), lr(), 1e-3, |z: C64| z.tan()).unwrap();
    let root = single(&roots);
    assert_eq!(root.order, 1);
    assert!(root.location.norm() < 1e-3);
}

#[test]
fn shifted_root_outside_region_gives_nothing() {
    let roots = solve_with_defaults(ul(), lr(), 1e-3, |z: C64| z + 10.0).unwrap();
    assert!(roots.is_empty());
}

#[test]
fn mixed_rational_is_fully_recovered() {
    let f = |z: C64| {
        (z - C64::new(0.3, 0.2)) * (z + 0.4) * (z + 0.4)
            / ((z - C64::new(0.0, 0.5)) * (z - C64::new(-0.1, -0.6)))
    };
    let report = solve_report(ul(), lr(), 1e-3, f, &SolveCfg::default()).unwrap();
    let mut expected = vec![
        (C64::new(0.3, 0.2), 1),
        (C64::new(-0.4, 0.0), 2),
        (C64::new(0.0, 0.5), -1),
        (C64::new(-0.1, -0.6), -1),
    ];
    assert_eq!(report.roots.len(), expected.len(), "{:?}", report.roots);
    for root in &report.roots {
        let hit = expected
            .iter()
            .position(|&(at, order)| order == root.order && (at - root.location).norm() < 1e-3);
        let Some(i) = hit else {
            panic!("unexpected {root}");
        };
        expected.swap_remove(i);
    }
    assert!(report.per_round.iter().all(|r| r.candidates > 0));
}

#[test]
fn corners_in_any_order_give_the_same_roots() {
    let f = |z: C64| z - C64::new(0.25, -0.125);
    let a = solve_with_defaults(ul(), lr(), 1e-3, f).unwrap();
    let b = solve_with_defaults(lr(), ul(), 1e-3, f).unwrap();
    let c = solve_with_defaults(C64::new(-1.0, -1.0), C64::new(1.0, 1.0), 1e-3, f).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
}

#[test]
fn repeated_solves_are_identical() {
    let f = |z: C64| (z - C64::new(0.2, 0.1)) / (z + C64::new(0.3, 0.4));
    let a = solve_report(ul(), lr(), 1e-4, f, &SolveCfg::default()).unwrap();
    let b = solve_report(ul(), lr(), 1e-4, f, &SolveCfg::default()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn working_precision_is_snapped_and_never_coarser() {
    let report = solve_report(ul(), lr(), 3e-4, |z: C64| z, &SolveCfg::default()).unwrap();
    assert_eq!(report.initial_edge_len, 0.05);
    assert_eq!(report.rounds, 8);
    assert!(report.precision <= 3e-4);
    assert_eq!(report.precision, 0.05 / 256.0);
    assert!(!report.precision_grown);
    assert_eq!(report.per_round.len(), 8);
    assert!(report.evaluations >= report.nodes);
}

#[test]
fn configured_initial_edge_len_is_used() {
    let cfg = SolveCfg::default().with_initial_edge_len(0.1);
    let report = solve_report(ul(), lr(), 1e-3, |z: C64| z, &cfg).unwrap();
    assert_eq!(report.initial_edge_len, 0.1);
    assert_eq!(report.rounds, 7);
    single(&report.roots);

    // Non-positive falls back to the default heuristic.
    let cfg = SolveCfg::default().with_initial_edge_len(-1.0);
    let report = solve_report(ul(), lr(), 1e-3, |z: C64| z, &cfg).unwrap();
    assert_eq!(report.initial_edge_len, 0.05);
}

#[test]
fn precision_coarser_than_the_lattice_skips_refinement() {
    let report = solve_report(ul(), lr(), 0.5, |z: C64| z, &SolveCfg::default()).unwrap();
    assert_eq!(report.rounds, 0);
    assert_eq!(report.precision, report.initial_edge_len);
    assert_eq!(single(&report.roots).order, 1);
}

#[test]
fn zero_retriangulation_depth_still_converges() {
    let cfg = SolveCfg::default().with_max_retriangulation_depth(0);
    let cases: [(fn(C64) -> C64, i32); 2] = [(|z| z * z, 2), (|z| z.inv(), -1)];
    for (f, order) in cases {
        let roots = solve(ul(), lr(), 1e-3, f, &cfg).unwrap();
        assert_eq!(single(&roots).order, order);
    }
}

#[test]
fn small_edge_limit_aborts_instead_of_truncating() {
    let f = |z: C64| z * z - C64::new(0.25, 0.0);
    let natural = solve_report(ul(), lr(), 1e-3, f, &SolveCfg::default().with_edge_limit(0)).unwrap();
    assert_eq!(natural.roots.len(), 2);
    let cfg = SolveCfg::default().with_edge_limit(100);
    let err = solve(ul(), lr(), 1e-3, f, &cfg).unwrap_err();
    assert!(matches!(err, SolveError::EdgeLimitExceeded { limit: 100, .. }));
}

#[test]
fn invalid_input_is_rejected_before_sampling() {
    let calls = std::cell::Cell::new(0usize);
    let f = |z: C64| {
        calls.set(calls.get() + 1);
        z
    };
    let flat = solve_with_defaults(C64::new(-1.0, 0.0), C64::new(1.0, 0.0), 1e-3, f);
    assert!(matches!(flat, Err(SolveError::DegenerateRegion { .. })));
    for precision in [0.0, -1e-3, f64::NAN, f64::INFINITY] {
        let err = solve_with_defaults(ul(), lr(), precision, f).unwrap_err();
        assert!(matches!(err, SolveError::InvalidPrecision(_)));
    }
    let nan = solve_with_defaults(C64::new(f64::NAN, 0.0), lr(), 1e-3, f);
    assert!(matches!(nan, Err(SolveError::NonFiniteCorner(_))));
    assert_eq!(calls.get(), 0);
}

#[test]
fn unrepresentable_precision_is_grown() {
    let rect = SearchRect::from_corners(C64::new(1e6, 1e6), C64::new(1e6 + 1.0, 1e6 + 1.0)).unwrap();
    let (p, grown) = grow_precision(&rect, 1e-15);
    assert!(grown);
    assert!(p > 1e-15 * PRECISION_SLACK);
    let (same, grown) = grow_precision(&rect, 1e-3);
    assert!(!grown);
    assert_eq!(same, 1e-3);
}

#[test]
fn every_live_edge_has_a_wrapped_dq() {
    let f = |z: C64| (z - C64::new(0.1, 0.1)) * (z + C64::new(0.2, 0.3)) / (z - C64::new(-0.4, 0.5));
    let rect = SearchRect::from_corners(ul(), lr()).unwrap();
    let f: &dyn Fn(C64) -> C64 = &f;
    let mut mesh = Mesh::new(f, rect.upper_left(), 0.05 / 16.0, 0);
    build_mesh(&mut mesh, &rect, 0.05).unwrap();
    let mut step = 0.05;
    for _ in 0..4 {
        refine_round(&mut mesh, step, 6).unwrap();
        step *= 0.5;
        for e in mesh.edges() {
            assert!((-2..=2).contains(&e.dq));
            assert_eq!(e.is_candidate(), e.dq.abs() == 2);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn random_rationals_are_recovered(seed in 0u64..1_000, index in 0u64..1_000) {
        let Some(r) = draw_rational(RationalCfg::default(), ReplayToken { seed, index }) else {
            return Ok(());
        };
        let precision = 1e-3;
        let roots = solve_with_defaults(ul(), lr(), precision, |z: C64| r.eval(z)).unwrap();
        prop_assert!(roots.iter().all(|root| root.order != 0), "ambiguous region in {:?}", roots);
        prop_assert_eq!(roots.len(), r.factors.len());
        for &(at, order) in &r.factors {
            prop_assert!(
                roots.iter().any(|root| root.order == order && (root.location - at).norm() < precision),
                "missing {:?} of order {} in {:?}", at, order, roots
            );
        }
    }
}
