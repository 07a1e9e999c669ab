use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use grpf::api::{solve_report, ReplayToken, Root, SearchRect, SolveCfg, SolveReport, C64};
use grpf::cfg::{DEFAULT_EDGE_LIMIT, DEFAULT_RETRIANGULATION_DEPTH};
use polars::prelude::*;
use serde::Serialize;
use serde_json::json;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

mod preset;
mod provenance;

use preset::Preset;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Locate zeros and poles of built-in test functions")]
struct Cmd {
    /// Optional run tag; propagated to outputs and logs
    #[arg(long)]
    tag: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Solve one preset over a rectangle and print (optionally write) the roots
    Solve(SolveArgs),
    /// Print a small provenance JSON block
    Report,
}

#[derive(clap::Args, Debug)]
struct SolveArgs {
    #[arg(long, value_enum, default_value_t = Preset::Z)]
    function: Preset,
    /// Replay seed for `--function rational`
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Replay index for `--function rational`
    #[arg(long, default_value_t = 0)]
    index: u64,
    /// First corner as `re,im`
    #[arg(long, default_value = "-1,1", value_parser = parse_complex, allow_hyphen_values = true)]
    from: C64,
    /// Opposite corner as `re,im`
    #[arg(long, default_value = "1,-1", value_parser = parse_complex, allow_hyphen_values = true)]
    to: C64,
    #[arg(long, default_value_t = 1e-6)]
    precision: f64,
    /// Initial mesh edge length (default: shorter side / 40)
    #[arg(long)]
    initial_edge_len: Option<f64>,
    /// Live edge limit; 0 disables it
    #[arg(long, default_value_t = DEFAULT_EDGE_LIMIT)]
    edge_limit: usize,
    #[arg(long, default_value_t = DEFAULT_RETRIANGULATION_DEPTH)]
    depth: usize,
    /// Write roots as CSV, or Parquet for a `.parquet` path (plus a `.provenance.json` sidecar)
    #[arg(long)]
    out: Option<PathBuf>,
    /// Print roots as JSON instead of one line per root
    #[arg(long)]
    json: bool,
}

/// One reported root, as printed with `--json`.
#[derive(Serialize, Debug, PartialEq)]
struct RootRow {
    re: f64,
    im: f64,
    order: i32,
    kind: String,
}

impl From<&Root> for RootRow {
    fn from(r: &Root) -> Self {
        Self {
            re: r.location.re,
            im: r.location.im,
            order: r.order,
            kind: format!("{:?}", r.kind()),
        }
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Solve(args) => solve(args, cmd.tag),
        Action::Report => report(cmd.tag),
    }
}

/// Parse `re,im` (whitespace allowed around either part).
fn parse_complex(s: &str) -> Result<C64> {
    let Some((re, im)) = s.split_once(',') else {
        bail!("expected `re,im`, got {s:?}");
    };
    let re: f64 = re.trim().parse().with_context(|| format!("real part of {s:?}"))?;
    let im: f64 = im.trim().parse().with_context(|| format!("imaginary part of {s:?}"))?;
    Ok(C64::new(re, im))
}

fn solve(args: SolveArgs, tag: Option<String>) -> Result<()> {
    tracing::info!(function = args.function.name(), precision = args.precision, tag = ?tag, "solve");
    let token = ReplayToken {
        seed: args.seed,
        index: args.index,
    };
    let target = args
        .function
        .target(token)
        .with_context(|| format!("could not draw a rational function for {token:?}"))?;
    let cfg = SolveCfg {
        initial_edge_len: args.initial_edge_len,
        edge_limit: args.edge_limit,
        max_retriangulation_depth: args.depth,
    };
    let report = solve_report(args.from, args.to, args.precision, &*target.f, &cfg)
        .context("solver aborted; retry with a coarser precision, a smaller region or a larger edge limit")?;

    if args.json {
        let rows: Vec<RootRow> = report.roots.iter().map(RootRow::from).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for root in &report.roots {
            println!("{root}");
        }
    }
    if let Some(truth) = &target.truth {
        let rect = SearchRect::from_corners(args.from, args.to)?;
        let missing = unmatched(truth, &rect, &report.roots, report.precision);
        if missing.is_empty() {
            tracing::info!(expected = truth.len(), "all known singularities recovered");
        } else {
            tracing::warn!(missing = ?missing, "known singularities not recovered");
        }
    }

    if let Some(out) = &args.out {
        write_roots(out, &report.roots)?;
        let params = json!({
            "function": target.description,
            "from": [args.from.re, args.from.im],
            "to": [args.to.re, args.to.im],
            "precision": args.precision,
            "initial_edge_len": args.initial_edge_len,
            "edge_limit": args.edge_limit,
            "max_retriangulation_depth": args.depth,
        });
        let payload = provenance::Payload::new(params)
            .with_summary(summary(&report))
            .with_tag(tag);
        let sidecar = provenance::write_sidecar(out, payload)?;
        tracing::info!(csv = %out.display(), provenance = %sidecar.display(), "written");
    }
    Ok(())
}

/// Known singularities inside `rect` with no reported root of the same order nearby.
fn unmatched(truth: &[(C64, i32)], rect: &SearchRect, roots: &[Root], tol: f64) -> Vec<(C64, i32)> {
    truth
        .iter()
        .copied()
        .filter(|&(at, _)| rect.contains(at))
        .filter(|&(at, order)| {
            !roots
                .iter()
                .any(|r| r.order == order && (r.location - at).norm() <= tol)
        })
        .collect()
}

fn summary(report: &SolveReport) -> serde_json::Value {
    json!({
        "roots": report.roots.len(),
        "rounds": report.rounds,
        "requested_precision": report.requested_precision,
        "precision": report.precision,
        "precision_grown": report.precision_grown,
        "initial_edge_len": report.initial_edge_len,
        "evaluations": report.evaluations,
        "nodes": report.nodes,
        "edges": report.edges,
        "triangles": report.triangles,
    })
}

fn roots_frame(roots: &[Root]) -> PolarsResult<DataFrame> {
    let rows: Vec<RootRow> = roots.iter().map(RootRow::from).collect();
    let re: Vec<f64> = rows.iter().map(|r| r.re).collect();
    let im: Vec<f64> = rows.iter().map(|r| r.im).collect();
    let order: Vec<i32> = rows.iter().map(|r| r.order).collect();
    let kind: Vec<String> = rows.into_iter().map(|r| r.kind).collect();
    df!(
        "re" => re,
        "im" => im,
        "order" => order,
        "kind" => kind,
    )
}

fn write_roots(out: &Path, roots: &[Root]) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut df = roots_frame(roots)?;
    let mut file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    let written = if out.extension().is_some_and(|e| e == "parquet") {
        ParquetWriter::new(&mut file).finish(&mut df).map(|_| ())
    } else {
        CsvWriter::new(&mut file).include_header(true).finish(&mut df)
    };
    written.with_context(|| format!("writing {}", out.display()))?;
    tracing::info!(rows = df.height(), cols = df.width(), "roots_frame_shape");
    Ok(())
}

fn report(tag: Option<String>) -> Result<()> {
    let obj = json!({
        "version": provenance::version_block(),
        "tag": tag,
        "defaults": {
            "edge_limit": DEFAULT_EDGE_LIMIT,
            "max_retriangulation_depth": DEFAULT_RETRIANGULATION_DEPTH,
        },
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_corner_pairs() {
        assert_eq!(parse_complex("-1,1").unwrap(), C64::new(-1.0, 1.0));
        assert_eq!(parse_complex(" 2.5 , -0.5 ").unwrap(), C64::new(2.5, -0.5));
        assert!(parse_complex("1").is_err());
        assert!(parse_complex("a,1").is_err());
    }

    #[test]
    fn cli_accepts_negative_corners() {
        let cmd = Cmd::try_parse_from([
            "cli", "solve", "--function", "z2", "--from", "-2,-1", "--to", "1,2", "--precision", "1e-3",
        ])
        .unwrap();
        let Action::Solve(args) = cmd.action else {
            panic!("expected solve");
        };
        assert_eq!(args.function, Preset::Z2);
        assert_eq!(args.from, C64::new(-2.0, -1.0));
        assert_eq!(args.to, C64::new(1.0, 2.0));
        assert_eq!(args.edge_limit, DEFAULT_EDGE_LIMIT);
    }

    #[test]
    fn unmatched_ignores_truth_outside_the_rectangle() {
        let rect = SearchRect::from_corners(C64::new(-1.0, 1.0), C64::new(1.0, -1.0)).unwrap();
        let truth = [(C64::new(0.0, 0.0), 1), (C64::new(-10.0, 0.0), 1)];
        let roots = [Root {
            location: C64::new(1e-4, 0.0),
            order: 1,
        }];
        assert!(unmatched(&truth, &rect, &roots, 1e-3).is_empty());
        assert_eq!(unmatched(&truth, &rect, &[], 1e-3).len(), 1);
    }

    #[test]
    fn solve_writes_csv_and_sidecar() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("roots.csv");
        let args = SolveArgs {
            function: Preset::Z2,
            seed: 0,
            index: 0,
            from: C64::new(-1.0, 1.0),
            to: C64::new(1.0, -1.0),
            precision: 1e-3,
            initial_edge_len: None,
            edge_limit: DEFAULT_EDGE_LIMIT,
            depth: DEFAULT_RETRIANGULATION_DEPTH,
            out: Some(out.clone()),
            json: false,
        };
        solve(args, Some("test".into())).unwrap();
        let csv = std::fs::read_to_string(&out).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("re,im,order,kind"));
        let row = lines.next().unwrap();
        assert!(row.ends_with(",2,Zero"), "{row}");
        assert!(lines.next().is_none());
        assert!(dir.path().join("roots.provenance.json").exists());
    }

    #[test]
    fn root_rows_name_the_kind() {
        let row = RootRow::from(&Root {
            location: C64::new(0.5, -0.5),
            order: -1,
        });
        assert_eq!(
            row,
            RootRow {
                re: 0.5,
                im: -0.5,
                order: -1,
                kind: "Pole".into(),
            }
        );
        let frame = roots_frame(&[]).unwrap();
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 0);
    }
}
