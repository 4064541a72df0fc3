use clap::{Parser, Subcommand};
use hwbench::harness::{BenchConfig, ProgressEvent, Profile};
use hwbench::refs::ReferenceTable;
use hwbench::report::{self, CsvReporter};
use hwbench::schema::{RunMeta, SuiteReport, WorkloadResult};
use hwbench::suite::Suite;
use hwbench::WorkloadKind;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every workload, append one CSV row each and report the composite grade.
    Suite,

    /// Run a single workload by id (INT, FP, MEM, AES, CMP, RND, DSK).
    Run {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Print the calibrated baseline for a workload kind.
    Reference {
        #[arg(value_enum)]
        kind: WorkloadKind,
    },

    /// List registered workloads with their baselines.
    List,
}

#[derive(Parser, Debug)]
#[command(name = "hwbench")]
#[command(about = "Reference-normalized hardware throughput benchmark (CSV + JSON output)")]
struct Args {
    /// Workload profile: light, standard, heavy, or the numeric ids 0, 1, 2.
    #[arg(long, value_parser = Profile::parse, default_value = "standard", global = true)]
    profile: Profile,

    #[arg(long, default_value_t = 0, global = true)]
    seed: u64,

    /// Override the profile's measured repetition count.
    #[arg(long, global = true)]
    repetitions: Option<u32>,

    /// Override the profile's warmup count.
    #[arg(long, global = true)]
    warmup: Option<u32>,

    /// JSON calibration file replacing the built-in reference table.
    #[arg(long, value_name = "FILE", global = true)]
    refs: Option<PathBuf>,

    /// CSV destination for suite rows.
    #[arg(long, value_name = "FILE", default_value = report::DEFAULT_PATH, global = true)]
    csv: PathBuf,

    /// Where to write the JSON report. If omitted, prints to stdout.
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hwbench=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn now_utc_unix() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("unix:{secs}")
}

fn git_sha_short() -> Option<String> {
    // Best-effort: read from environment set by CI/build scripts.
    std::env::var("GIT_SHA")
        .ok()
        .or_else(|| std::env::var("GITHUB_SHA").ok())
        .map(|s| s.chars().take(12).collect())
}

fn emit_json<T: serde::Serialize>(value: &T, out: Option<&PathBuf>) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    if let Some(out) = out {
        fs::write(out, json)?;
    } else {
        println!("{json}");
    }
    Ok(())
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    init_logging();

    let mut cfg = BenchConfig::for_profile(args.profile).with_seed(args.seed);
    if let Some(k) = args.repetitions {
        cfg = cfg.with_repetitions(k);
    }
    if let Some(w) = args.warmup {
        cfg = cfg.with_warmup(w);
    }
    let refs = match &args.refs {
        Some(path) => ReferenceTable::from_json_file(path)?,
        None => ReferenceTable::default(),
    };

    let mut suite = Suite::new(cfg.clone(), refs)?;

    match &args.cmd {
        Command::Suite => {
            eprintln!(
                "=== hwbench ({} profile) K={}, warmup={} ===",
                cfg.profile.as_str(),
                cfg.repetitions,
                cfg.warmup
            );
            let mut reporter = CsvReporter::open(&args.csv);
            let outcome = suite.run_all(&mut reporter, None);
            for result in &outcome.results {
                eprintln!("{}", result.summary_line());
            }
            if reporter.is_active() {
                eprintln!("Rows appended to {}", reporter.path().display());
            }
            reporter.close();

            eprintln!(
                "=== Final grade (mean of indices over {} workloads): {:.3} ===",
                outcome.results.len(),
                outcome.grade
            );

            let report = SuiteReport {
                run: RunMeta {
                    schema_version: 1,
                    bench_version: env!("CARGO_PKG_VERSION").to_string(),
                    profile: cfg.profile.as_str().to_string(),
                    repetitions: cfg.repetitions,
                    warmup: cfg.warmup,
                    seed: cfg.seed,
                    timestamp_utc: now_utc_unix(),
                    git_sha: git_sha_short(),
                },
                results: outcome.results,
                grade: outcome.grade,
            };
            emit_json(&report, args.out.as_ref())?;
        }
        Command::Run { id } => {
            let meta = suite
                .find(id)
                .map(|d| (d.id.to_string(), d.title.to_string(), d.unit.to_string(), d.kind));
            let repetitions = cfg.repetitions;
            let unit = meta.as_ref().map(|m| m.2.clone()).unwrap_or_default();
            let mut progress = |e: ProgressEvent| {
                eprintln!("[{id}] run {}/{repetitions}: {:.1} {unit}", e.repetition, e.sample);
            };
            let aggregate = suite.run_single(id, Some(&mut progress));

            match meta {
                Some((id, title, unit, kind)) => {
                    let result = WorkloadResult {
                        id,
                        title,
                        unit,
                        kind,
                        reference: suite.reference(kind),
                        aggregate,
                    };
                    emit_json(&result, args.out.as_ref())?;
                }
                None => emit_json(&aggregate, args.out.as_ref())?,
            }
        }
        Command::Reference { kind } => {
            println!("{}", suite.reference(*kind));
        }
        Command::List => {
            for d in suite.descriptors() {
                println!(
                    "{:<4} {:<38} {:<7} {:>12.3}",
                    d.id,
                    d.title,
                    d.unit,
                    suite.reference(d.kind)
                );
            }
        }
    }

    Ok(())
}
