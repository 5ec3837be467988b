use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "revealkit", version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a scenario and print JSON snapshots to stdout.
    Replay(ReplayArgs),
    /// Validate a scenario and mount its sections without running any frame.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Input scenario JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Print a snapshot every N frames (0 = final snapshot only).
    #[arg(long, default_value_t = 0)]
    every: u64,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input scenario JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(serde::Serialize)]
struct FrameLine<'a> {
    report: revealkit::FrameReport,
    snapshot: &'a revealkit::PageSnapshot,
}

#[derive(serde::Serialize)]
struct CheckSummary {
    sections: usize,
    script_steps: usize,
    frames: u64,
    registrations: usize,
    listeners: usize,
    nodes: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Replay(args) => cmd_replay(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load(path: &Path) -> anyhow::Result<revealkit::Scenario> {
    revealkit::Scenario::from_path(path)
        .with_context(|| format!("load scenario '{}'", path.display()))
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let scenario = load(&args.in_path)?;
    let mut replay = revealkit::Replay::new(&scenario).context("mount scenario sections")?;
    tracing::info!(
        path = %args.in_path.display(),
        sections = scenario.sections.len(),
        frames = replay.frame_count(),
        "replaying scenario"
    );

    let mut last = None;
    while let Some(report) = replay.step() {
        if args.every > 0 && report.frame % args.every == 0 {
            print_frame(report, &replay.page().snapshot())?;
        }
        last = Some(report);
    }
    if let Some(report) = last
        && (args.every == 0 || report.frame % args.every != 0)
    {
        print_frame(report, &replay.page().snapshot())?;
    }
    tracing::info!(frames = last.map_or(0, |r| r.frame), "replay finished");

    for (url, target) in replay.opened() {
        eprintln!("opened {url} ({})", target.window_name());
    }
    Ok(())
}

fn print_frame(report: revealkit::FrameReport, snapshot: &revealkit::PageSnapshot) -> anyhow::Result<()> {
    let line = serde_json::to_string(&FrameLine { report, snapshot })
        .context("serialize snapshot")?;
    println!("{line}");
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let scenario = load(&args.in_path)?;
    let replay = revealkit::Replay::new(&scenario).context("mount scenario sections")?;
    let snap = replay.page().snapshot();
    let summary = CheckSummary {
        sections: scenario.sections.len(),
        script_steps: scenario.script.len(),
        frames: replay.frame_count(),
        registrations: snap.registrations,
        listeners: snap.listeners,
        nodes: snap.nodes.len(),
    };
    tracing::info!(
        sections = summary.sections,
        registrations = summary.registrations,
        listeners = summary.listeners,
        "scenario mounted"
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("serialize summary")?
    );
    eprintln!("ok {}", args.in_path.display());
    Ok(())
}
