//! Patch sequencer CLI.
//!
//! Orders schema patch findings into dependency-safe layers and migration
//! phases.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use patch_sequencer::{
    normalize, samples, validate, AmbiguityPolicy, ScheduleOutcome, Sequencer, SequencerConfig,
};

mod ui;

#[derive(Parser)]
#[command(name = "sequencer")]
#[command(about = "Patch sequencer - orders schema patches into safe migration phases")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Findings JSON file (runs the bundled sample batches when omitted)
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Fail when a dependency is affected by more than one patch
    #[arg(long)]
    reject_ambiguous: bool,

    /// Validate findings against the strict schema before scheduling
    #[arg(long)]
    strict: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a findings file against the strict schema without scheduling
    Check {
        /// Findings JSON file
        input: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Result document as pretty-printed JSON
    Json,
    /// Human-readable layers and phases
    Pretty,
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = SequencerConfig {
        ambiguity: if cli.reject_ambiguous {
            AmbiguityPolicy::Reject
        } else {
            AmbiguityPolicy::FirstMatch
        },
        strict_input: cli.strict,
    };

    match (cli.command, cli.input) {
        (Some(Commands::Check { input }), _) => check_file(&input),
        (None, Some(input)) => schedule_file(&input, config, cli.format),
        (None, None) => run_demo(config, cli.format),
    }
}

/// Logs go to stderr. `-v` wins over `RUST_LOG`; with neither, only warnings
/// are shown.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Schedule a findings file.
fn schedule_file(path: &Path, config: SequencerConfig, format: Format) -> miette::Result<()> {
    let sequencer = Sequencer::new(config);

    let document = normalize::read_document(path)?;
    let patches = sequencer.patches_from_document(&document)?;
    ui::patch_summary(&path.display().to_string(), &patches);

    let outcome = sequencer.schedule(patches)?;
    debug!(status = outcome.status(), "scheduling finished");
    emit(&outcome, format);

    Ok(())
}

/// Schedule both bundled batches: one that succeeds and one that is blocked.
fn run_demo(config: SequencerConfig, format: Format) -> miette::Result<()> {
    let sequencer = Sequencer::new(config);
    let demos = [
        ("Sequencer demo (normal dataset)", samples::acyclic_batch()),
        ("Sequencer demo (cycle dataset)", samples::cyclic_batch()),
    ];

    for (title, batch) in demos {
        ui::section(title);
        let outcome = sequencer.schedule(batch)?;
        emit(&outcome, format);
    }

    Ok(())
}

/// Strict schema check. Exits non-zero when the file has violations.
fn check_file(path: &Path) -> miette::Result<()> {
    let document = normalize::read_document(path)?;
    let violations = validate::validate_document(&document)?;

    if violations.is_empty() {
        ui::looking_good();
        return Ok(());
    }

    ui::violations(&path.display().to_string(), &violations);
    Err(miette::miette!(
        "{} schema violation(s) in {}",
        violations.len(),
        path.display()
    ))
}

fn emit(outcome: &ScheduleOutcome, format: Format) {
    match format {
        Format::Json => println!("{}", outcome.to_json_pretty()),
        Format::Pretty => ui::outcome(outcome),
    }
}
