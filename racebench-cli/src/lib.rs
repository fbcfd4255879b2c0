#![warn(missing_docs)]
//! racebench CLI Library
//!
//! The scheduler that runs suites plus the command-line harness for benchmark
//! binaries. Build your suites in code and hand them to [`run`]:
//!
//! ```ignore
//! use racebench::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let suite = Suite::new("parse")
//!         .reference("std", from_fn(|| "42".parse::<u32>()))?
//!         .case("manual", from_fn(|| manual_parse("42")))?;
//!     racebench::run(vec![suite])
//! }
//! ```

mod config;
mod executor;
mod planner;

pub use config::*;
pub use executor::{
    CaseMeasurement, RawOutcome, RunOptions, Scheduler, SuiteRun, build_report,
    build_report_meta, compute_statistics, format_banner, format_human_output, run_suites,
};
pub use planner::{ExecutionPlan, build_plan};

use clap::Parser;
use racebench_core::Suite;
use racebench_report::{
    OutputFormat, Report, generate_csv_report, generate_json_report, generate_markdown_report,
};
use regex::Regex;
use std::io::Write;
use std::path::PathBuf;

/// racebench CLI arguments
#[derive(Parser, Debug, Default)]
#[command(name = "racebench")]
#[command(author, version, about = "racebench - statistical throughput races for Rust")]
pub struct Cli {
    /// Only run suites or cases whose name matches this regex
    #[arg(long, short = 'f')]
    pub filter: Option<String>,

    /// Output format: human, json, csv, markdown
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Seed for the case-ordering generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Measurement time per case (e.g. "2s", "500ms")
    #[arg(long)]
    pub time_budget: Option<String>,

    /// Minimum samples per case
    #[arg(long)]
    pub min_samples: Option<usize>,

    /// Hard wall-clock ceiling per case
    #[arg(long)]
    pub max_wall_clock: Option<String>,

    /// Deadline for each suite; remaining cases are cancelled
    #[arg(long)]
    pub suite_timeout: Option<String>,

    /// Confidence level for the margin of error (e.g. 0.99)
    #[arg(long)]
    pub confidence: Option<f64>,

    /// Configuration file (default: discover racebench.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// List suites and cases without running them
    #[arg(long)]
    pub list: bool,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Internal: Absorb cargo bench's --bench flag
    #[arg(long, hide = true)]
    pub bench: bool,
}

/// How a CLI invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every executed suite had at least one successful case
    Success,
    /// At least one executed suite had no successful case
    NoSuccessfulCandidates,
    /// Suites were listed, not run
    Listed,
}

impl RunStatus {
    /// Process exit code
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::NoSuccessfulCandidates => 1,
            RunStatus::Success | RunStatus::Listed => 0,
        }
    }
}

/// Run the racebench CLI over `suites`.
/// This is the main entry point for benchmark binaries.
///
/// Exits the process with status 1 when any executed suite has no successful
/// case.
pub fn run(suites: Vec<Suite>) -> anyhow::Result<()> {
    let cli = Cli::parse();
    let status = run_with_cli(cli, suites)?;
    if status.exit_code() != 0 {
        std::process::exit(status.exit_code());
    }
    Ok(())
}

/// Run the racebench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli, suites: Vec<Suite>) -> anyhow::Result<RunStatus> {
    init_tracing(cli.verbose);

    // Discover racebench.toml configuration (CLI flags override)
    let config = match &cli.config {
        Some(path) => RaceConfig::load(path)?,
        None => RaceConfig::discover().unwrap_or_default(),
    };

    let filter = cli.filter.as_deref().map(Regex::new).transpose()?;
    let plan = build_plan(suites, filter.as_ref());

    if cli.list {
        print!("{}", format_plan(&plan));
        return Ok(RunStatus::Listed);
    }

    let format = resolve_format(&cli, &config)?;
    let options = build_run_options(&cli, &config)?;
    let seed = cli
        .seed
        .or(config.runner.seed)
        .unwrap_or_else(rand::random);

    tracing::info!(seed, "ordering generator seeded");
    eprintln!(
        "Running {} suite(s), {} case(s), seed {}...",
        plan.suites.len(),
        plan.case_count(),
        seed
    );

    let mut suites = plan.suites;
    let mut scheduler = Scheduler::new(seed);
    let report = run_suites(&mut suites, &mut scheduler, &options);

    let output = render(&report, format)?;

    // Write output
    if let Some(ref path) = cli.output {
        let mut file = std::fs::File::create(path)?;
        file.write_all(output.as_bytes())?;
        eprintln!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }

    if report.has_unsuccessful_suite() {
        for suite in report
            .suites
            .iter()
            .filter(|s| s.ranking.no_successful_candidates)
        {
            eprintln!("Suite '{}' has no successful candidates", suite.name);
        }
        return Ok(RunStatus::NoSuccessfulCandidates);
    }

    Ok(RunStatus::Success)
}

/// Render a report in the chosen format
pub fn render(report: &Report, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => generate_json_report(report)?,
        OutputFormat::Csv => generate_csv_report(report),
        OutputFormat::Markdown => generate_markdown_report(report),
        OutputFormat::Human => {
            let mut output = format_banner(&report.meta);
            output.push_str(&format_human_output(report));
            output
        }
    })
}

fn init_tracing(verbose: bool) {
    let directive = if verbose {
        "racebench=debug"
    } else {
        "racebench=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directive));
    // A subscriber may already be installed by the host binary or an earlier run
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve_format(cli: &Cli, config: &RaceConfig) -> Result<OutputFormat, ConfigError> {
    match &cli.format {
        Some(f) => f.parse().map_err(ConfigError::UnknownFormat),
        None => config.output_format(),
    }
}

/// Build run options by layering: racebench.toml values → CLI overrides.
pub fn build_run_options(cli: &Cli, config: &RaceConfig) -> Result<RunOptions, ConfigError> {
    let mut options = config.run_options()?;

    if let Some(budget) = &cli.time_budget {
        options.time_budget = RaceConfig::parse_duration(budget)?;
    }
    if let Some(n) = cli.min_samples {
        options.min_samples = n;
    }
    if let Some(ceiling) = &cli.max_wall_clock {
        options.max_wall_clock = RaceConfig::parse_duration(ceiling)?;
    }
    if let Some(timeout) = &cli.suite_timeout {
        options.suite_timeout = Some(RaceConfig::parse_duration(timeout)?);
    }
    if let Some(level) = cli.confidence {
        options.confidence_level = validate_confidence(level)?;
    }
    if cli.no_progress {
        options.show_progress = false;
    }

    Ok(options)
}

/// Tree listing of planned suites, as printed by `--list`
pub fn format_plan(plan: &ExecutionPlan) -> String {
    let mut output = String::from("racebench plan:\n");
    for suite in &plan.suites {
        output.push_str(&format!("├── suite: {}\n", suite.name()));
        for case in suite.cases() {
            let marker = if case.is_reference() {
                " (reference)"
            } else if case.is_skipped() {
                " (skipped)"
            } else {
                ""
            };
            output.push_str(&format!("│   ├── {}{}\n", case.name(), marker));
        }
    }
    output.push_str(&format!(
        "{} suite(s), {} case(s) found.\n",
        plan.suites.len(),
        plan.case_count()
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use racebench_core::{ExecutionError, from_fn};
    use std::time::Duration;

    fn quick_cli() -> Cli {
        Cli {
            time_budget: Some("0".to_string()),
            min_samples: Some(1),
            no_progress: true,
            format: Some("json".to_string()),
            seed: Some(3),
            ..Cli::default()
        }
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from([
            "racebench",
            "--filter",
            "json",
            "--seed",
            "42",
            "--time-budget",
            "250ms",
            "--min-samples",
            "3",
            "--confidence",
            "0.99",
            "--no-progress",
            "--bench",
        ]);
        assert_eq!(cli.filter.as_deref(), Some("json"));
        assert_eq!(cli.seed, Some(42));

        let options = build_run_options(&cli, &RaceConfig::default()).unwrap();
        assert_eq!(options.time_budget, Duration::from_millis(250));
        assert_eq!(options.min_samples, 3);
        assert_eq!(options.confidence_level, 0.99);
        assert!(!options.show_progress);
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut config = RaceConfig::default();
        config.runner.time_budget = "9s".to_string();
        config.runner.min_samples = 9;

        let cli = Cli {
            min_samples: Some(2),
            ..Cli::default()
        };
        let options = build_run_options(&cli, &config).unwrap();
        assert_eq!(options.time_budget, Duration::from_secs(9));
        assert_eq!(options.min_samples, 2);
    }

    #[test]
    fn test_bad_confidence_rejected() {
        let cli = Cli {
            confidence: Some(0.0),
            ..Cli::default()
        };
        assert!(build_run_options(&cli, &RaceConfig::default()).is_err());
    }

    #[test]
    fn test_exit_status() {
        let ok = Suite::new("ok").case("sum", from_fn(|| 1 + 1)).unwrap();
        let status = run_with_cli(quick_cli(), vec![ok]).unwrap();
        assert_eq!(status, RunStatus::Success);
        assert_eq!(status.exit_code(), 0);

        let bad = Suite::new("bad")
            .case("raises", || Err::<(), _>(ExecutionError::raised("nope")))
            .unwrap();
        let status = run_with_cli(quick_cli(), vec![bad]).unwrap();
        assert_eq!(status, RunStatus::NoSuccessfulCandidates);
        assert_eq!(status.exit_code(), 1);
    }

    #[test]
    fn test_filtered_out_suite_is_not_judged() {
        let bad = Suite::new("bad")
            .case("raises", || Err::<(), _>(ExecutionError::raised("nope")))
            .unwrap();
        let ok = Suite::new("ok").case("sum", from_fn(|| 1 + 1)).unwrap();
        let cli = Cli {
            filter: Some("^ok$".to_string()),
            ..quick_cli()
        };
        assert_eq!(run_with_cli(cli, vec![bad, ok]).unwrap(), RunStatus::Success);
    }

    #[test]
    fn test_list_plan() {
        let suite = Suite::new("parse")
            .reference("std", from_fn(|| "1".parse::<u8>()))
            .unwrap()
            .case("manual", from_fn(|| 1u8))
            .unwrap();
        let plan = build_plan(vec![suite], None);
        let listing = format_plan(&plan);
        assert!(listing.contains("suite: parse"));
        assert!(listing.contains("std (reference)"));
        assert!(listing.contains("1 suite(s), 2 case(s) found."));

        let cli = Cli {
            list: true,
            ..Cli::default()
        };
        assert_eq!(run_with_cli(cli, vec![]).unwrap(), RunStatus::Listed);
    }

    #[test]
    fn test_invalid_filter_is_error() {
        let cli = Cli {
            filter: Some("(".to_string()),
            ..quick_cli()
        };
        assert!(run_with_cli(cli, vec![]).is_err());
    }
}
