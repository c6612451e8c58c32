//! NT Summary Stats CLI
//!
//! Computes neutrino telescope sensor summary statistics from the command line.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use nt_summary_stats::{
    compute_summary_stats, compute_summary_stats_batch, process_prometheus_event, Config,
    OutputFormat, PrometheusEvent, ReportBuilder, SummaryStats, STAT_NAMES, VERSION,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nt-summary-stats")]
#[command(version = VERSION)]
#[command(about = "Summary statistics for neutrino telescope sensor pulses", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute statistics for a single sensor
    Compute {
        /// Comma-separated pulse times (ns)
        #[arg(long, allow_hyphen_values = true)]
        times: String,

        /// Comma-separated pulse charges
        #[arg(long, allow_hyphen_values = true)]
        charges: String,

        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Compute statistics for a batch of sensors from a JSON file
    Batch {
        /// JSON file with `times_list` and `charges_list`
        file: PathBuf,

        /// Process sensors in parallel (requires parallel feature)
        #[arg(long)]
        parallel: bool,
    },

    /// Compute per-sensor statistics for a Prometheus event
    Event {
        /// Prometheus event JSON file
        file: PathBuf,

        /// Group hits within this window (ns) before summarising
        #[arg(long)]
        grouping_window_ns: Option<f64>,

        /// Output format (json or jsonl)
        #[arg(long)]
        format: Option<String>,

        /// Write the report to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Write the report to the configured export directory
        #[arg(long, conflicts_with = "output")]
        export: bool,
    },

    /// List the statistics by output index
    Names,

    /// Show configuration
    Config,
}

/// Batch input file layout.
#[derive(Deserialize)]
struct BatchInput {
    times_list: Vec<Vec<f64>>,
    charges_list: Vec<Vec<f64>>,
}

fn main() {
    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config, using defaults: {e}");
        Config::default()
    });
    init_logging(&config.log_filter);

    let result = match cli.command {
        Commands::Compute {
            times,
            charges,
            json,
        } => cmd_compute(&times, &charges, json),
        Commands::Batch { file, parallel } => cmd_batch(&file, parallel || config.parallel),
        Commands::Event {
            file,
            grouping_window_ns,
            format,
            output,
            export,
        } => cmd_event(
            &config,
            &file,
            grouping_window_ns.or(config.grouping_window_ns),
            format.as_deref(),
            output,
            export,
        ),
        Commands::Names => {
            cmd_names();
            Ok(())
        }
        Commands::Config => cmd_config(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Set up logging to stderr, honouring `RUST_LOG` first.
fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_compute(times: &str, charges: &str, json: bool) -> Result<()> {
    let times = parse_values(times).context("invalid --times")?;
    let charges = parse_values(charges).context("invalid --charges")?;

    let stats = compute_summary_stats(&times, &charges)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_stats(&stats);
    }
    Ok(())
}

fn cmd_batch(file: &Path, parallel: bool) -> Result<()> {
    let content =
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let input: BatchInput =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", file.display()))?;

    let results = run_batch(&input, parallel)?;
    info!(sensors = results.len(), "batch complete");

    let rows: Vec<[f64; 9]> = results.iter().map(SummaryStats::to_array).collect();
    println!("{}", serde_json::to_string(&rows)?);
    Ok(())
}

#[cfg(feature = "parallel")]
fn run_batch(input: &BatchInput, parallel: bool) -> Result<Vec<SummaryStats>> {
    let results = if parallel {
        nt_summary_stats::compute_summary_stats_batch_par(&input.times_list, &input.charges_list)?
    } else {
        compute_summary_stats_batch(&input.times_list, &input.charges_list)?
    };
    Ok(results)
}

#[cfg(not(feature = "parallel"))]
fn run_batch(input: &BatchInput, parallel: bool) -> Result<Vec<SummaryStats>> {
    if parallel {
        eprintln!("Warning: --parallel ignored (parallel feature not enabled at compile time)");
    }
    Ok(compute_summary_stats_batch(
        &input.times_list,
        &input.charges_list,
    )?)
}

fn cmd_event(
    config: &Config,
    file: &Path,
    grouping_window_ns: Option<f64>,
    format: Option<&str>,
    output: Option<PathBuf>,
    export: bool,
) -> Result<()> {
    let format = match format {
        Some(f) => f.parse::<OutputFormat>()?,
        None => config.output_format,
    };

    let content =
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let event: PrometheusEvent =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", file.display()))?;

    let summary = process_prometheus_event(&event, grouping_window_ns)?;
    info!(
        sensors = summary.sensors.len(),
        hits = summary.hit_count(),
        "event processed"
    );

    let builder = ReportBuilder::new().with_source(file.display().to_string());
    let report = builder.build(&summary, grouping_window_ns);
    let rendered = match format {
        OutputFormat::Json => report.to_json()?,
        OutputFormat::Jsonl => report.to_jsonl()?,
    };

    let destination = if export {
        config.ensure_directories()?;
        Some(config.export_path.join(format!(
            "summary_{}.{}",
            Utc::now().format("%Y%m%d_%H%M%S"),
            format.extension()
        )))
    } else {
        output
    };

    match destination {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Exported {} sensors to {path:?}", report.sensors.len());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn cmd_names() {
    for (index, name) in STAT_NAMES.iter().enumerate() {
        println!("{index}  {name}");
    }
}

fn cmd_config(config: &Config) -> Result<()> {
    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

fn print_stats(stats: &SummaryStats) {
    let width = STAT_NAMES.iter().map(|name| name.len()).max().unwrap_or(0);
    for (name, value) in stats.named() {
        println!("{name:<width$}  {value}");
    }
}

/// Parse a comma-separated list of numbers. An empty string is an empty list.
fn parse_values(s: &str) -> Result<Vec<f64>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(Vec::new());
    }

    s.split(',')
        .map(|v| {
            let v = v.trim();
            match v.parse::<f64>() {
                Ok(value) => Ok(value),
                Err(_) => bail!("not a number: '{v}'"),
            }
        })
        .collect()
}
