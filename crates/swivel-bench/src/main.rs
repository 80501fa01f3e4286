//! swivel-bench: CLI tool for running the tool-transition stage on path files.
//!
//! Loads a JSON path file (the in-memory format produced by the G-code
//! parser, serialized with serde), runs the tool-transition stage with
//! configurable parameters, and prints sequencing diagnostics. Useful for:
//!
//! - Tuning the angular limit against real jobs
//! - Comparing staging-area placements and radii
//! - Measuring sequencing time on large files
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin swivel-bench -- [OPTIONS] <PATH_FILE>
//! ```
//!
//! Set `RUST_LOG=swivel_pipeline=trace` to log every placed path.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use swivel_pipeline::{PathFile, Point, TransitionConfig, TransitionResult};
use tracing_subscriber::EnvFilter;

/// Tool-transition sequencing diagnostics for swivel.
///
/// Runs the tool-transition stage on a JSON path file with configurable
/// parameters and prints a report of rotations, continuity matches and
/// travel distance.
#[derive(Parser)]
#[command(name = "swivel-bench", version)]
struct Cli {
    /// Path to the input path file (JSON).
    path_file: PathBuf,

    /// Maximum heading change (degrees) that avoids a rotation maneuver.
    #[arg(long, default_value_t = TransitionConfig::DEFAULT_ANGULAR_LIMIT_DEGREES)]
    angular_limit: f64,

    /// X coordinate of the tool orientation change area.
    #[arg(long, default_value_t = TransitionConfig::DEFAULT_STAGING_X, allow_hyphen_values = true)]
    staging_x: f64,

    /// Y coordinate of the tool orientation change area.
    #[arg(long, default_value_t = TransitionConfig::DEFAULT_STAGING_Y, allow_hyphen_values = true)]
    staging_y: f64,

    /// Radius of the staging circle used for rotation maneuvers.
    #[arg(long, default_value_t = TransitionConfig::DEFAULT_TOOL_ROTATION_RADIUS)]
    rotation_radius: f64,

    /// Iteration guard for the sequencer.
    #[arg(long, default_value_t = TransitionConfig::DEFAULT_ITERATION_LIMIT)]
    iteration_limit: usize,

    /// Write the transformed path file (JSON) to this location.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Number of runs for averaging.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Output diagnostics as JSON instead of human-readable report.
    #[arg(long)]
    json: bool,

    /// Full transition config as a JSON string.
    ///
    /// When provided, all other parameter flags are ignored.
    /// The JSON must be a valid `TransitionConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,
}

/// Build a [`TransitionConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored. Otherwise, a config is
/// assembled from the individual flags.
fn config_from_cli(cli: &Cli) -> Result<TransitionConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(TransitionConfig::default()
        .with_tool_orientation_change_area(Point::down(cli.staging_x, cli.staging_y))
        .with_tool_rotation_radius(cli.rotation_radius)
        .with_iteration_limit(cli.iteration_limit)
        .with_angular_limit_degrees(cli.angular_limit))
}

/// Load and deserialize the input path file.
fn load_path_file(path: &std::path::Path) -> Result<PathFile, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    serde_json::from_str(&json).map_err(|e| format!("Error parsing {}: {e}", path.display()))
}

/// Serialize the transformed path file to `path`.
fn write_output(result: &TransitionResult, path: &std::path::Path) -> Result<usize, String> {
    let json = serde_json::to_string_pretty(&result.file)
        .map_err(|e| format!("Error serializing output: {e}"))?;
    std::fs::write(path, &json).map_err(|e| format!("Error writing {}: {e}", path.display()))?;
    Ok(json.len())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let file = match load_path_file(&cli.path_file) {
        Ok(file) => file,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    eprintln!(
        "Path file: {} ({} paths)",
        cli.path_file.display(),
        file.paths.len(),
    );
    eprintln!("Config: {config:#?}");
    eprintln!("Runs: {}", cli.runs);
    eprintln!();

    let mut durations = Vec::with_capacity(cli.runs);

    for run in 0..cli.runs {
        if cli.runs > 1 {
            eprintln!("--- Run {}/{} ---", run + 1, cli.runs);
        }

        let start = Instant::now();
        let result = match swivel_pipeline::add_tool_transitions(file.clone(), &config) {
            Ok(result) => result,
            Err(e) => {
                eprintln!("Sequencing error: {e}");
                return ExitCode::FAILURE;
            }
        };
        let elapsed = start.elapsed();
        durations.push(elapsed);

        if cli.json {
            match serde_json::to_string_pretty(&result.diagnostics) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error serializing diagnostics: {e}");
                    return ExitCode::FAILURE;
                }
            }
        } else {
            println!("{}", result.diagnostics.report());
            println!("Duration: {:.3}ms", elapsed.as_secs_f64() * 1000.0);
        }

        if let Some(truncation) = result.truncation {
            eprintln!(
                "Warning: iteration limit reached after {} iterations, {} paths dropped",
                truncation.iterations, truncation.dropped_paths,
            );
        }

        // Write output on the first run only.
        if run == 0
            && let Some(ref output_path) = cli.output
        {
            match write_output(&result, output_path) {
                Ok(bytes) => {
                    eprintln!("Output written to {} ({bytes} bytes)", output_path.display());
                }
                Err(msg) => {
                    eprintln!("{msg}");
                    return ExitCode::FAILURE;
                }
            }
        }

        if cli.runs > 1 {
            eprintln!();
        }
    }

    if cli.runs > 1 {
        print_multi_run_summary(&durations);
    }

    ExitCode::SUCCESS
}

/// Print aggregated timing across multiple runs.
#[allow(clippy::cast_precision_loss)]
fn print_multi_run_summary(durations: &[Duration]) {
    println!();
    println!("Summary ({} runs)\n{}", durations.len(), "=".repeat(60));

    if durations.is_empty() {
        println!("Warning: no runs to summarize");
        return;
    }

    let millis: Vec<f64> = durations
        .iter()
        .map(|d| d.as_secs_f64() * 1000.0)
        .collect();

    let min = millis.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = millis.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = millis.iter().sum::<f64>() / millis.len() as f64;

    println!("Total duration: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms");
}
