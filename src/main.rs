use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vatio::cli::{Cli, OutputFormat};
use vatio::csv_output::CsvExport;
use vatio::energy::{EnergyConfig, EnergyReading};
use vatio::gateway::SuggestionGateway;
use vatio::json_output::JsonAnalysis;
use vatio::profiler::{ExecutionProfiler, ProfilerConfig};
use vatio::report;
use vatio::score::{self, SessionState};
use vatio::stats::{self, RankedStats, DETAIL_LIMIT};

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Print the human-readable result for one run
fn print_text(
    grade: score::Grade,
    reading: &EnergyReading,
    delta: Option<f64>,
    config: &EnergyConfig,
) {
    println!("{}", report::render(grade, reading, config));
    println!();
    println!(
        "Battery impact: {:.6}%",
        config.battery_impact_percent(reading.total_joules)
    );
    println!(
        "Tree equivalent: {:.8} trees",
        config.tree_equivalent(reading.total_joules)
    );
    match delta {
        Some(change) if change > 0.0 => println!("\u{2193} Energy reduced by {change:.2}%"),
        Some(change) if change < 0.0 => {
            println!("\u{2191} Energy increased by {:.2}%", change.abs());
        }
        Some(_) => println!("\u{2192} Energy unchanged"),
        None => println!("\u{2192} No comparison available"),
    }
}

/// Ask the gateway for a rewrite; failures degrade to a notice and never
/// disturb the already-printed results.
fn print_suggestion(model: &str, path: &Path, source: &str, total_joules: f64) {
    let result =
        SuggestionGateway::new(model).and_then(|gw| gw.suggest(source, total_joules));
    match result {
        Ok(suggestion) => {
            println!("\nAI OPTIMIZATION");
            println!("{}", "-".repeat(30));
            if let Some(advice) = &suggestion.advice {
                println!("{advice}");
            }
            if let Some(code) = &suggestion.optimized_source {
                let out = path.with_extension("optimized.py");
                match std::fs::write(&out, code) {
                    Ok(()) => println!("\nOptimized rewrite written to {}", out.display()),
                    Err(err) => eprintln!(
                        "vatio: could not write optimized rewrite to {}: {err}",
                        out.display()
                    ),
                }
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "suggestion gateway failed");
            println!("\nNo optimization suggestion available.");
        }
    }
}

/// Run the full pipeline for one file: profile, aggregate, estimate,
/// grade, print. The session state is read and overwritten exactly once.
fn analyze_file(
    path: &Path,
    profiler: &ExecutionProfiler,
    config: &EnergyConfig,
    summary_limit: usize,
    session: &mut SessionState,
    args: &Cli,
) -> Result<()> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;

    let raw = profiler.profile(&source)?;
    let summary: RankedStats = stats::aggregate(&raw, summary_limit);
    let detail: RankedStats = stats::aggregate(&raw, DETAIL_LIMIT);

    let reading = EnergyReading::from_ranked(&summary, config);
    let grade = score::grade(reading.total_joules);
    let delta = session.record(reading.total_joules);

    match args.format {
        OutputFormat::Text => print_text(grade, &reading, delta, config),
        OutputFormat::Json => {
            let analysis = JsonAnalysis::new(grade, &reading, delta, &detail, config);
            println!("{}", analysis.to_json()?);
        }
        OutputFormat::Csv => {
            print!("{}", CsvExport::from_ranked(&detail, config).to_csv());
        }
    }

    if args.suggest {
        print_suggestion(&args.model, path, &source, reading.total_joules);
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    if args.top == 0 {
        anyhow::bail!("Invalid value for --top: 0 (must be >= 1)");
    }

    init_tracing(args.debug);

    let config = EnergyConfig {
        tdp_watts: args.tdp_watts,
        ..EnergyConfig::default()
    };
    config.validate()?;

    let profiler = ExecutionProfiler::new(ProfilerConfig {
        python: args.python.clone(),
        timeout: Duration::from_secs(args.timeout_secs),
    });

    // One session spans the whole file list; files analyzed in sequence
    // compare against each other, nothing persists past this process.
    let mut session = SessionState::new();
    let mut failures = 0usize;

    for (index, path) in args.files.iter().enumerate() {
        if matches!(args.format, OutputFormat::Text) && args.files.len() > 1 {
            if index > 0 {
                println!();
            }
            println!("=== {} ===", path.display());
        }
        if let Err(err) = analyze_file(path, &profiler, &config, args.top, &mut session, &args) {
            // A failed run produces no numbers at all for that file.
            eprintln!("vatio: {}: {err:#}", path.display());
            failures += 1;
        }
    }

    if failures > 0 {
        anyhow::bail!(
            "{failures} of {} file(s) could not be analyzed",
            args.files.len()
        );
    }
    Ok(())
}
