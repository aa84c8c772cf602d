//! @ai:module:intent CLI for the storbench analysis pipeline
//! @ai:module:layer presentation

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use storbench::{
    config::AnalysisConfig,
    metrics::MetricName,
    report::ReportGenerator,
    AnalysisOutcome, Analyzer, Aggregator,
};

const DEFAULT_CONFIG_FILE: &str = "storbench.toml";

#[derive(Parser)]
#[command(name = "storbench")]
#[command(about = "Aggregate fio benchmark results and flag unstable metrics against a baseline")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a results directory and write the comparison report
    Run {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory holding fio JSON result files
        #[arg(short, long)]
        results_dir: Option<PathBuf>,

        /// Standard deviation at or above which a metric is flagged
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Path of the text report
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write a JSON report to this path
        #[arg(long)]
        json: Option<PathBuf>,

        /// Load result files in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Check that every result file loads and extracts cleanly
    Validate {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory holding fio JSON result files
        #[arg(short, long)]
        results_dir: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },

    /// List recognized metric names
    Metrics,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("storbench={}", level).parse()?),
        )
        .init();

    match cli.command {
        Commands::Run {
            config,
            results_dir,
            threshold,
            output,
            json,
            parallel,
        } => run_analysis(RunArgs {
            config,
            results_dir,
            threshold,
            output,
            json,
            parallel,
        }),
        Commands::Validate {
            config,
            results_dir,
        } => validate(config, results_dir),
        Commands::Init { output } => init_config(output),
        Commands::Metrics => list_metrics(),
    }
}

struct RunArgs {
    config: Option<PathBuf>,
    results_dir: Option<PathBuf>,
    threshold: Option<f64>,
    output: Option<PathBuf>,
    json: Option<PathBuf>,
    parallel: bool,
}

/// @ai:intent Run the full pipeline and write reports
/// @ai:effects fs:read, fs:write
fn run_analysis(args: RunArgs) -> Result<()> {
    let mut config = load_or_default_config(args.config)?;

    if let Some(dir) = args.results_dir {
        config.paths.results_dir = dir;
    }
    if let Some(threshold) = args.threshold {
        config.analysis.stddev_threshold = threshold;
    }
    if let Some(output) = args.output {
        config.paths.report_file = output;
    }
    if args.json.is_some() {
        config.paths.json_report = args.json;
    }
    config.discovery.parallel |= args.parallel;
    config.validate()?;

    tracing::info!(
        "Analyzing results in {}",
        config.paths.results_dir.display()
    );

    let outcome = Analyzer::from_config(&config).analyze(&config.paths.results_dir)?;
    ReportGenerator::new().generate_all(&outcome, &config.paths)?;

    print_summary(&outcome);
    println!(
        "Evaluation complete, see report in [{}]",
        config.paths.report_file.display()
    );
    Ok(())
}

/// @ai:intent Load and extract every file, reporting per-file status
/// @ai:effects fs:read
fn validate(config_path: Option<PathBuf>, results_dir: Option<PathBuf>) -> Result<()> {
    let mut config = load_or_default_config(config_path)?;
    if let Some(dir) = results_dir {
        config.paths.results_dir = dir;
    }
    config.validate()?;

    let aggregator = Aggregator::new(config.discovery.clone(), &config.analysis.metrics);
    let checks = aggregator.check(&config.paths.results_dir)?;

    for check in &checks {
        if check.is_ok() {
            println!("  ok    {} ({} jobs)", check.path.display(), check.jobs);
            continue;
        }

        println!("  FAIL  {}", check.path.display());
        for failure in &check.failures {
            match failure.job_index {
                Some(index) => println!(
                    "        job {} [{}]: {}",
                    index, failure.kind, failure.message
                ),
                None => println!("        [{}]: {}", failure.kind, failure.message),
            }
        }
    }

    let failed = checks.iter().filter(|c| !c.is_ok()).count();
    println!("Checked {} files, {} failed", checks.len(), failed);
    if failed > 0 {
        bail!("{} result files failed validation", failed);
    }
    Ok(())
}

fn init_config(output: PathBuf) -> Result<()> {
    let config = AnalysisConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

fn list_metrics() -> Result<()> {
    for name in MetricName::ALL {
        let marker = if MetricName::DEFAULT_TRACKED.contains(&name) {
            " (default)"
        } else {
            ""
        };
        println!("{}{}", name, marker);
    }
    Ok(())
}

fn load_or_default_config(path: Option<PathBuf>) -> Result<AnalysisConfig> {
    match path {
        Some(p) => AnalysisConfig::load(&p),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);

            if default_path.exists() {
                AnalysisConfig::load(&default_path)
            } else {
                Ok(AnalysisConfig::default())
            }
        }
    }
}

fn print_summary(outcome: &AnalysisOutcome) {
    let run = &outcome.run;

    println!();
    println!("=== Analysis Summary ===");
    println!(
        "Files: {} loaded / {} found",
        run.files_loaded, run.files_discovered
    );
    println!("Jobs:  {}", run.jobs_processed);
    println!("Stddev threshold: {}", outcome.stddev_threshold);

    let flagged: Vec<String> = outcome.flagged().map(|c| c.metric.to_string()).collect();
    if flagged.is_empty() {
        println!("Flagged metrics: none");
    } else {
        println!("Flagged metrics: {}", flagged.join(", "));
    }

    if !run.failures.is_empty() {
        println!();
        println!("Skipped inputs:");
        for failure in &run.failures {
            match failure.job_index {
                Some(index) => println!(
                    "  {} job {} [{}]: {}",
                    failure.path.display(),
                    index,
                    failure.kind,
                    failure.message
                ),
                None => println!(
                    "  {} [{}]: {}",
                    failure.path.display(),
                    failure.kind,
                    failure.message
                ),
            }
        }
    }
}
