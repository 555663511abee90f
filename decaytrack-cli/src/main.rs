//! decaytrack CLI
//!
//! Runs the implant/decay correlation over event files and extracts dZ from
//! the filtered output.
#![allow(clippy::uninlined_format_args, clippy::too_many_lines)]

use clap::{Parser, Subcommand};

use decaytrack_actions::{dz_histogram, extract_dz, ActionRegistry, DzConfig};
use decaytrack_io::{DataFileWriter, DetectorConfig, EventFileReader, MultiActionConfig};
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    DecaytrackIo(#[from] decaytrack_io::Error),

    #[error("Core error: {0}")]
    Core(#[from] decaytrack_core::Error),
}

/// Implant/decay correlation for active-target TPC events.
#[derive(Parser)]
#[command(name = "decaytrack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the configured action chain over an event file
    Filter {
        /// Input event file (JSON lines)
        input: PathBuf,

        /// Output event file
        #[arg(short, long)]
        output: PathBuf,

        /// Multi-action configuration (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Per-event diagnostics from every action
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the events that survived the filter as `run entry` lines
    DecayEvents {
        /// Filtered event file(s)
        #[arg(required = true)]
        input: Vec<PathBuf>,

        /// Output text file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Histogram the implant/decay dZ of filtered events
    Dz {
        /// Filtered event file(s)
        #[arg(required = true)]
        input: Vec<PathBuf>,

        /// Multi-action configuration holding the Lxy threshold
        #[arg(short, long)]
        config: PathBuf,

        /// Detector configuration holding the drift factor
        #[arg(short, long)]
        detector: Option<PathBuf>,

        /// Output histogram (CSV)
        #[arg(short, long)]
        output: PathBuf,

        /// Also write per-event dZ values (CSV)
        #[arg(long)]
        entries: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the action chain described by a configuration
    PrintConfig {
        /// Multi-action configuration (JSON)
        config: PathBuf,
    },
}

/// Default log filter when `RUST_LOG` is unset.
///
/// Verbose actions report through `log` at `info` level.
fn default_log_filter(verbose: bool) -> &'static str {
    if verbose {
        "info"
    } else {
        "warn"
    }
}

fn init_logging(verbose: bool) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_log_filter(verbose)),
    )
    .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Filter {
            input,
            output,
            config,
            verbose,
        } => {
            let start = Instant::now();
            let registry = ActionRegistry::default();
            let mut chain = MultiActionConfig::from_file(&config)?.build_chain(&registry)?;
            init_logging(verbose || chain.any_verbose());
            if verbose {
                chain.set_verbose(true);
                eprintln!("{}", chain.summary());
                eprintln!("Reading: {}", input.display());
            }

            let mut events = EventFileReader::open(&input)?.read_events()?;
            let stats = chain.run_all(events.iter_mut());

            let mut writer = DataFileWriter::create(&output)?;
            writer.write_events_jsonl(&events)?;
            writer.flush()?;
            if verbose {
                eprintln!("Writing output to: {}", output.display());
            }

            println!(
                "Processed {} events in {:.2}s",
                stats.events,
                start.elapsed().as_secs_f64()
            );
            println!("Kept: {}", stats.kept);
            println!("Cleared: {}", stats.cleared);
        }

        Commands::DecayEvents { input, output } => {
            init_logging(false);
            let mut writer = DataFileWriter::create(&output)?;
            let mut total = 0usize;
            for path in &input {
                let events = EventFileReader::open(path)?.read_events()?;
                total += writer.write_decay_list(&events)?;
            }
            writer.flush()?;
            println!("Correlated decays: {}", total);
        }

        Commands::Dz {
            input,
            config,
            detector,
            output,
            entries,
            verbose,
        } => {
            init_logging(verbose);
            let min_lxy = MultiActionConfig::from_file(&config)?.correlate()?.min_length;
            let mut dz_config = DzConfig::new(min_lxy);
            if let Some(path) = &detector {
                let drift = DetectorConfig::from_file(path)?.drift_factor();
                dz_config = dz_config.with_drift_factor(drift);
            }
            if verbose {
                eprintln!("Max Lxy: {}", dz_config.max_lxy);
                if let Some(drift) = dz_config.drift_factor {
                    eprintln!("Drift factor: {}", drift);
                }
            }

            let mut all_entries = Vec::new();
            for path in &input {
                if verbose {
                    eprintln!("Reading: {}", path.display());
                }
                let events = EventFileReader::open(path)?.read_events()?;
                all_entries.extend(extract_dz(&events, &dz_config)?);
            }

            let hist = dz_histogram(&all_entries)?;
            let mut writer = DataFileWriter::create(&output)?;
            writer.write_histogram_csv(&hist)?;
            writer.flush()?;

            if let Some(path) = &entries {
                let mut writer = DataFileWriter::create(path)?;
                writer.write_dz_csv(&all_entries, dz_config.drift_factor)?;
                writer.flush()?;
            }

            println!("Events with decay: {}", all_entries.len());
            println!(
                "Underflow: {}  Overflow: {}",
                hist.underflow(),
                hist.overflow()
            );
        }

        Commands::PrintConfig { config } => {
            init_logging(false);
            let chain =
                MultiActionConfig::from_file(&config)?.build_chain(&ActionRegistry::default())?;
            println!("{}", chain.summary());
        }
    }

    Ok(())
}
