//! Sigman CLI
//!
//! Serve the signal triage API, or run a single operation against a JSON file.

use std::fs;
use std::io::Read;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use sigman_core::{
    filter_by_pattern, filter_by_source, parse_batch, prioritize, sample, score_signals,
    validate_batch, PatternFlags, Signal,
};
use sigman_server::{
    ScoreSignalsResponse, ServerConfig, SignalServer, SignalsResponse, DEFAULT_ADDR,
    DEFAULT_MAX_BODY_BYTES,
};

#[derive(Parser)]
#[command(name = "sigman")]
#[command(author, version, about = "Sigman: signal filtering and EVA prioritisation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1")]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Bind address
        #[arg(long, env = "SIGMAN_ADDR", default_value = DEFAULT_ADDR)]
        addr: SocketAddr,

        /// Maximum request body size in bytes
        #[arg(long, env = "SIGMAN_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
        max_body_bytes: usize,

        /// Allow cross-origin requests from any origin
        #[arg(long, env = "SIGMAN_CORS")]
        cors: bool,
    },

    /// Print (id, EVA) pairs, highest first
    Score {
        /// JSON array of signals ("-" for stdin)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print signals ordered by EVA
    Prioritize {
        /// JSON array of signals ("-" for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Keep only the first N signals
        #[arg(short = 'k', long, allow_negative_numbers = true)]
        top_k: Option<i64>,
    },

    /// Keep signals from the given sources
    FilterSource {
        /// JSON array of signals ("-" for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Allowed source (repeatable); none keeps everything
        #[arg(short, long = "allow")]
        allow: Vec<String>,
    },

    /// Keep signals whose content matches a pattern
    FilterRegex {
        /// JSON array of signals ("-" for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Regular expression searched in each signal's content
        #[arg(short, long)]
        pattern: String,

        /// Flag bitmask (2 = ignore case, 8 = multiline, 16 = dot-all, 64 = verbose)
        #[arg(long, default_value = "0")]
        flags: i64,
    },

    /// Draw a uniform random sample
    Sample {
        /// JSON array of signals ("-" for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Number of signals to draw
        #[arg(short, long, allow_negative_numbers = true)]
        size: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging (stderr, so stdout stays machine-readable)
    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match cli.command {
        Commands::Serve {
            addr,
            max_body_bytes,
            cors,
        } => {
            let config = ServerConfig::default()
                .with_addr(addr)
                .with_max_body_bytes(max_body_bytes)
                .with_cors(cors);
            SignalServer::new(config).serve().await?;
        }
        Commands::Score { input } => {
            let signals = load_signals(&input)?;
            let scores = score_signals(&signals);
            print_json(&ScoreSignalsResponse { scores })?;
        }
        Commands::Prioritize { input, top_k } => {
            let signals = load_signals(&input)?;
            print_json(&SignalsResponse {
                signals: prioritize(&signals, top_k),
            })?;
        }
        Commands::FilterSource { input, allow } => {
            let signals = load_signals(&input)?;
            print_json(&SignalsResponse {
                signals: filter_by_source(&signals, &allow),
            })?;
        }
        Commands::FilterRegex {
            input,
            pattern,
            flags,
        } => {
            let signals = load_signals(&input)?;
            let flags = PatternFlags::from_bits(flags)?;
            print_json(&SignalsResponse {
                signals: filter_by_pattern(&signals, &pattern, flags)?,
            })?;
        }
        Commands::Sample { input, size } => {
            let signals = load_signals(&input)?;
            print_json(&SignalsResponse {
                signals: sample(&signals, size)?,
            })?;
        }
    }

    Ok(())
}

/// Read and validate a batch of signals
fn load_signals(input: &Path) -> Result<Vec<Signal>> {
    let json = if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read signals from stdin")?;
        buf
    } else {
        fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))?
    };

    let raw = parse_batch(&json).context("input must be a JSON array of signals")?;
    let signals = validate_batch(raw)?;
    debug!("Loaded {} signals", signals.len());
    Ok(signals)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
