//! Sealdoc command-line binary.
//!
//! # Usage
//!
//! ```bash
//! # Seal a text file (writes notes.txt.sealed)
//! sealdoc seal notes.txt
//!
//! # Open with explicit key material
//! sealdoc --key 00112233445566778899aabbccddeeff \
//!         --iv 0f0e0d0c0b0a09080706050403020100 open notes.txt.sealed
//!
//! # Check integrity without printing the content
//! sealdoc verify notes.txt.sealed
//! ```
//!
//! Without `--key`/`--iv` (or `SEALDOC_KEY`/`SEALDOC_IV`) the legacy embedded
//! key material is used so files from the legacy editor still open.

mod commands;

use std::{
    io::{self, Write},
    path::PathBuf,
};

use clap::{Parser, Subcommand};
use commands::CliError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Tamper-evident document tool
#[derive(Parser, Debug)]
#[command(name = "sealdoc")]
#[command(about = "Seal and open tamper-evident documents (SM4-CBC + SM3)")]
#[command(version)]
struct Args {
    /// Cipher key, 32 hex characters
    #[arg(long, env = "SEALDOC_KEY", global = true, hide_env_values = true)]
    key: Option<String>,

    /// CBC initialization vector, 32 hex characters
    #[arg(long, env = "SEALDOC_IV", global = true, hide_env_values = true)]
    iv: Option<String>,

    /// Audit log file
    #[arg(long, default_value = "log/secure_editor.log", global = true)]
    audit_log: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encrypt a UTF-8 text file into an envelope
    Seal {
        /// Plain text file
        input: PathBuf,

        /// Envelope path (default: `<INPUT>.sealed`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify and decrypt an envelope
    Open {
        /// Envelope file
        input: PathBuf,

        /// Write plaintext here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Treat a file without the magic tag as a new, empty document
        #[arg(long)]
        allow_unmanaged: bool,
    },

    /// Run every integrity check without emitting the plaintext
    Verify {
        /// Envelope file
        input: PathBuf,
    },

    /// Print the SM3 digest of a file
    Hash {
        /// Any file
        input: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // stdout carries document content, so diagnostics go to stderr
    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    run(args)?;
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    let store = || commands::open_store(args.key.as_deref(), args.iv.as_deref(), &args.audit_log);

    match args.command {
        Command::Seal { input, output } => {
            let written = commands::seal(&store()?, &input, output.as_deref())?;
            writeln!(stdout, "{}", written.display()).map_err(CliError::Stdout)
        },
        Command::Open { input, output, allow_unmanaged } => {
            commands::open(&store()?, &input, output.as_deref(), allow_unmanaged, &mut stdout)
        },
        Command::Verify { input } => commands::verify(&store()?, &input, &mut stdout),
        Command::Hash { input } => commands::hash(&input, &mut stdout),
    }
}
