//! Command-line front end: hashes stdin or a file, or prints the constant
//! table.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use eaglesong::params::{NUM_ROUNDS, REFERENCE_SEED};
use eaglesong::{generate_constants, hash_into, EaglesongError, Shake256Xof, DIGEST_LENGTH};
use tracing_subscriber::EnvFilter;

/// Largest output `hash --length` will produce, in bytes.
const MAX_OUTPUT_LENGTH: usize = 1 << 20;

#[derive(Parser)]
#[command(name = "eaglesong")]
#[command(about = "Eaglesong hash function", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash raw bytes from stdin (or a file) and print the digest as hex
    Hash {
        /// Read input from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,

        /// Output length in bytes
        #[arg(long, default_value_t = DIGEST_LENGTH)]
        length: usize,
    },

    /// Print the injection constant table derived from the reference seed
    Constants {
        #[arg(long, default_value_t = NUM_ROUNDS)]
        rounds: usize,
    },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Hash { file, length } => {
            anyhow::ensure!(
                length <= MAX_OUTPUT_LENGTH,
                "output length {length} exceeds the maximum of {MAX_OUTPUT_LENGTH} bytes"
            );
            let input = read_input(file)?;
            tracing::debug!(bytes = input.len(), length, "hashing input");
            let mut digest = vec![0u8; length];
            hash_into(&input, &mut digest);
            println!("{}", hex::encode(digest));
        }
        Commands::Constants { rounds } => {
            let constants = generate_constants(&Shake256Xof, REFERENCE_SEED, rounds)
                .map_err(EaglesongError::from)?;
            println!("{}", constants.to_source_table());
        }
    }
    Ok(())
}

fn read_input(file: Option<PathBuf>) -> anyhow::Result<Vec<u8>> {
    match file {
        Some(path) => {
            fs::read(&path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut input = Vec::new();
            io::stdin()
                .read_to_end(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}
