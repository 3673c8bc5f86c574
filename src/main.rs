//! `huf` - command-line front end for huf-compress

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use huf_compress::config::CodecConfig;
use huf_compress::Compressor;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "huf", author, version, about = "Static Huffman file compressor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More log output (repeat for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file into a .HUF container
    Encode { input: PathBuf, output: PathBuf },

    /// Restore the original file from a .HUF container
    Decode { input: PathBuf, output: PathBuf },

    /// Show the header and code table of a .HUF container
    Info {
        input: PathBuf,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

fn init_logging(verbose: u8, quiet: bool) {
    let default = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => CodecConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CodecConfig::default(),
    };
    let compressor = Compressor::new(config);

    match cli.command {
        Commands::Encode { input, output } => {
            let stats = compressor
                .encode_file(&input, &output)
                .with_context(|| format!("encoding {}", input.display()))?;
            println!(
                "{} -> {}: {} -> {} bytes ({:.1}%), entropy {:.3} bits/byte",
                input.display(),
                output.display(),
                stats.original_size,
                stats.compressed_size,
                stats.ratio * 100.0,
                stats.entropy_bits
            );
        }
        Commands::Decode { input, output } => {
            let stats = compressor
                .decode_file(&input, &output)
                .with_context(|| format!("decoding {}", input.display()))?;
            println!(
                "{} -> {}: {} -> {} bytes",
                input.display(),
                output.display(),
                stats.compressed_size,
                stats.original_size
            );
        }
        Commands::Info { input, json } => {
            let info = compressor
                .inspect_file(&input)
                .with_context(|| format!("inspecting {}", input.display()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("entries:       {}", info.entry_count);
                println!("payload bytes: {}", info.payload_len);
                println!("payload bits:  {}", info.payload_bits);
                println!("trailing bits: {}", info.trailing_bits);
                for e in &info.entries {
                    println!("  {:#04x}  {:>2}  {}", e.symbol, e.length, e.code_string());
                }
            }
        }
    }
    Ok(())
}

/// Print the full error chain to `out`. Independent of the log filter.
fn report_error(out: &mut impl Write, err: &anyhow::Error) -> io::Result<()> {
    writeln!(out, "Error: {err:#}")
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{e:?}");
            // nothing left to report to if stderr is gone
            let _ = report_error(&mut io::stderr().lock(), &e);
            ExitCode::FAILURE
        }
    }
}
