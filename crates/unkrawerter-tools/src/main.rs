use std::path::PathBuf;
use std::process::exit;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

mod commands;
use commands::{rip, samples, scan};

/// Rip Krawall sound-engine music from GBA ROM images.
#[derive(Parser)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum FormatArg {
    #[default]
    Xm,
    S3m,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a ROM for Krawall pointer tables and report what was found
    Scan {
        /// ROM image to scan
        #[arg(value_name = "ROM")]
        file: PathBuf,
        /// Minimum pointer-run length to consider
        #[arg(long, default_value_t = 4)]
        threshold: u32,
        /// List every candidate run, not just the selected tables
        #[arg(short, long)]
        verbose: bool,
    },
    /// Extract every module in a ROM as XM or S3M files
    Rip {
        /// ROM image to rip
        #[arg(value_name = "ROM")]
        file: PathBuf,
        /// Directory to write modules into (defaults to the current one)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
        /// Output module format
        #[arg(long, value_enum, default_value = "xm")]
        format: FormatArg,
        /// Minimum pointer-run length to consider
        #[arg(long, default_value_t = 4)]
        threshold: u32,
        /// Keep the full instrument list instead of trimming unused ones
        #[arg(long)]
        no_trim: bool,
        /// Skip the playback-compatibility fix-ups (exact pattern data)
        #[arg(long)]
        no_fix: bool,
        /// Engine version override, e.g. 2004/07/07 or 0x20040707
        #[arg(long, value_name = "DATE")]
        engine_version: Option<String>,
        /// Module name to stamp into the output headers
        #[arg(long)]
        name: Option<String>,
    },
    /// Export every discovered sample as a WAV file
    Samples {
        /// ROM image to read
        #[arg(value_name = "ROM")]
        file: PathBuf,
        /// Directory to write WAV files into (defaults to the current one)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
        /// Minimum pointer-run length to consider
        #[arg(long, default_value_t = 4)]
        threshold: u32,
    },
}

fn main() {
    // Usage problems exit with 1, unlike runtime failures below.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            exit(1);
        }
    };

    let result: Result<()> = match cli.command {
        Commands::Scan {
            file,
            threshold,
            verbose,
        } => scan::run(&file, threshold, verbose),
        Commands::Rip {
            file,
            output,
            format,
            threshold,
            no_trim,
            no_fix,
            engine_version,
            name,
        } => rip::run(rip::Args {
            file,
            output,
            format: match format {
                FormatArg::Xm => unkrawerter::OutputFormat::Xm,
                FormatArg::S3m => unkrawerter::OutputFormat::S3m,
            },
            threshold,
            trim_instruments: !no_trim,
            fix_compatibility: !no_fix,
            engine_version,
            name,
        }),
        Commands::Samples {
            file,
            output,
            threshold,
        } => samples::run(&file, output.as_deref(), threshold),
    };

    if let Err(err) = result {
        eprintln!("error: {:#}", err);
        exit(commands::exit_code(&err));
    }
}
