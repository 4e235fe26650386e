//! Mischief CLI - reader for Mischief .art vector drawings
//!
//! A Pure Rust tool for inspecting .art files, extracting their
//! decompressed payloads, and exporting strokes to SVG.

mod commands;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use commands::{cmd_info, cmd_json, cmd_svg, cmd_unpack};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mischief")]
#[command(author, version, about = "Reader for Mischief .art vector drawings")]
#[command(long_about = "
Pure Rust reader for the .art files produced by the Mischief drawing
application.

Examples:
  mischief info drawing.art
  mischief unpack drawing.art -o payload.bin
  mischief svg drawing.art -o drawing.svg
  mischief json drawing.art --pretty
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about an .art file
    #[command(alias = "i")]
    Info {
        /// File to inspect
        file: PathBuf,

        /// Also list every recorded action
        #[arg(short, long)]
        verbose: bool,
    },

    /// Decompress the payload and write the raw bytes
    #[command(alias = "x")]
    Unpack {
        /// File to decompress
        file: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the recorded strokes as SVG
    Svg {
        /// File to export
        file: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Dump the parsed document as JSON
    Json {
        /// File to dump
        file: PathBuf,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Generate shell completion scripts
    #[command(hide = true)]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Info { file, verbose } => cmd_info(&file, verbose),
        Commands::Unpack { file, output } => cmd_unpack(&file, output.as_deref()),
        Commands::Svg { file, output } => cmd_svg(&file, output.as_deref()),
        Commands::Json { file, pretty } => cmd_json(&file, pretty),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "mischief", &mut io::stdout());
            return;
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
