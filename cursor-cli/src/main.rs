use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use cursor_pagination::{config::Config, observability::init_tracing};

mod commands;

use commands::{decode::DecodeArgs, encode::EncodeArgs};

/// cursor - Mint and inspect pagination cursors
#[derive(Parser)]
#[command(name = "cursor")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to the standard search path)
    #[arg(long, global = true, value_name = "FILE", env = "CURSOR_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs to stderr at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the link to a page of a URL
    Encode(EncodeArgs),
    /// Resolve the paging parameters of a URL
    Decode(DecodeArgs),
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);

            for cause in e.chain().skip(1) {
                eprintln!("{} {}", "Caused by:".yellow(), cause);
            }

            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if cli.verbose {
        config.service.log_level = "debug".to_string();
        init_tracing(&config)?;
    }

    match cli.command {
        Commands::Encode(args) => commands::encode::execute(&config, args),
        Commands::Decode(args) => commands::decode::execute(&config, args),
    }
}
