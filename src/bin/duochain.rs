#![forbid(unsafe_code)]
//! Interactive two-party ledger shell.

use clap::Parser;
use colored::*;
use duochain::blockchain::Blockchain;
use duochain::cli::Shell;
use duochain::config::{load_config, DEFAULT_CONFIG_PATH};
use duochain::miner::Miner;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Opening balance of the first party
    #[arg(value_parser = clap::value_parser!(i32).range(0..))]
    initial_amount: i32,

    /// Path to the TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Number of mining threads (overrides miner.threads)
    #[arg(long)]
    threads: Option<usize>,

    /// Log level: error, warn, info, debug or trace (overrides logging.level)
    #[arg(long)]
    log_level: Option<String>,

    /// Do not show the mining spinner
    #[arg(long)]
    no_progress: bool,
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(&cli.config)?;
    if let Some(threads) = cli.threads {
        config.miner.threads = threads;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.validate()?;

    tracing_subscriber::fmt()
        .with_max_level(config.logging.max_level()?)
        .with_writer(io::stderr)
        .init();
    info!(config = %cli.config.display(), threads = config.miner.threads, "starting duochain");

    let miner = Miner::new(&config.miner)?;

    eprintln!(
        "{}",
        format!("⛏️  Mining genesis block for {}...", config.parties.first).bright_cyan()
    );
    let started = Instant::now();
    let genesis = miner.mine(0, cli.initial_amount, None);
    let chain = Blockchain::from_genesis(genesis)?;
    eprintln!(
        "{}",
        format!("✅ Genesis mined in {:.2}s", started.elapsed().as_secs_f64()).green()
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(chain, miner, config.parties).with_progress(!cli.no_progress);
    shell.run(stdin.lock(), stdout.lock())?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
