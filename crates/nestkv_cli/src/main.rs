//! NestKV CLI
//!
//! Line-oriented shell over an in-memory NestKV store.
//!
//! # Commands
//!
//! - `SET name value` / `GET name` / `DELETE name`
//! - `COUNT value` - number of keys holding `value`
//! - `BEGIN` / `ROLLBACK` / `COMMIT` - nested transactions
//! - `END` - leave the shell

mod dispatch;
mod parse;
mod repl;

use clap::Parser;
use nestkv_core::{Config, Store};
use repl::{Exit, Repl, ReplOptions};
use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// NestKV in-memory key/value shell.
#[derive(Parser)]
#[command(name = "nestkv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Read commands from this file instead of stdin
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress the banner and prompt
    #[arg(short, long)]
    quiet: bool,

    /// Log the frame chain after every state-changing command
    #[arg(long)]
    dump_frames: bool,

    /// Print session statistics as JSON on exit
    #[arg(long)]
    stats: bool,

    /// Initial capacity of the base frame
    #[arg(long, default_value = "0")]
    capacity: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose || cli.dump_frames {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let interactive = !cli.quiet && cli.script.is_none() && io::stdin().is_terminal();
    let input: Box<dyn BufRead> = match &cli.script {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| format!("cannot open script {}: {e}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    if interactive {
        println!("NestKV v{} in-memory store", nestkv_core::VERSION);
    }

    let store = Store::with_config(Config::new().base_capacity(cli.capacity));
    let options = ReplOptions {
        prompt: interactive,
        dump_frames: cli.dump_frames,
    };
    let mut repl = Repl::new(store, input, io::stdout().lock(), options);
    let exit = repl.run()?;

    let store = repl.into_store();
    if exit == Exit::Eof && store.in_transaction() {
        info!(
            open_transactions = store.depth(),
            "input ended with open transactions; discarding them"
        );
    }
    if cli.stats {
        println!("{}", serde_json::to_string_pretty(&store.stats())?);
    }

    Ok(())
}
