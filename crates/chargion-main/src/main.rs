// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of ChargION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

mod config;

use anyhow::Result;
use chargion_core::{ConversationRouter, SystemClock};
use chargion_history::CsvHistorySource;
use chargion_types::SessionState;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "chargion")]
#[command(about = "EV charging load forecast assistant", long_about = None)]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "chargion.toml")]
    config: PathBuf,

    /// Override the hourly load CSV path from the config
    #[arg(long)]
    hourly_csv: Option<PathBuf>,

    /// Answer a single question and exit instead of starting the REPL
    #[arg(long)]
    ask: Option<String>,
}

fn main() -> Result<()> {
    // Initialize tracing with env filter support
    // Respects RUST_LOG environment variable
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();
    let config = config::load_config(&cli.config)?;
    let hourly_csv = cli.hourly_csv.unwrap_or(config.data.hourly_csv);

    info!("🔌 Starting ChargION - EV Load Forecast Assistant");
    info!("📋 Configuration Summary:");
    info!("   Hourly dataset: {}", hourly_csv.display());

    let router = ConversationRouter::new(CsvHistorySource::new(hourly_csv), SystemClock);
    let mut session = SessionState::new();

    if let Some(question) = cli.ask {
        println!("{}", router.handle(&question, &mut session));
        return Ok(());
    }

    run_repl(&router, &mut session)
}

/// Blocking stdin REPL. One SessionState for the whole process, so
/// follow-up questions replay the last forecast. The history CSV is
/// re-read on each forecast request, picking up rows added between turns.
fn run_repl(
    router: &ConversationRouter<CsvHistorySource, SystemClock>,
    session: &mut SessionState,
) -> Result<()> {
    println!("ChargION ⚡ EV load forecast assistant. Type 'exit' to quit.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();

    loop {
        write!(stdout, "you> ")?;
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            break;
        }

        let input = line.trim();
        if matches!(input, "exit" | "quit") {
            break;
        }

        println!("{}\n", router.handle(input, session));
    }

    info!("Session ended");
    Ok(())
}
