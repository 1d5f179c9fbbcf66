//! Outbreak CLI - play the zombie building simulation from a terminal.
//!
//! Usage:
//!   cargo run -p outbreak-cli
//!   cargo run -p outbreak-cli -- --seed 42 --debug

mod app;
mod render;

use std::io;

use anyhow::Result;
use clap::Parser;
use outbreak_logic::Simulation;

use crate::app::App;

#[derive(Parser, Debug)]
#[command(
    name = "outbreak-cli",
    version,
    about = "Interactive zombie building simulation"
)]
struct Args {
    /// Seed for reproducible runs (OS entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Log engine events at debug level
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let sim = match args.seed {
        Some(seed) => Simulation::seeded(seed),
        None => Simulation::new(),
    };
    log::debug!("starting with seed {:?}", args.seed);

    let stdin = io::stdin();
    let mut app = App::new(sim, stdin.lock(), io::stdout());
    app.run()
}
