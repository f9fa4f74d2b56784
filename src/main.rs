// src/main.rs
use anyhow::Result;
use clap::Parser;

use mrfreeze::cli::{self, Cli};

fn main() -> Result<()> {
    let args = Cli::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    cli::run(args)
}
