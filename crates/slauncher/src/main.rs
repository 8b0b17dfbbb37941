#![warn(missing_docs)]

//! Entry point for the `slauncher` binary.

mod cli;
mod commands;
mod error;
mod settings;

use std::{io, process, sync::Arc};

use clap::Parser;
use launch_engine::Launcher;
use launch_winops::RealWinOps;
use tokio::runtime::Runtime;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, registry};

use crate::{
    cli::{Cli, Commands},
    error::Result,
};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and dispatch to the chosen subcommand.
fn run() -> Result<()> {
    let Cli {
        log,
        config,
        overrides,
        command,
    } = Cli::parse();
    let env_filter = logging::env_filter_from_spec(&log.spec());
    registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr).without_time())
        .try_init()
        .ok();

    let config = settings::resolve(config.as_deref(), &overrides)?;
    let launcher = Launcher::new(Arc::new(RealWinOps), config);
    let runtime = Runtime::new()?;

    match command {
        Commands::Displays(args) => commands::displays(&launcher, &args),
        Commands::Launch(args) => runtime.block_on(commands::launch(&launcher, &args)),
        Commands::Open(args) => runtime.block_on(commands::open(&launcher, &args)),
    }
}
