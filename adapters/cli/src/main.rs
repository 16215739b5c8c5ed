#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Grid Chase in the terminal.

mod config;
mod driver;
mod input;
mod terminal;

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use grid_chase_system_bootstrap::Bootstrap;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::Args,
    input::{RawModeGuard, TerminalInput},
    terminal::TerminalBackend,
};

/// Entry point for the Grid Chase command-line interface.
fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let settings = config::load(&args)?;
    let mut session = Bootstrap
        .session(&settings.config)
        .context("invalid session configuration")?;

    let raw_mode = RawModeGuard::enable()?;
    let mut input = TerminalInput::new(&raw_mode);
    let mut backend = TerminalBackend::new(io::stdout());
    let outcome = driver::run(&mut session, &mut input, &mut backend, settings.tick_interval);
    drop(raw_mode);

    let state = outcome?;
    info!(
        ?state,
        ticks = session.tick_index(),
        seed = settings.config.rng_seed(),
        "session finished"
    );
    Ok(())
}

/// Logs go to stderr so stdout carries only the rendered frames.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}
