//! twdev - A Tailwind CSS development server with live reload.

mod actor;
mod cli;
mod compiler;
mod config;
mod core;
mod embed;
mod logger;
mod reload;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::{DevConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    init_config(DevConfig::load(&cli)?);

    let bound_server = cli::serve::bind_server()?;
    log!("serve"; "Tailwind CSS development server");
    debug!("serve"; "listening on {}", bound_server.addr());

    bound_server.run()
}
