// Matricula - administration client for a university enrollment backend
//
// Signs staff in, then manages PAC (academic periods) and Asignaturas
// (courses) over the backend's REST API. Student registration is available
// without signing in.
//
// Architecture:
// - API client (reqwest): typed CRUD and auth calls with uniform errors
// - CRUD core: a per-resource list controller plus async task functions
// - TUI (ratatui): screens, forms and modals driven by an event loop
// - CLI (clap): config management and scriptable register/list commands
// - Event system: spawned tasks report back to the TUI over an mpsc channel

mod account;
mod api;
mod cli;
mod config;
mod crud;
mod events;
mod logging;
mod model;
mod session;
mod tui;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use logging::{LogBuffer, Output};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    Config::ensure_config_exists();

    // `config --reset` must still work when the file is what's broken
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) if matches!(cli.command, Some(Commands::Config { .. })) => {
            eprintln!("warning: {:#}; using defaults", e);
            Config::default()
        }
        Err(e) => return Err(e),
    };

    match cli.command {
        Some(command) => {
            // Keep the guard alive so buffered file logs are flushed on exit
            let _file_guard = logging::init(&config.logging, Output::Stderr);
            cli::run(command, &config).await
        }
        None => {
            let log_buffer = LogBuffer::new();
            let _file_guard = logging::init(&config.logging, Output::Tui(log_buffer.clone()));
            tui::run_tui(config, log_buffer).await
        }
    }
}
