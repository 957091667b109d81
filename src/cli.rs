// CLI module - command-line argument parsing and handlers
//
// Without a subcommand the TUI runs. Subcommands:
// - config --show/--path/--reset: inspect or regenerate the config file
// - register: request institutional credentials
// - list: log in and print a collection as a table

use crate::account::{self, LoginForm, RegisterForm};
use crate::api::ApiClient;
use crate::config::{Config, VERSION};
use crate::crud::{tasks, ListController, ManagedResource, StatusTimeouts};
use crate::model::{Asignatura, Pac};
use crate::session::SharedSession;
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::time::Instant;
use unicode_width::UnicodeWidthStr;

/// Matricula - enrollment administration client
#[derive(Parser)]
#[command(name = "matricula")]
#[command(version = VERSION)]
#[command(about = "Administration client for the university enrollment backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Register a student and print the issued credentials
    Register {
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        apellido: String,
        #[arg(long)]
        identidad: String,
        #[arg(long)]
        email: String,
    },

    /// Log in and print a collection
    List {
        #[arg(value_enum)]
        resource: ResourceKind,

        #[arg(long)]
        email: String,

        #[arg(long, env = "MATRICULA_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    Pac,
    Asignaturas,
}

/// Run a subcommand to completion
pub async fn run(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Config { show, reset, path } => {
            if path {
                handle_config_path()
            } else if show {
                handle_config_show(config)
            } else if reset {
                handle_config_reset()
            } else {
                println!("Usage: matricula config [--show|--reset|--path]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --reset   Reset config file to defaults");
                println!("  --path    Show config file path");
                Ok(())
            }
        }
        Commands::Register {
            nombre,
            apellido,
            identidad,
            email,
        } => {
            let form = RegisterForm {
                nombre,
                apellido,
                identidad,
                email,
                ..RegisterForm::default()
            };
            handle_register(config, form).await
        }
        Commands::List {
            resource,
            email,
            password,
        } => {
            let form = LoginForm {
                email,
                password,
                ..LoginForm::default()
            };
            handle_list(config, resource, form).await
        }
    }
}

fn handle_config_path() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;
    println!("{}", path.display());
    Ok(())
}

fn handle_config_show(config: &Config) -> Result<()> {
    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());
    println!();
    match Config::config_path() {
        Some(path) if path.exists() => println!("# Source: {}", path.display()),
        _ => println!("# Source: defaults (no config file)"),
    }
    Ok(())
}

fn handle_config_reset() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .context("Failed to read confirmation")?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    std::fs::write(&path, Config::default().to_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

async fn handle_register(config: &Config, mut form: RegisterForm) -> Result<()> {
    let registration = form
        .begin_submit()
        .ok_or_else(|| form_error(form.error.as_ref()))?;

    let api = ApiClient::new(&config.api_url)?;
    let issued = api.register(&registration).await?;

    println!("Registration complete. Store these credentials:");
    println!();
    println!("{}", account::credentials_text(&issued));
    Ok(())
}

async fn handle_list(config: &Config, resource: ResourceKind, mut form: LoginForm) -> Result<()> {
    let credentials = form
        .begin_submit()
        .ok_or_else(|| form_error(form.error.as_ref()))?;

    let api = ApiClient::new(&config.api_url)?;
    let session = SharedSession::new();
    account::login(&api, &session, credentials).await?;

    let table = match resource {
        ResourceKind::Pac => render_table(&load::<Pac>(&api, &session).await?),
        ResourceKind::Asignaturas => render_table(&load::<Asignatura>(&api, &session).await?),
    };
    print!("{}", table);
    Ok(())
}

fn form_error(error: Option<&crate::crud::FormError>) -> anyhow::Error {
    match error {
        Some(err) => anyhow!("{}", err),
        None => anyhow!("invalid input"),
    }
}

/// One reload through the same controller path the TUI uses
async fn load<R: ManagedResource>(
    api: &ApiClient,
    session: &SharedSession,
) -> Result<ListController<R>> {
    let mut controller = ListController::<R>::new(StatusTimeouts::default());
    let ticket = controller.begin_reload();
    let result = tasks::reload::<R, _>(api, session).await;
    controller.finish_reload(ticket, result, Instant::now());

    if let Some(error) = controller.status().error_text() {
        bail!("{}", error);
    }
    Ok(controller)
}

/// Left-aligned plain text table, padded by display width
fn render_table<R: ManagedResource>(controller: &ListController<R>) -> String {
    let rows: Vec<Vec<String>> = controller
        .items()
        .iter()
        .map(|item| item.cells(controller.refs()))
        .collect();

    let mut widths: Vec<usize> = R::COLUMNS.iter().map(|h| h.width()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = R::COLUMNS.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    if rows.is_empty() {
        out.push_str(&format!("(no {})\n", R::PLURAL));
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{}{}", cell, " ".repeat(width - cell.width())))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}
