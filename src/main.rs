use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;

mod cli;

use cli::Cli;
use cli::commands::{Commands, SessionCommands};
use ticklist::config::{Config, LoggingConfig};
use ticklist::domain::UserId;
use ticklist::server;
use ticklist::store::ChecklistStore;

fn setup_logging(logging: &LoggingConfig, verbose: bool) -> Result<()> {
    // RUST_LOG wins over the configured level
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));

    if let Some(log_file) = &logging.file {
        if let Some(parent) = log_file.parent() {
            fs::create_dir_all(parent).context("Failed to create log directory")?;
        }

        let target = Box::new(
            fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
                .context("Failed to open log file")?,
        );
        builder.target(env_logger::Target::Pipe(target));
    }

    builder.init();

    match &logging.file {
        Some(log_file) => info!("Logging initialized, writing to: {}", log_file.display()),
        None => info!("Logging initialized"),
    }
    Ok(())
}

async fn run_application(cli: &Cli, config: Config) -> Result<()> {
    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        None => handle_serve_command(None, config).await,
        Some(Commands::Serve { bind }) => handle_serve_command(bind.as_deref(), config).await,
        Some(Commands::Export { owner }) => handle_export_command(owner, &config),
        Some(Commands::Sessions { command }) => handle_sessions_command(command, &config),
    }
}

async fn handle_serve_command(bind: Option<&str>, mut config: Config) -> Result<()> {
    if let Some(bind) = bind {
        config.server.bind = bind.to_string();
        config.validate().context("Invalid --bind address")?;
    }

    let listener = server::bind(&config)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    println!("{} http://{}", "Serving on".green(), listener.local_addr()?);
    server::serve_on(listener, &config).await.context("Server failed")?;
    Ok(())
}

fn handle_export_command(owner: &str, config: &Config) -> Result<()> {
    info!("Exporting checklists for owner: {}", owner);
    let store = server::open_store(config).context("Failed to open checklist store")?;
    let checklists = store
        .list_checklists(&UserId::new(owner))
        .context("Failed to list checklists")?;

    if checklists.is_empty() {
        eprintln!("{} {}", "No checklists for".yellow(), owner);
    }
    println!("{}", serde_json::to_string_pretty(&checklists)?);
    Ok(())
}

fn handle_sessions_command(command: &SessionCommands, config: &Config) -> Result<()> {
    match command {
        SessionCommands::Purge => {
            let sessions = server::open_sessions(config).context("Failed to open session store")?;
            let purged = sessions.purge_expired().context("Failed to purge sessions")?;
            println!("{} {} expired sessions", "Purged".green(), purged);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(&config.logging, cli.is_verbose()).context("Failed to setup logging")?;
    info!("Starting with config from: {:?}", config.source);

    run_application(&cli, config).await.context("Application failed")?;

    Ok(())
}
