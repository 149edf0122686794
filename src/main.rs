//! Taskbell CLI entry point

use std::process::ExitCode;

use clap::Parser;

use taskbell::cli::{
    app::{load_merged_config, run_list, run_task, run_watch, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    prefs_cmd::handle_prefs_command,
    presenter::Presenter,
};
use taskbell::domain::config::AppConfig;
use taskbell::domain::schedule::Duration;
use taskbell::infrastructure::{JsonFileStore, XdgConfigStore};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let mut cli = Cli::parse();
    let presenter = Presenter::new();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // Handle local subcommands
    match cli.command.take() {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Some(Commands::Prefs { action }) => {
            let store = JsonFileStore::new();
            let path = store.path().to_string_lossy().to_string();
            if let Err(e) = handle_prefs_command(action, &store, &path, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        command => run_remote(&cli, command, &presenter).await,
    }
}

/// Run a command that talks to the dashboard
async fn run_remote(cli: &Cli, command: Option<Commands>, presenter: &Presenter) -> ExitCode {
    // Build CLI config from args
    let cli_config = AppConfig {
        server_url: cli.server.clone(),
        poll_interval: cli.interval.clone(),
        notify: if cli.no_notify { Some(false) } else { None },
        sound: if cli.no_sound { Some(false) } else { None },
        ..Default::default()
    };

    let config = load_merged_config(cli_config).await;

    for (name, value) in [
        ("interval", &config.poll_interval),
        ("request timeout", &config.request_timeout),
    ] {
        if let Some(Err(e)) = value.as_ref().map(|s| s.parse::<Duration>()) {
            presenter.error(&format!("Invalid {}: {}", name, e));
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    }

    match command {
        Some(Commands::List) => run_list(config).await,
        Some(Commands::Task { action }) => run_task(config, action).await,
        _ => run_watch(config).await,
    }
}
