//! App runners for watch, list and task modes

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::ports::{
    ConfigStore, KeyValueStore, NotificationSource, TaskActionError, TaskActions,
};
use crate::application::{
    DeliveryChannels, DeliveryConfig, NotificationSync, PollOutcome, TaskAction,
    TaskActionOutcome, TaskActionUseCase, TaskRef,
};
use crate::domain::config::AppConfig;
use crate::domain::notification::Badge;
use crate::infrastructure::{
    create_sound_player, DashboardClient, HttpNotificationSource, HttpTaskClient, JsonFileStore,
    NotifyRustPresenter, XdgConfigStore,
};

use super::args::TaskCommand;
use super::confirm::TerminalConfirmer;
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment overrides
pub const ENV_SERVER_URL: &str = "TASKBELL_SERVER_URL";
pub const ENV_COOKIE: &str = "TASKBELL_COOKIE";

/// Keyboard commands accepted while watching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchCommand {
    Acknowledge,
    Refresh,
    ToggleSound,
    Quit,
}

impl WatchCommand {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "a" | "ack" => Some(Self::Acknowledge),
            "r" | "refresh" => Some(Self::Refresh),
            "s" | "sound" => Some(Self::ToggleSound),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|e| {
        log::warn!("Ignoring config file: {}", e);
        AppConfig::empty()
    });

    let env_config = AppConfig {
        server_url: env::var(ENV_SERVER_URL).ok().filter(|s| !s.is_empty()),
        cookie: env::var(ENV_COOKIE).ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

fn dashboard_client(config: &AppConfig) -> Result<DashboardClient, String> {
    DashboardClient::new(
        config.server_url_or_default(),
        config.cookie.clone(),
        config.request_timeout_or_default().as_std(),
    )
    .map_err(|e| format!("Failed to create HTTP client: {}", e))
}

/// Poll the dashboard and alert on new notifications until interrupted
pub async fn run_watch(config: AppConfig) -> ExitCode {
    let presenter = Presenter::new();

    let client = match dashboard_client(&config) {
        Ok(client) => client,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let mut shutdown = match ShutdownSignal::listen() {
        Ok(signal) => signal,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new());
    let delivery = DeliveryChannels::new(
        create_sound_player(config.sound_or_default()),
        NotifyRustPresenter::new(Arc::clone(&store), config.dashboard_url()),
        DeliveryConfig {
            enable_sound: config.sound_or_default(),
            enable_desktop: config.notify_or_default(),
        },
    );
    let sync =
        NotificationSync::create(HttpNotificationSource::new(client), delivery, store).await;

    let interval = config.poll_interval_or_default();
    let mut badge_rx = sync.subscribe();
    let mut last_badge = Badge::Hidden;

    sync.start(interval).await;
    presenter.info(&format!(
        "Watching {} every {} (a = acknowledge, r = refresh, s = toggle sound, q = quit)",
        config.server_url_or_default(),
        interval
    ));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = shutdown.recv() => break,
            changed = badge_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let badge = *badge_rx.borrow_and_update();
                if badge != last_badge {
                    presenter.badge(badge);
                    last_badge = badge;
                }
            }
            line = lines.next_line(), if stdin_open => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        log::debug!("stdin closed, keyboard commands disabled");
                        stdin_open = false;
                        continue;
                    }
                    Err(e) => {
                        log::warn!("Failed to read stdin: {}", e);
                        stdin_open = false;
                        continue;
                    }
                };

                match WatchCommand::parse(&line) {
                    Some(WatchCommand::Acknowledge) => {
                        sync.acknowledge();
                    }
                    // May queue behind an in-flight fetch; signals stay live
                    Some(WatchCommand::Refresh) => match shutdown.guard(sync.poll_now()).await {
                        None => break,
                        Some(Ok(PollOutcome::Applied { badge, .. })) => {
                            if badge == last_badge {
                                presenter.badge(badge);
                            }
                        }
                        Some(Ok(PollOutcome::Discarded)) => {}
                        Some(Err(e)) => presenter.warn(&format!("Refresh failed: {}", e)),
                    },
                    Some(WatchCommand::ToggleSound) => {
                        let enabled = !sync.preferences().sound_enabled;
                        match sync.set_sound_enabled(enabled).await {
                            Ok(()) => presenter.info(if enabled { "Sound on" } else { "Sound off" }),
                            Err(e) => presenter.error(&e.to_string()),
                        }
                    }
                    Some(WatchCommand::Quit) => break,
                    None if line.trim().is_empty() => {}
                    None => presenter.warn(&format!("Unknown command '{}'", line.trim())),
                }
            }
        }
    }

    sync.dispose();
    ExitCode::from(EXIT_SUCCESS)
}

/// Fetch unread notifications once and print them
pub async fn run_list(config: AppConfig) -> ExitCode {
    let presenter = Presenter::new();

    let client = match dashboard_client(&config) {
        Ok(client) => client,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match HttpNotificationSource::new(client).fetch_unread().await {
        Ok(items) => {
            for item in &items {
                presenter.notification(item);
            }
            presenter.badge(Badge::from_count(u32::try_from(items.len()).unwrap_or(u32::MAX)));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&format!("Failed to fetch notifications: {}", e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Task client that shows a spinner while a request is in flight
struct SpinningTasks<T: TaskActions> {
    inner: T,
}

#[async_trait::async_trait]
impl<T: TaskActions> TaskActions for SpinningTasks<T> {
    async fn complete(&self, task_id: u64) -> Result<(), TaskActionError> {
        let mut presenter = Presenter::new();
        presenter.start_spinner("Completing task...");
        let result = self.inner.complete(task_id).await;
        presenter.stop_spinner();
        result
    }

    async fn delete(&self, task_id: u64) -> Result<(), TaskActionError> {
        let mut presenter = Presenter::new();
        presenter.start_spinner("Deleting task...");
        let result = self.inner.delete(task_id).await;
        presenter.stop_spinner();
        result
    }
}

/// Confirm, then complete or delete a task
pub async fn run_task(config: AppConfig, command: TaskCommand) -> ExitCode {
    let presenter = Presenter::new();

    let client = match dashboard_client(&config) {
        Ok(client) => client,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let (action, task, yes) = match command {
        TaskCommand::Complete { id, yes } => (TaskAction::Complete, TaskRef { id, title: None }, yes),
        TaskCommand::Delete { id, title, yes } => (TaskAction::Delete, TaskRef { id, title }, yes),
    };

    let use_case = TaskActionUseCase::new(
        SpinningTasks {
            inner: HttpTaskClient::new(client),
        },
        Presenter::new(),
        TerminalConfirmer::new(yes),
    );

    match use_case.execute(action, &task).await {
        Ok(TaskActionOutcome::Done) => ExitCode::from(EXIT_SUCCESS),
        Ok(TaskActionOutcome::Cancelled) => {
            presenter.info("Cancelled");
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(TaskActionError::MissingCsrfToken) => {
            presenter.warn("Set a cookie containing csrftoken: taskbell config set cookie '<cookie>'");
            ExitCode::from(EXIT_ERROR)
        }
        // The use case already reported the failure
        Err(_) => ExitCode::from(EXIT_ERROR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_watch_commands() {
        assert_eq!(WatchCommand::parse("a"), Some(WatchCommand::Acknowledge));
        assert_eq!(WatchCommand::parse(" R \n"), Some(WatchCommand::Refresh));
        assert_eq!(WatchCommand::parse("sound"), Some(WatchCommand::ToggleSound));
        assert_eq!(WatchCommand::parse("q"), Some(WatchCommand::Quit));
        assert_eq!(WatchCommand::parse("x"), None);
    }

    #[test]
    fn client_uses_configured_server() {
        let config = AppConfig {
            server_url: Some("http://tasks.local:9000/".to_string()),
            ..AppConfig::defaults()
        };
        let client = dashboard_client(&config).unwrap();
        assert_eq!(client.url("/api/notifications/"), "http://tasks.local:9000/api/notifications/");
    }
}
