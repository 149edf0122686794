//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

/// Taskbell - desktop alerts for your task dashboard
#[derive(Parser, Debug)]
#[command(name = "taskbell")]
#[command(version)]
#[command(about = "Desktop and sound alerts for task dashboard notifications")]
#[command(long_about = None)]
pub struct Cli {
    /// Dashboard server URL (e.g., http://127.0.0.1:8000)
    #[arg(short = 's', long, value_name = "URL", global = true)]
    pub server: Option<String>,

    /// Poll interval (e.g., 30s, 1m, 2m30s)
    #[arg(short = 'i', long, value_name = "TIME")]
    pub interval: Option<String>,

    /// Don't play the notification chime
    #[arg(long)]
    pub no_sound: bool,

    /// Don't show desktop notifications
    #[arg(long)]
    pub no_notify: bool,

    /// Verbose logging (debug level)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch for notifications until interrupted (default)
    Watch,
    /// Fetch unread notifications once and print them
    List,
    /// Complete or delete a task
    Task {
        #[command(subcommand)]
        action: TaskCommand,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Manage stored preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

/// Task mutation subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Mark a task as completed
    Complete {
        /// Task id
        id: u64,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Delete a task
    Delete {
        /// Task id
        id: u64,
        /// Task title, shown in the confirmation prompt
        #[arg(short = 't', long)]
        title: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Preference action subcommands
#[derive(Subcommand, Debug)]
pub enum PrefsAction {
    /// List stored preferences
    List,
    /// Get a preference
    Get {
        /// Preference key
        key: String,
    },
    /// Set a preference
    Set {
        /// Preference key
        key: String,
        /// Preference value
        value: String,
    },
    /// Show preference file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "server_url",
    "cookie",
    "poll_interval",
    "request_timeout",
    "notify",
    "sound",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
