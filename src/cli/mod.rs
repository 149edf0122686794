//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, prompts, signal handling,
//! and the application runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod confirm;
pub mod prefs_cmd;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use app::{run_list, run_task, run_watch, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, PrefsAction, TaskCommand};
pub use presenter::Presenter;
