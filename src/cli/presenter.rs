//! CLI presenter for output formatting

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::ports::{ToastKind, ToastPresenter};
use crate::domain::notification::{Badge, NotificationItem, NotificationType};

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Print the unread badge
    pub fn badge(&self, badge: Badge) {
        eprintln!("{}", Self::format_badge(badge));
    }

    /// Print one notification as a single line
    pub fn notification(&self, item: &NotificationItem) {
        println!("{}", Self::format_notification(item));
    }

    pub fn format_badge(badge: Badge) -> String {
        match badge {
            Badge::Hidden => format!("{} No unread notifications", "○".dimmed()),
            Badge::Visible(n) => format!("{} {} unread", "●".yellow().bold(), n),
        }
    }

    pub fn format_notification(item: &NotificationItem) -> String {
        let kind = match item.kind {
            NotificationType::Overdue => item.kind.as_str().red().bold(),
            NotificationType::DueSoon => item.kind.as_str().yellow(),
            NotificationType::Completed => item.kind.as_str().green(),
            NotificationType::Reminder => item.kind.as_str().cyan(),
            NotificationType::Generic => item.kind.as_str().normal(),
        };
        let when = item
            .created_at
            .map(|t| format!(" ({})", t.format("%Y-%m-%d %H:%M")))
            .unwrap_or_default();

        format!(
            "#{} [{}] {}: {}{}",
            item.id,
            kind,
            item.title.bold(),
            item.message,
            when.dimmed()
        )
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastPresenter for Presenter {
    fn toast(&self, kind: ToastKind, title: &str, message: &str) {
        let line = format!("{} {}", title.bold(), message);
        match kind {
            ToastKind::Success => self.success(&line),
            ToastKind::Error => self.error(&line),
            ToastKind::Warning => self.warn(&line),
            ToastKind::Info => self.info(&line),
        }
    }
}
