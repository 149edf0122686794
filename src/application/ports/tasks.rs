//! Task mutation, toast and confirmation ports

use async_trait::async_trait;
use thiserror::Error;

/// Task mutation errors
#[derive(Debug, Clone, Error)]
pub enum TaskActionError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Server returned HTTP {status}")]
    Rejected { status: u16 },

    #[error("No CSRF token found in the configured cookie")]
    MissingCsrfToken,
}

/// Port for the dashboard's task endpoints
#[async_trait]
pub trait TaskActions: Send + Sync {
    /// Mark a task as completed
    async fn complete(&self, task_id: u64) -> Result<(), TaskActionError>;

    /// Delete a task
    async fn delete(&self, task_id: u64) -> Result<(), TaskActionError>;
}

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

/// Port for transient user-visible messages
pub trait ToastPresenter: Send + Sync {
    fn toast(&self, kind: ToastKind, title: &str, message: &str);
}

/// A yes/no question asked before a destructive action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub text: String,
    pub confirm_label: String,
}

/// Port for confirmation dialogs
#[async_trait]
pub trait Confirmer: Send + Sync {
    /// Returns true only when the user explicitly confirmed
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool;
}
