//! Task action use case
//!
//! Confirms, then completes or deletes a task. Every failed mutation is
//! reported with exactly one error toast.

use super::ports::{ConfirmPrompt, Confirmer, TaskActionError, TaskActions, ToastKind, ToastPresenter};

/// Supported task mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    Complete,
    Delete,
}

/// Task the action applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRef {
    pub id: u64,
    pub title: Option<String>,
}

/// Result of a task action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskActionOutcome {
    Done,
    Cancelled,
}

impl TaskAction {
    /// Question asked before running the action
    pub fn prompt(&self, task: &TaskRef) -> ConfirmPrompt {
        match self {
            Self::Complete => ConfirmPrompt {
                title: "Complete Task?".to_string(),
                text: "Mark this task as completed?".to_string(),
                confirm_label: "Yes, complete it!".to_string(),
            },
            Self::Delete => ConfirmPrompt {
                title: "Delete Task?".to_string(),
                text: match &task.title {
                    Some(title) => format!("Are you sure you want to delete \"{}\"?", title),
                    None => format!("Are you sure you want to delete task #{}?", task.id),
                },
                confirm_label: "Yes, delete it!".to_string(),
            },
        }
    }

    fn success_toast(&self) -> (&'static str, &'static str) {
        match self {
            Self::Complete => ("Task Completed!", "The task has been marked as completed."),
            Self::Delete => ("Task Deleted!", "The task has been deleted successfully."),
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            Self::Complete => "Failed to complete the task. Please try again.",
            Self::Delete => "Failed to delete the task. Please try again.",
        }
    }
}

/// Confirm-then-mutate flow for dashboard tasks
pub struct TaskActionUseCase<T, U, C>
where
    T: TaskActions,
    U: ToastPresenter,
    C: Confirmer,
{
    tasks: T,
    toasts: U,
    confirmer: C,
}

impl<T, U, C> TaskActionUseCase<T, U, C>
where
    T: TaskActions,
    U: ToastPresenter,
    C: Confirmer,
{
    pub fn new(tasks: T, toasts: U, confirmer: C) -> Self {
        Self {
            tasks,
            toasts,
            confirmer,
        }
    }

    /// Ask for confirmation and run the action
    pub async fn execute(
        &self,
        action: TaskAction,
        task: &TaskRef,
    ) -> Result<TaskActionOutcome, TaskActionError> {
        if !self.confirmer.confirm(&action.prompt(task)).await {
            return Ok(TaskActionOutcome::Cancelled);
        }

        let result = match action {
            TaskAction::Complete => self.tasks.complete(task.id).await,
            TaskAction::Delete => self.tasks.delete(task.id).await,
        };

        match result {
            Ok(()) => {
                let (title, message) = action.success_toast();
                self.toasts.toast(ToastKind::Success, title, message);
                Ok(TaskActionOutcome::Done)
            }
            Err(e) => {
                log::warn!("Task {} action {:?} failed: {}", task.id, action, e);
                self.toasts
                    .toast(ToastKind::Error, "Error", action.failure_message());
                Err(e)
            }
        }
    }
}
