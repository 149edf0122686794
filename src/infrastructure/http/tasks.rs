//! Task mutation endpoints adapter

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::application::ports::{TaskActionError, TaskActions};

use super::{DashboardClient, CSRF_HEADER};

/// Task client backed by the dashboard's REST endpoints
pub struct HttpTaskClient {
    client: DashboardClient,
}

impl HttpTaskClient {
    pub fn new(client: DashboardClient) -> Self {
        Self { client }
    }

    async fn post_action(&self, task_id: u64, action: &str) -> Result<(), TaskActionError> {
        let token = self
            .client
            .csrf_token()
            .ok_or(TaskActionError::MissingCsrfToken)?;

        let response = self
            .client
            .post(&format!("/api/tasks/{}/{}/", task_id, action))
            .header(CONTENT_TYPE, "application/json")
            .header(CSRF_HEADER, token)
            .send()
            .await
            .map_err(|e| TaskActionError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TaskActionError::Rejected {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl TaskActions for HttpTaskClient {
    async fn complete(&self, task_id: u64) -> Result<(), TaskActionError> {
        self.post_action(task_id, "complete").await
    }

    async fn delete(&self, task_id: u64) -> Result<(), TaskActionError> {
        self.post_action(task_id, "delete").await
    }
}
