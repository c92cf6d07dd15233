//! Assigned tasks and submissions

use serde_json::{json, Value};

use crate::endpoints;
use crate::error::ClientResult;
use crate::http::ApiClient;

use super::item_path;

pub struct TasksApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TasksApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ClientResult<Value> {
        self.client.get(endpoints::TASKS).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Value> {
        self.client.get(&item_path(endpoints::TASKS, id)).await
    }

    pub async fn create(&self, task: &Value) -> ClientResult<Value> {
        self.client.post(endpoints::TASKS, task).await
    }

    /// Submit a written answer for a task
    ///
    /// POST /tasks/{id}/submit
    pub async fn submit(&self, id: &str, content: &str) -> ClientResult<Value> {
        let path = format!("{}/submit", item_path(endpoints::TASKS, id));
        self.client
            .post(&path, &json!({ "content": content }))
            .await
    }
}
