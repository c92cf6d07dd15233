use serde_json::Value;

use crate::endpoints;
use crate::error::ClientResult;
use crate::http::ApiClient;

/// Student dashboard and progress
pub struct StudentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> StudentsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn dashboard(&self) -> ClientResult<Value> {
        self.client
            .get(&format!("{}/dashboard", endpoints::STUDENTS))
            .await
    }

    pub async fn progress(&self) -> ClientResult<Value> {
        self.client
            .get(&format!("{}/progress", endpoints::STUDENTS))
            .await
    }

    pub async fn lessons(&self) -> ClientResult<Value> {
        self.client
            .get(&format!("{}/lessons", endpoints::STUDENTS))
            .await
    }
}
