use serde_json::Value;

use crate::endpoints;
use crate::error::ClientResult;
use crate::http::ApiClient;

use super::item_path;

/// Teacher workspace: class roster and grading
pub struct TeachersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TeachersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn dashboard(&self) -> ClientResult<Value> {
        self.client
            .get(&format!("{}/dashboard", endpoints::TEACHERS))
            .await
    }

    pub async fn students(&self) -> ClientResult<Value> {
        self.client
            .get(&format!("{}/students", endpoints::TEACHERS))
            .await
    }

    pub async fn submissions(&self) -> ClientResult<Value> {
        self.client.get(&submissions_path()).await
    }

    /// POST /teachers/submissions/{id}/grade
    pub async fn grade_submission(&self, submission_id: &str, grade: &Value) -> ClientResult<Value> {
        let path = format!("{}/grade", item_path(&submissions_path(), submission_id));
        self.client.post(&path, grade).await
    }
}

fn submissions_path() -> String {
    format!("{}/submissions", endpoints::TEACHERS)
}
