//! Lesson catalogue

use serde_json::Value;

use crate::endpoints;
use crate::error::ClientResult;
use crate::http::{ApiClient, ApiRequest};

use super::item_path;

pub struct LessonsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> LessonsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// GET /lessons
    pub async fn list(&self) -> ClientResult<Value> {
        self.client.get(endpoints::LESSONS).await
    }

    /// GET /lessons?level=..
    pub async fn list_by_level(&self, level: &str) -> ClientResult<Value> {
        self.client
            .request(ApiRequest::get(endpoints::LESSONS).query("level", level))
            .await
    }

    /// GET /lessons/{id}
    pub async fn get(&self, id: &str) -> ClientResult<Value> {
        self.client.get(&item_path(endpoints::LESSONS, id)).await
    }

    /// POST /lessons
    pub async fn create(&self, lesson: &Value) -> ClientResult<Value> {
        self.client.post(endpoints::LESSONS, lesson).await
    }

    /// PUT /lessons/{id}
    pub async fn update(&self, id: &str, lesson: &Value) -> ClientResult<Value> {
        self.client
            .put(&item_path(endpoints::LESSONS, id), lesson)
            .await
    }

    /// DELETE /lessons/{id}
    pub async fn delete(&self, id: &str) -> ClientResult<Value> {
        self.client.delete(&item_path(endpoints::LESSONS, id)).await
    }
}
