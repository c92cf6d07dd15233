//! Speaking practice: topics and recorded answers

use serde_json::Value;

use crate::endpoints;
use crate::error::ClientResult;
use crate::http::{ApiClient, MultipartBody};

pub struct SpeakingApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SpeakingApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// GET /speaking/topics
    pub async fn topics(&self) -> ClientResult<Value> {
        self.client
            .get(&format!("{}/topics", endpoints::SPEAKING))
            .await
    }

    /// Upload a recorded answer for evaluation
    ///
    /// POST /speaking/submit (multipart: `topicId`, `audio`)
    pub async fn submit_recording(
        &self,
        topic_id: &str,
        file_name: &str,
        mime: &str,
        audio: Vec<u8>,
    ) -> ClientResult<Value> {
        let body = MultipartBody::new()
            .text("topicId", topic_id)
            .file("audio", file_name, Some(mime), audio);
        self.client
            .post_multipart(&format!("{}/submit", endpoints::SPEAKING), body)
            .await
    }

    /// GET /speaking/history
    pub async fn history(&self) -> ClientResult<Value> {
        self.client
            .get(&format!("{}/history", endpoints::SPEAKING))
            .await
    }
}
