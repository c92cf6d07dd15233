use serde_json::{json, Value};

use crate::endpoints;
use crate::error::ClientResult;
use crate::http::ApiClient;

/// Conversation practice with the AI tutor
pub struct AiChatApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AiChatApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// POST /ai-chat/message
    pub async fn send_message(&self, message: &str) -> ClientResult<Value> {
        self.client
            .post(
                &format!("{}/message", endpoints::AI_CHAT),
                &json!({ "message": message }),
            )
            .await
    }

    /// GET /ai-chat/history
    pub async fn history(&self) -> ClientResult<Value> {
        self.client
            .get(&format!("{}/history", endpoints::AI_CHAT))
            .await
    }

    /// DELETE /ai-chat/history
    pub async fn clear_history(&self) -> ClientResult<Value> {
        self.client
            .delete(&format!("{}/history", endpoints::AI_CHAT))
            .await
    }
}
