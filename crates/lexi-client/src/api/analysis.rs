use serde_json::{json, Value};

use crate::endpoints;
use crate::error::ClientResult;
use crate::http::{ApiClient, ApiRequest};

/// Lexical analysis of learner text
pub struct AnalysisApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AnalysisApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// POST /analysis/lexical
    pub async fn lexical(&self, text: &str) -> ClientResult<Value> {
        self.client
            .post(endpoints::LEXICAL_ANALYSIS, &json!({ "text": text }))
            .await
    }

    /// Same analysis rendered as a PDF report
    ///
    /// POST /analysis/lexical?format=pdf
    pub async fn lexical_report(&self, text: &str) -> ClientResult<Vec<u8>> {
        let request = ApiRequest::post(endpoints::LEXICAL_ANALYSIS)
            .query("format", "pdf")
            .json(&json!({ "text": text }))?;
        let response = self.client.send_raw(request).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
