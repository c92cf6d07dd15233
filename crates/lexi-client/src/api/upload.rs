//! Generic file upload

use serde_json::Value;

use crate::endpoints;
use crate::error::ClientResult;
use crate::http::{ApiClient, MultipartBody};

pub struct UploadApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UploadApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// POST /upload (multipart field `file`)
    ///
    /// The form is rebuilt from the stored bytes if the request has to be
    /// replayed after a session refresh.
    pub async fn file(&self, file_name: &str, mime: Option<&str>, bytes: Vec<u8>) -> ClientResult<Value> {
        let body = MultipartBody::new().file("file", file_name, mime, bytes);
        self.client.post_multipart(endpoints::UPLOAD, body).await
    }
}
