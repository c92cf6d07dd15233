//! LexiLearn API client with builder pattern.
//!
//! Attaches the stored bearer token to every request and transparently
//! recovers from an expired token: one refresh per expiry, shared by every
//! request that hit the 401, followed by a single replay of each.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::AUTHORIZATION;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use lexi_common::{ApiConfig, ClientConfig, ConfigError};
use lexi_core::{
    ApiEnvelope, HeadlessNavigator, Navigator, SessionToken, TokenData, TokenStore,
};

use crate::api::{
    AdminApi, AiChatApi, AnalysisApi, AuthApi, LessonsApi, SpeakingApi, StudentsApi, TasksApi,
    TeachersApi, UploadApi,
};
use crate::endpoints;
use crate::error::{ClientError, ClientResult, RefreshError};
use crate::navigation::RouteTracker;
use crate::session::{RefreshCoordinator, RefreshOutcome};
use crate::store::{FileTokenStore, MemoryTokenStore};

use super::request::{ApiRequest, MultipartBody, RequestBody, RequestContext};

/// LexiLearn backend client.
///
/// Cheap to clone; clones share the token store, navigator, connection
/// pool and refresh state.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    api: ApiConfig,
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    refresh: RefreshCoordinator,
}

impl ApiClient {
    /// Create a new builder for configuring the client
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::new()
    }

    /// Build a client from loaded configuration.
    ///
    /// Uses a `FileTokenStore` when a token file is configured and a
    /// `RouteTracker` over the configured public routes.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let store: Arc<dyn TokenStore> = match &config.session.token_file {
            Some(path) => Arc::new(FileTokenStore::open(path)?),
            None => Arc::new(MemoryTokenStore::new()),
        };
        let navigator = Arc::new(RouteTracker::from_config(&config.session)?);

        Self::builder()
            .api_config(config.api.clone())
            .token_store(store)
            .navigator(navigator)
            .build()
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.api.base_url
    }

    #[must_use]
    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.inner.store
    }

    #[must_use]
    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.inner.navigator
    }

    #[must_use]
    pub fn api_config(&self) -> &ApiConfig {
        &self.inner.api
    }

    #[must_use]
    pub fn refresh_coordinator(&self) -> &RefreshCoordinator {
        &self.inner.refresh
    }

    /// Token that the next request will carry
    pub fn current_token(&self) -> ClientResult<Option<SessionToken>> {
        Ok(self.inner.store.load()?)
    }

    /// Start a session with a token obtained out of band
    pub fn set_token(&self, token: &SessionToken) -> ClientResult<()> {
        Ok(self.inner.store.save(token)?)
    }

    /// Forget the stored token
    pub fn clear_token(&self) -> ClientResult<()> {
        Ok(self.inner.store.clear()?)
    }

    // ------------------------------------------------------------------
    // Endpoint groups
    // ------------------------------------------------------------------

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn lessons(&self) -> LessonsApi<'_> {
        LessonsApi::new(self)
    }

    pub fn tasks(&self) -> TasksApi<'_> {
        TasksApi::new(self)
    }

    pub fn speaking(&self) -> SpeakingApi<'_> {
        SpeakingApi::new(self)
    }

    pub fn ai_chat(&self) -> AiChatApi<'_> {
        AiChatApi::new(self)
    }

    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi::new(self)
    }

    pub fn teachers(&self) -> TeachersApi<'_> {
        TeachersApi::new(self)
    }

    pub fn students(&self) -> StudentsApi<'_> {
        StudentsApi::new(self)
    }

    pub fn upload(&self) -> UploadApi<'_> {
        UploadApi::new(self)
    }

    pub fn analysis(&self) -> AnalysisApi<'_> {
        AnalysisApi::new(self)
    }

    // ------------------------------------------------------------------
    // Request API
    // ------------------------------------------------------------------

    /// Send a request and decode the JSON response body
    pub async fn request<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        let response = self.execute(&request).await?;
        decode(response).await
    }

    /// Send a request and return the undecoded response (e.g. PDF downloads)
    pub async fn send_raw(&self, request: ApiRequest) -> ClientResult<Response> {
        self.execute(&request).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request(ApiRequest::get(path)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(ApiRequest::post(path).json(body)?).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(ApiRequest::put(path).json(body)?).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(ApiRequest::patch(path).json(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request(ApiRequest::delete(path)).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        body: MultipartBody,
    ) -> ClientResult<T> {
        self.request(ApiRequest::post(path).multipart(body)).await
    }

    // ------------------------------------------------------------------
    // Dispatch and recovery
    // ------------------------------------------------------------------

    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: &ApiRequest) -> ClientResult<Response> {
        let mut ctx = RequestContext::initial();
        let mut token = self.inner.store.load()?;

        loop {
            let response = self.dispatch(request, token.as_ref()).await?;

            if response.status() == StatusCode::UNAUTHORIZED && self.should_recover(request, ctx) {
                debug!("Access token rejected, recovering session");
                token = Some(self.recover(token.as_ref()).await?);
                ctx = ctx.into_retry();
                continue;
            }

            return ensure_success(response).await;
        }
    }

    /// A 401 is recoverable only on a first attempt, outside the login and
    /// refresh calls, and away from the public routes.
    fn should_recover(&self, request: &ApiRequest, ctx: RequestContext) -> bool {
        !ctx.is_retried()
            && !endpoints::is_recovery_exempt(&request.path)
            && !self.inner.navigator.is_on_public_route()
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&SessionToken>,
    ) -> ClientResult<Response> {
        let url = self.inner.api.url(&request.path);
        let mut builder = self.inner.http.request(request.method.clone(), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        let mut headers = request.headers.clone();
        headers.remove(AUTHORIZATION);
        builder = builder.headers(headers);

        if let Some(token) = token {
            builder = builder.bearer_auth(token.as_str());
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(body) => builder.multipart(body.to_form()?),
        };

        let start = Instant::now();
        let response = builder.send().await?;
        debug!(
            status = response.status().as_u16(),
            elapsed = ?start.elapsed(),
            authenticated = token.is_some(),
            "Response received"
        );
        Ok(response)
    }

    /// Obtain a fresh token for a request rejected with `sent`, joining an
    /// outstanding refresh if there is one. A stored token newer than `sent`
    /// is returned as is.
    async fn recover(&self, sent: Option<&SessionToken>) -> ClientResult<SessionToken> {
        let outcome = self
            .inner
            .refresh
            .run_if_stale(sent, || self.stored_token(), || self.refresh_session())
            .await;
        Ok(outcome?)
    }

    fn stored_token(&self) -> Option<SessionToken> {
        self.inner.store.load().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read stored token, refreshing");
            None
        })
    }

    /// Leader side of a refresh: call the endpoint, then persist the new
    /// token or tear the session down, before any waiter is released.
    #[instrument(skip(self))]
    async fn refresh_session(&self) -> RefreshOutcome {
        info!("Refreshing session token");

        let outcome = match self.call_refresh_endpoint().await {
            Ok(token) => match self.inner.store.save(&token) {
                Ok(()) => Ok(token),
                Err(e) => Err(RefreshError::storage(&e)),
            },
            Err(e) => Err(e),
        };

        match &outcome {
            Ok(_) => info!("Session token refreshed"),
            Err(e) => {
                warn!(error = %e, kind = ?e.kind, "Session refresh failed, ending session");
                self.end_session();
            }
        }

        outcome
    }

    async fn call_refresh_endpoint(&self) -> Result<SessionToken, RefreshError> {
        let url = self.inner.api.url(endpoints::REFRESH_TOKEN);
        let response = self
            .inner
            .http
            .post(&url)
            .send()
            .await
            .map_err(|e| RefreshError::transport(&e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RefreshError::transport(&e))?;
        let code = Some(status.as_u16());

        if !status.is_success() {
            let message = error_message(&bytes)
                .unwrap_or_else(|| format!("refresh rejected with status {status}"));
            return Err(RefreshError::rejected(code, message));
        }

        let envelope: ApiEnvelope<TokenData> = serde_json::from_slice(&bytes).map_err(|e| {
            RefreshError::rejected(code, format!("malformed refresh response: {e}"))
        })?;

        if !envelope.success {
            return Err(RefreshError::rejected(
                code,
                envelope.message_or("refresh was not successful"),
            ));
        }

        let data = envelope
            .data
            .ok_or_else(|| RefreshError::rejected(code, "refresh response carried no token"))?;

        SessionToken::new(data.token).map_err(|e| RefreshError::rejected(code, e.to_string()))
    }

    /// Terminal session failure: drop the token and return to the public route
    pub(crate) fn end_session(&self) {
        if let Err(e) = self.inner.store.clear() {
            warn!(error = %e, "Failed to clear stored token");
        }
        if !self.inner.navigator.is_on_public_route() {
            self.inner.navigator.redirect_to_public();
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.api.base_url)
            .field("refresh", &self.inner.refresh)
            .finish_non_exhaustive()
    }
}

/// Pass 2xx responses through; turn anything else into `ClientError::Status`
async fn ensure_success(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let bytes = response.bytes().await?;
    let body: Option<serde_json::Value> = serde_json::from_slice(&bytes).ok();
    let message = error_message(&bytes).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    });

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
        body,
    })
}

/// Extract a human-readable message from an error body
fn error_message(bytes: &[u8]) -> Option<String> {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(bytes) {
        let message = value
            .get("message")
            .or_else(|| value.get("error").and_then(|e| e.get("message")))
            .or_else(|| value.get("error"))
            .and_then(serde_json::Value::as_str);
        if let Some(message) = message {
            return Some(message.to_string());
        }
    }

    let text = String::from_utf8_lossy(bytes).trim().to_string();
    if text.is_empty() || text.starts_with('{') {
        None
    } else {
        Some(text)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Ok(serde_json::from_slice(b"null")?);
    }
    Ok(serde_json::from_slice(&bytes)?)
}

/// Builder for configuring [`ApiClient`] instances.
pub struct ApiClientBuilder {
    base_url: Option<String>,
    api: Option<ApiConfig>,
    timeout: Option<Duration>,
    store: Option<Arc<dyn TokenStore>>,
    navigator: Option<Arc<dyn Navigator>>,
    http_client: Option<reqwest::Client>,
}

impl ApiClientBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            api: None,
            timeout: None,
            store: None,
            navigator: None,
            http_client: None,
        }
    }

    /// Set the backend base URL; validated on `build`
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Use a fully loaded API configuration
    pub fn api_config(mut self, api: ApiConfig) -> Self {
        self.api = Some(api);
        self
    }

    /// Override the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Storage for the session token. Defaults to `MemoryTokenStore`.
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Route awareness for recovery. Defaults to `HeadlessNavigator`.
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Use a preconfigured `reqwest` client. It should keep a cookie store
    /// if the backend's refresh endpoint relies on a session cookie.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Build the client
    pub fn build(self) -> ClientResult<ApiClient> {
        let mut api = match (self.api, self.base_url) {
            (_, Some(url)) => ApiConfig::new(&url)?,
            (Some(api), None) => api,
            (None, None) => {
                return Err(ConfigError::InvalidValue(
                    "LEXI_API_BASE_URL",
                    "base_url is required".to_string(),
                )
                .into())
            }
        };
        if let Some(timeout) = self.timeout {
            api.set_timeout(timeout);
        }

        let http = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .timeout(api.timeout())
                .connect_timeout(api.connect_timeout())
                .user_agent(api.user_agent.clone())
                .cookie_store(true)
                .build()
                .map_err(|e| ClientError::invalid_request(format!("failed to build HTTP client: {e}")))?,
        };

        debug!(base_url = %api.base_url, "API client configured");

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                http,
                api,
                store: self
                    .store
                    .unwrap_or_else(|| Arc::new(MemoryTokenStore::new())),
                navigator: self.navigator.unwrap_or_else(|| Arc::new(HeadlessNavigator)),
                refresh: RefreshCoordinator::new(),
            }),
        })
    }
}
