//! In-process fake of the LexiLearn backend
//!
//! Issues HS256 access tokens that embed a generation number. Calling
//! [`FakeBackend::expire_tokens`] bumps the generation so every token issued
//! so far is answered with 401, which is how tests simulate expiry without
//! waiting on the clock.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use dashmap::DashMap;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use uuid::Uuid;

use lexi_client::{ApiClient, HeadlessNavigator, MemoryTokenStore, Navigator, TokenStore};

/// Password accepted by the fake login endpoint
pub const VALID_PASSWORD: &str = "Password123";
/// OTP accepted by the fake verification endpoint
pub const VALID_OTP: &str = "123456";
/// Logins for this address succeed without a token until it is verified
pub const UNVERIFIED_EMAIL: &str = "unverified@example.com";

const SESSION_COOKIE: &str = "refreshToken";
const JWT_SECRET: &str = "integration-test-secret";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
    generation: u64,
    jti: String,
}

#[derive(Debug, Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct OtpBody {
    email: String,
    otp: String,
}

/// Backend state and test controls
pub struct FakeBackend {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    generation: AtomicU64,
    refresh_calls: AtomicUsize,
    refresh_calls_with_cookie: AtomicUsize,
    refresh_calls_with_bearer: AtomicUsize,
    refresh_delay_ms: AtomicU64,
    progress_delay_ms: AtomicU64,
    fail_refresh: AtomicBool,
    reject_all: AtomicBool,
    fail_logout: AtomicBool,
    sessions: DashMap<String, String>,
    hits: DashMap<String, usize>,
    seen_tokens: Mutex<Vec<String>>,
}

impl FakeBackend {
    fn new() -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(JWT_SECRET.as_bytes()),
            decoding_key: DecodingKey::from_secret(JWT_SECRET.as_bytes()),
            generation: AtomicU64::new(0),
            refresh_calls: AtomicUsize::new(0),
            refresh_calls_with_cookie: AtomicUsize::new(0),
            refresh_calls_with_bearer: AtomicUsize::new(0),
            refresh_delay_ms: AtomicU64::new(0),
            progress_delay_ms: AtomicU64::new(0),
            fail_refresh: AtomicBool::new(false),
            reject_all: AtomicBool::new(false),
            fail_logout: AtomicBool::new(false),
            sessions: DashMap::new(),
            hits: DashMap::new(),
            seen_tokens: Mutex::new(Vec::new()),
        }
    }

    // ------------------------------------------------------------------
    // Test controls
    // ------------------------------------------------------------------

    /// Invalidate every access token issued so far
    pub fn expire_tokens(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Make the refresh endpoint answer 401
    pub fn set_fail_refresh(&self, fail: bool) {
        self.fail_refresh.store(fail, Ordering::SeqCst);
    }

    /// Make protected endpoints answer 401 even for fresh tokens
    pub fn set_reject_all(&self, reject: bool) {
        self.reject_all.store(reject, Ordering::SeqCst);
    }

    /// Make the logout endpoint answer 500
    pub fn set_fail_logout(&self, fail: bool) {
        self.fail_logout.store(fail, Ordering::SeqCst);
    }

    /// Hold every refresh response for `delay`
    pub fn set_refresh_delay(&self, delay: Duration) {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.refresh_delay_ms.store(millis, Ordering::SeqCst);
    }

    /// Hold every progress response for `delay`. The token is checked on
    /// arrival, so a rejection reaches the client `delay` later.
    pub fn set_progress_delay(&self, delay: Duration) {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.progress_delay_ms.store(millis, Ordering::SeqCst);
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    /// Refresh calls that carried a known session cookie
    pub fn refresh_calls_with_cookie(&self) -> usize {
        self.refresh_calls_with_cookie.load(Ordering::SeqCst)
    }

    /// Refresh calls that carried an Authorization header
    pub fn refresh_calls_with_bearer(&self) -> usize {
        self.refresh_calls_with_bearer.load(Ordering::SeqCst)
    }

    /// Number of requests received on `path` (relative to `/api`)
    pub fn hits(&self, path: &str) -> usize {
        self.hits.get(path).map_or(0, |count| *count)
    }

    /// Bearer tokens presented to protected endpoints, in arrival order
    pub fn seen_tokens(&self) -> Vec<String> {
        self.seen_tokens.lock().clone()
    }

    /// Issue a token valid for the current generation
    pub fn issue_token(&self, email: &str) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: email.to_string(),
            iat: now,
            exp: now + 3600,
            generation: self.generation.load(Ordering::SeqCst),
            jti: Uuid::new_v4().to_string(),
        };
        encode(&Header::default(), &claims, &self.encoding_key).expect("token encoding")
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn hit(&self, path: &str) {
        *self.hits.entry(path.to_string()).or_insert(0) += 1;
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<Claims, Response> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| unauthorized("No token provided"))?;

        self.seen_tokens.lock().push(token.to_string());

        if self.reject_all.load(Ordering::SeqCst) {
            return Err(unauthorized("Token rejected"));
        }

        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| unauthorized("Invalid token"))?;

        if data.claims.generation != self.generation.load(Ordering::SeqCst) {
            return Err(unauthorized("Token expired"));
        }
        Ok(data.claims)
    }

    fn start_session(&self, email: &str) -> Response {
        let session_id = Uuid::new_v4().to_string();
        self.sessions.insert(session_id.clone(), email.to_string());
        let cookie = format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly");

        let body = json!({
            "success": true,
            "data": {
                "token": self.issue_token(email),
                "user": { "email": email, "role": "student" }
            }
        });
        ([(header::SET_COOKIE, cookie)], Json(body)).into_response()
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "message": message })),
    )
        .into_response()
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

// ============================================================================
// Handlers
// ============================================================================

type AppState = State<Arc<FakeBackend>>;

async fn login(State(backend): AppState, Json(body): Json<Credentials>) -> Response {
    backend.hit("/auth/login");
    if body.password != VALID_PASSWORD {
        return unauthorized("Invalid credentials");
    }
    if body.email == UNVERIFIED_EMAIL {
        return Json(json!({
            "success": true,
            "data": { "token": null, "user": { "email": body.email, "verified": false } },
            "message": "Please verify your email"
        }))
        .into_response();
    }
    backend.start_session(&body.email)
}

async fn register(State(backend): AppState) -> Response {
    backend.hit("/auth/register");
    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Registration successful. Check your email for the OTP."
        })),
    )
        .into_response()
}

async fn verify_otp(State(backend): AppState, Json(body): Json<OtpBody>) -> Response {
    backend.hit("/auth/verify-otp");
    if body.otp != VALID_OTP {
        return Json(json!({ "success": false, "message": "Invalid or expired OTP" }))
            .into_response();
    }
    backend.start_session(&body.email)
}

async fn resend_otp(State(backend): AppState) -> Json<Value> {
    backend.hit("/auth/resend-otp");
    Json(json!({ "success": true, "message": "OTP resent" }))
}

async fn refresh_token(State(backend): AppState, headers: HeaderMap) -> Response {
    backend.hit("/auth/refresh-token");
    backend.refresh_calls.fetch_add(1, Ordering::SeqCst);

    let delay = backend.refresh_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    if headers.contains_key(header::AUTHORIZATION) {
        backend.refresh_calls_with_bearer.fetch_add(1, Ordering::SeqCst);
    }
    let email = cookie_value(&headers, SESSION_COOKIE)
        .and_then(|id| backend.sessions.get(&id).map(|e| e.value().clone()));
    if email.is_some() {
        backend
            .refresh_calls_with_cookie
            .fetch_add(1, Ordering::SeqCst);
    }

    if backend.fail_refresh.load(Ordering::SeqCst) {
        return unauthorized("Refresh token expired");
    }

    let email = email.unwrap_or_else(|| "anonymous@example.com".to_string());
    Json(json!({
        "success": true,
        "data": { "accessToken": backend.issue_token(&email) }
    }))
    .into_response()
}

async fn logout(State(backend): AppState, headers: HeaderMap) -> Response {
    backend.hit("/auth/logout");
    if backend.fail_logout.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "success": false, "message": "Logout failed" })),
        )
            .into_response();
    }
    if let Some(id) = cookie_value(&headers, SESSION_COOKIE) {
        backend.sessions.remove(&id);
    }
    Json(json!({ "success": true, "message": "Logged out" })).into_response()
}

async fn me(State(backend): AppState, headers: HeaderMap) -> Response {
    backend.hit("/auth/me");
    match backend.authorize(&headers) {
        Ok(claims) => Json(json!({
            "success": true,
            "data": { "email": claims.sub, "role": "student" }
        }))
        .into_response(),
        Err(rejection) => rejection,
    }
}

async fn lessons(State(backend): AppState, headers: HeaderMap) -> Response {
    backend.hit("/lessons");
    if let Err(rejection) = backend.authorize(&headers) {
        return rejection;
    }
    Json(json!({
        "success": true,
        "data": [
            { "id": "1", "title": "Present Perfect", "level": "B1" },
            { "id": "2", "title": "Phrasal Verbs", "level": "B2" }
        ]
    }))
    .into_response()
}

async fn student_progress(State(backend): AppState, headers: HeaderMap) -> Response {
    backend.hit("/students/progress");
    let authorized = backend.authorize(&headers);

    let delay = backend.progress_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    match authorized {
        Ok(_) => Json(json!({
            "success": true,
            "data": { "completedLessons": 4, "streakDays": 2 }
        }))
        .into_response(),
        Err(rejection) => rejection,
    }
}

async fn admin_stats(State(backend): AppState, headers: HeaderMap) -> Response {
    backend.hit("/admin/stats");
    if let Err(rejection) = backend.authorize(&headers) {
        return rejection;
    }
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "success": false, "message": "Admin access required" })),
    )
        .into_response()
}

async fn upload(State(backend): AppState, headers: HeaderMap, mut multipart: Multipart) -> Response {
    backend.hit("/upload");

    // Drain the form first so a 401 never leaves the body half read
    let mut files = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let size = field.bytes().await.map(|b| b.len()).unwrap_or_default();
        files.push(json!({ "field": name, "fileName": file_name, "size": size }));
    }

    if let Err(rejection) = backend.authorize(&headers) {
        return rejection;
    }
    Json(json!({ "success": true, "data": { "files": files } })).into_response()
}

fn router(backend: Arc<FakeBackend>) -> Router {
    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/auth/resend-otp", post(resend_otp))
        .route("/auth/refresh-token", post(refresh_token))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/lessons", get(lessons))
        .route("/students/progress", get(student_progress))
        .route("/admin/stats", get(admin_stats))
        .route("/upload", post(upload));

    Router::new().nest("/api", api).with_state(backend)
}

// ============================================================================
// Server
// ============================================================================

/// Running fake backend bound to an ephemeral local port
pub struct TestServer {
    pub addr: SocketAddr,
    pub backend: Arc<FakeBackend>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        let backend = Arc::new(FakeBackend::new());
        let app = router(backend.clone());

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            backend,
            handle,
        })
    }

    /// Base URL including the `/api` prefix
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Client with an in-memory store and no route awareness
    pub fn client(&self) -> Result<ApiClient> {
        self.client_with(Arc::new(MemoryTokenStore::new()), Arc::new(HeadlessNavigator))
    }

    /// Client with the given store and navigator
    pub fn client_with(
        &self,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<ApiClient> {
        Ok(ApiClient::builder()
            .base_url(self.base_url())
            .timeout(Duration::from_secs(10))
            .token_store(store)
            .navigator(navigator)
            .build()?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
