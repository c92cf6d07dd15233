//! # lexi-client
//!
//! HTTP client for the LexiLearn backend.
//!
//! Every request carries the stored bearer token. When the backend answers
//! 401 because the token expired, the client performs a single refresh on
//! behalf of all concurrent callers and replays their requests with the new
//! token. Callers only ever see the final outcome.
//!
//! ```rust,no_run
//! use lexi_client::ApiClient;
//!
//! # async fn example() -> lexi_client::ClientResult<()> {
//! let client = ApiClient::builder()
//!     .base_url("http://localhost:5000/api")
//!     .build()?;
//!
//! client.auth().login("alice@example.com", "Password123").await?;
//! let lessons = client.lessons().list().await?;
//! println!("{lessons}");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod navigation;
pub mod session;
pub mod store;

// Re-export commonly used types at crate root
pub use api::{
    AdminApi, AiChatApi, AnalysisApi, AuthApi, LessonsApi, SpeakingApi, StudentsApi, TasksApi,
    TeachersApi, UploadApi,
};
pub use error::{ClientError, ClientResult, RefreshError, RefreshErrorKind};
pub use http::{ApiClient, ApiClientBuilder, ApiRequest, FormPart, MultipartBody, RequestBody, RequestContext};
pub use navigation::RouteTracker;
pub use session::RefreshCoordinator;
pub use store::{FileTokenStore, MemoryTokenStore};

pub use lexi_core::{HeadlessNavigator, Navigator, SessionToken, TokenStore};
