//! Endpoint groups
//!
//! Borrowing views over an [`ApiClient`](crate::ApiClient), one per backend
//! area. Every call goes through the client's request path and so gets
//! bearer attachment and session recovery for free.

mod admin;
mod ai_chat;
mod analysis;
mod auth;
mod lessons;
mod speaking;
mod students;
mod tasks;
mod teachers;
mod upload;

pub use admin::AdminApi;
pub use ai_chat::AiChatApi;
pub use analysis::AnalysisApi;
pub use auth::AuthApi;
pub use lessons::LessonsApi;
pub use speaking::SpeakingApi;
pub use students::StudentsApi;
pub use tasks::TasksApi;
pub use teachers::TeachersApi;
pub use upload::UploadApi;

/// Join a collection path with an item id
fn item_path(base: &str, id: &str) -> String {
    format!("{base}/{}", id.trim_matches('/'))
}
