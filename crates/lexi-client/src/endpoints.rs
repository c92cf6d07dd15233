//! Backend endpoint paths, relative to the configured base URL

pub const LOGIN: &str = "/auth/login";
pub const REGISTER: &str = "/auth/register";
pub const REFRESH_TOKEN: &str = "/auth/refresh-token";
pub const LOGOUT: &str = "/auth/logout";
pub const VERIFY_OTP: &str = "/auth/verify-otp";
pub const RESEND_OTP: &str = "/auth/resend-otp";
pub const FORGOT_PASSWORD: &str = "/auth/forgot-password";
pub const RESET_PASSWORD: &str = "/auth/reset-password";
pub const ME: &str = "/auth/me";

pub const LESSONS: &str = "/lessons";
pub const TASKS: &str = "/tasks";
pub const SPEAKING: &str = "/speaking";
pub const AI_CHAT: &str = "/ai-chat";
pub const ADMIN: &str = "/admin";
pub const TEACHERS: &str = "/teachers";
pub const STUDENTS: &str = "/students";
pub const UPLOAD: &str = "/upload";
pub const LEXICAL_ANALYSIS: &str = "/analysis/lexical";

/// Strip the query string and trailing slashes from a request path
#[must_use]
pub fn normalize_path(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// Whether a request to `path` must never trigger session recovery.
///
/// The login and refresh calls are exempt: a 401 from either is the final
/// answer, otherwise a failed login would refresh and a failed refresh would
/// refresh again.
#[must_use]
pub fn is_recovery_exempt(path: &str) -> bool {
    let path = normalize_path(path);
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    path == LOGIN || path == REFRESH_TOKEN
}
