//! Authentication endpoints
//!
//! Login and OTP verification start a session by persisting the returned
//! token; logout ends it locally whatever the backend answers.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use validator::Validate;

use lexi_core::{
    ApiEnvelope, AuthData, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResendOtpRequest, ResetPasswordRequest, VerifyOtpRequest,
};

use crate::endpoints;
use crate::error::{ClientError, ClientResult};
use crate::http::{ApiClient, ApiRequest};

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Login with email and password
    ///
    /// POST /auth/login
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthData> {
        let request = LoginRequest::new(email, password);
        let data = self.submit::<_, AuthData>(endpoints::LOGIN, &request).await?;
        let data = require_data(data, "Login response carried no data")?;
        self.start_session(&data)?;
        Ok(data)
    }

    /// Register a new account. The backend follows up with an emailed OTP.
    ///
    /// POST /auth/register
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<ApiEnvelope<Value>> {
        self.submit(endpoints::REGISTER, request).await
    }

    /// Verify the registration OTP
    ///
    /// POST /auth/verify-otp
    pub async fn verify_otp(&self, email: &str, otp: &str) -> ClientResult<AuthData> {
        let request = VerifyOtpRequest {
            email: email.to_string(),
            otp: otp.to_string(),
        };
        let data = self.submit::<_, AuthData>(endpoints::VERIFY_OTP, &request).await?;
        let data = require_data(data, "Verification response carried no data")?;
        self.start_session(&data)?;
        Ok(data)
    }

    /// POST /auth/resend-otp
    pub async fn resend_otp(&self, email: &str) -> ClientResult<String> {
        let request = ResendOtpRequest {
            email: email.to_string(),
        };
        let envelope = self.submit::<_, Value>(endpoints::RESEND_OTP, &request).await?;
        Ok(envelope.message_or("Verification code sent"))
    }

    /// POST /auth/forgot-password
    pub async fn forgot_password(&self, email: &str) -> ClientResult<String> {
        let request = ForgotPasswordRequest {
            email: email.to_string(),
        };
        let envelope = self
            .submit::<_, Value>(endpoints::FORGOT_PASSWORD, &request)
            .await?;
        Ok(envelope.message_or("Password reset email sent"))
    }

    /// POST /auth/reset-password
    pub async fn reset_password(&self, token: &str, new_password: &str) -> ClientResult<String> {
        let request = ResetPasswordRequest {
            token: token.to_string(),
            new_password: new_password.to_string(),
        };
        let envelope = self
            .submit::<_, Value>(endpoints::RESET_PASSWORD, &request)
            .await?;
        Ok(envelope.message_or("Password has been reset"))
    }

    /// Logout the current user
    ///
    /// POST /auth/logout
    ///
    /// The local session is cleared even if the backend call fails; only a
    /// failure to clear the token store is reported.
    pub async fn logout(&self) -> ClientResult<()> {
        let result = self
            .client
            .request::<Value>(ApiRequest::post(endpoints::LOGOUT))
            .await;
        if let Err(e) = &result {
            warn!(error = %e, "Logout request failed, clearing session anyway");
        }

        self.client.clear_token()?;
        info!("Logged out");
        Ok(())
    }

    /// Current user profile
    ///
    /// GET /auth/me
    pub async fn me(&self) -> ClientResult<Value> {
        self.client.get(endpoints::ME).await
    }

    /// Validate, send, and unwrap a credential envelope
    async fn submit<B, T>(&self, path: &str, body: &B) -> ClientResult<ApiEnvelope<T>>
    where
        B: Serialize + Validate,
        T: DeserializeOwned,
    {
        body.validate()?;
        let envelope: ApiEnvelope<T> = self.client.post(path, body).await?;
        if !envelope.success {
            return Err(ClientError::Rejected {
                message: envelope.message_or("Request failed"),
            });
        }
        Ok(envelope)
    }

    fn start_session(&self, data: &AuthData) -> ClientResult<()> {
        // Unverified accounts log in without a token and must verify first
        if let Some(token) = data.session_token()? {
            self.client.set_token(&token)?;
            info!("Session started");
        }
        Ok(())
    }
}

fn require_data<T>(envelope: ApiEnvelope<T>, missing: &str) -> ClientResult<T> {
    envelope.data.ok_or_else(|| ClientError::Rejected {
        message: missing.to_string(),
    })
}
