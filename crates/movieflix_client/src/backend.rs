//! crates/movieflix_client/src/backend.rs
//!
//! HTTP implementation of the `AuthGateway` port against the first-party
//! auth server's `{success, data, message}` envelope protocol.

use std::time::Duration;

use async_trait::async_trait;
use movieflix_core::domain::{Account, AuthSession};
use movieflix_core::ports::{AuthError, AuthGateway, AuthResult};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

/// Everything the server sends is wrapped in this envelope.
#[derive(Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

pub struct BackendGateway {
    http: reqwest::Client,
    base_url: String,
}

impl BackendGateway {
    /// Builds a gateway with a bounded per-request timeout. Calls are
    /// single-shot; nothing here retries.
    pub fn new(base_url: &str, timeout: Duration) -> AuthResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Unexpected(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn transport_error(err: reqwest::Error) -> AuthError {
        if err.is_timeout() {
            AuthError::NetworkTimeout
        } else if err.is_connect() || err.is_request() {
            AuthError::NetworkUnavailable
        } else {
            AuthError::Unexpected(err.to_string())
        }
    }

    /// Unwraps the response envelope, mapping failure statuses back into the
    /// typed taxonomy. `unauthorized` is what a 401 means for this call.
    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
        unauthorized: AuthError,
    ) -> AuthResult<T> {
        let status = response.status();
        let envelope: Envelope<T> = response.json().await.map_err(Self::transport_error)?;

        if status.is_success() && envelope.success {
            return envelope
                .data
                .ok_or_else(|| AuthError::Unexpected("Response envelope carried no data".into()));
        }

        let message = envelope
            .message
            .unwrap_or_else(|| format!("Request failed with status {status}"));
        debug!(%status, %message, "auth server rejected request");

        Err(match status {
            StatusCode::BAD_REQUEST => AuthError::Validation(message),
            StatusCode::CONFLICT => AuthError::DuplicateEmail,
            StatusCode::UNAUTHORIZED => unauthorized,
            _ => AuthError::Unexpected(message),
        })
    }
}

#[async_trait]
impl AuthGateway for BackendGateway {
    async fn register(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> AuthResult<AuthSession> {
        let response = self
            .http
            .post(format!("{}/api/auth/register", self.base_url))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "username": username,
            }))
            .send()
            .await
            .map_err(Self::transport_error)?;

        Self::decode(response, AuthError::InvalidCredentials).await
    }

    async fn login(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        let response = self
            .http
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .map_err(Self::transport_error)?;

        Self::decode(response, AuthError::InvalidCredentials).await
    }

    async fn profile(&self, token: &str) -> AuthResult<Account> {
        let response = self
            .http
            .get(format!("{}/api/auth/profile", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(Self::transport_error)?;

        // A 401 here means the stored token is no longer usable, whatever the
        // precise server-side reason.
        Self::decode(response, AuthError::TokenInvalid).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_decodes_success_payload() {
        let body = r#"{
            "success": true,
            "data": {
                "account": {
                    "id": "7c0ffcb8-5b3b-44f5-9f10-2f6bca63ad25",
                    "email": "user@example.com",
                    "username": "moviefan",
                    "created_at": "2026-01-15T10:00:00Z"
                },
                "token": "abc.def.ghi"
            }
        }"#;

        let envelope: Envelope<AuthSession> = serde_json::from_str(body).unwrap();
        assert!(envelope.success);
        let session = envelope.data.unwrap();
        assert_eq!(session.account.username, "moviefan");
        assert_eq!(session.token, "abc.def.ghi");
    }

    #[test]
    fn test_envelope_decodes_failure_body() {
        let body = r#"{"success": false, "message": "Invalid email or password"}"#;
        let envelope: Envelope<AuthSession> = serde_json::from_str(body).unwrap();
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(
            envelope.message.as_deref(),
            Some("Invalid email or password")
        );
    }
}
