//! Portal biometric API: enroll, verify-for-voting, status.

use crate::error::{ClientError, FailureKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REGISTER_PATH: &str = "/api/face/register";
const VERIFY_PATH: &str = "/api/face/verify-for-voting";
const STATUS_PATH: &str = "/api/face/status";

#[derive(Serialize)]
struct ImagePayload<'a> {
    image_data: &'a str,
}

/// Enrollment endpoint acknowledgement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnrollAck {
    pub message: Option<String>,
    pub status: Option<String>,
}

impl EnrollAck {
    /// Success indicator: a message, or an explicit success status.
    pub fn succeeded(&self) -> bool {
        self.message.is_some() || self.status.as_deref() == Some("success")
    }
}

/// Verification endpoint acknowledgement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyAck {
    pub verified: Option<bool>,
    pub is_match: Option<bool>,
    pub message: Option<String>,
}

impl VerifyAck {
    /// Success indicator: any of the verified/match/message fields set.
    pub fn succeeded(&self) -> bool {
        self.verified.unwrap_or(false) || self.is_match.unwrap_or(false) || self.message.is_some()
    }
}

/// Registration state for the authenticated account.
#[derive(Debug, Clone, Deserialize)]
pub struct FaceStatus {
    pub has_face_registered: bool,
    pub is_verified: bool,
}

/// Error body shape shared by all portal endpoints. `code` is the
/// structured classifier; `detail` is prose for the legacy shim.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
    code: Option<String>,
}

/// Remote biometric endpoints, as consumed by the capture controller.
///
/// The controller is generic over this trait so tests can script
/// responses without a server.
#[allow(async_fn_in_trait)]
pub trait BiometricBackend {
    async fn enroll(&self, image_b64: &str, token: &str) -> Result<EnrollAck, ClientError>;
    async fn verify(&self, image_b64: &str, token: &str) -> Result<VerifyAck, ClientError>;
}

/// HTTP client for the portal's face endpoints.
#[derive(Debug, Clone)]
pub struct BiometricClient {
    http: reqwest::Client,
    base_url: String,
}

impl BiometricClient {
    /// Build a client for the given portal base URL.
    ///
    /// `timeout` bounds each submission; `None` leaves requests unbounded.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let http = builder.build().unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Query the registration state for the authenticated account.
    pub async fn status(&self, token: &str) -> Result<FaceStatus, ClientError> {
        let url = format!("{}{STATUS_PATH}", self.base_url);
        let response = self.http.get(&url).bearer_auth(token).send().await?;
        Self::interpret(response).await
    }

    async fn post_image<T: DeserializeOwned>(
        &self,
        path: &str,
        image_b64: &str,
        token: &str,
    ) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(url = %url, bytes = image_b64.len(), "submitting capture");

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&ImagePayload {
                image_data: image_b64,
            })
            .send()
            .await?;

        Self::interpret(response).await
    }

    async fn interpret<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        let detail = body.detail.unwrap_or_else(|| format!("HTTP {status}"));
        let kind = FailureKind::classify(body.code.as_deref(), &detail);
        tracing::warn!(status = status.as_u16(), ?kind, detail = %detail, "endpoint rejected request");

        Err(ClientError::Endpoint {
            status: status.as_u16(),
            kind,
            detail,
        })
    }
}

impl BiometricBackend for BiometricClient {
    async fn enroll(&self, image_b64: &str, token: &str) -> Result<EnrollAck, ClientError> {
        self.post_image(REGISTER_PATH, image_b64, token).await
    }

    async fn verify(&self, image_b64: &str, token: &str) -> Result<VerifyAck, ClientError> {
        self.post_image(VERIFY_PATH, image_b64, token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enroll_ack_message_is_success() {
        let ack: EnrollAck =
            serde_json::from_str(r#"{"message": "Face registered successfully", "status": "verified"}"#)
                .unwrap();
        assert!(ack.succeeded());
    }

    #[test]
    fn test_enroll_ack_status_success() {
        let ack: EnrollAck = serde_json::from_str(r#"{"status": "success"}"#).unwrap();
        assert!(ack.succeeded());
    }

    #[test]
    fn test_enroll_ack_empty_is_soft_failure() {
        let ack: EnrollAck = serde_json::from_str(r#"{}"#).unwrap();
        assert!(!ack.succeeded());
    }

    #[test]
    fn test_verify_ack_verified_flag() {
        let ack: VerifyAck =
            serde_json::from_str(r#"{"verified": true, "is_match": true}"#).unwrap();
        assert!(ack.succeeded());
    }

    #[test]
    fn test_verify_ack_declined() {
        let ack: VerifyAck = serde_json::from_str(r#"{"verified": false}"#).unwrap();
        assert!(!ack.succeeded());
    }

    #[test]
    fn test_verify_ack_message_only() {
        let ack: VerifyAck =
            serde_json::from_str(r#"{"message": "Face verified successfully"}"#).unwrap();
        assert!(ack.succeeded());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = BiometricClient::new("http://localhost:8000/", None);
        assert_eq!(client.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_face_status_parses() {
        let status: FaceStatus =
            serde_json::from_str(r#"{"has_face_registered": true, "is_verified": false}"#).unwrap();
        assert!(status.has_face_registered);
        assert!(!status.is_verified);
    }
}
