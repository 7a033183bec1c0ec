//! `reqwest` client for the auth service.
//!
//! Both endpoints answer with the same envelope:
//!
//! ```text
//! { "success": bool, "user"?: {...}, "error"?: string, "requiresVerification"?: bool }
//! ```

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{AuthService, Registration, RegistrationRequest, RemoteOutcome};
use crate::error::ClientError;
use crate::types::ProfileFields;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthEnvelope {
    success: bool,
    #[serde(default)]
    user: Option<ProfileFields>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    requires_verification: bool,
}

/// HTTP implementation of [`AuthService`]
#[derive(Debug, Clone)]
pub struct HttpAuthService {
    base_url: String,
    http: reqwest::Client,
}

impl HttpAuthService {
    /// Client for the service at `base_url`, every request bounded by `timeout`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> RemoteOutcome<AuthEnvelope> {
        let url = format!("{}{}", self.base_url, path);

        let response = match self.http.post(&url).json(body).send().await {
            Ok(response) => response,
            Err(e) => return RemoteOutcome::Unreachable(format!("Request failed: {}", e)),
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return RemoteOutcome::Unreachable(format!("Failed to read body: {}", e)),
        };

        debug!(%url, %status, "Auth service responded");
        classify(status, &text)
    }
}

/// Map a raw response onto the three-way outcome
fn classify(status: StatusCode, body: &str) -> RemoteOutcome<AuthEnvelope> {
    if !status.is_success() {
        return RemoteOutcome::Unreachable(format!("Auth service returned {}", status));
    }

    let envelope = match serde_json::from_str::<AuthEnvelope>(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            return RemoteOutcome::Unreachable(format!("Malformed auth response: {}", e))
        }
    };

    if envelope.success {
        RemoteOutcome::Accepted(envelope)
    } else {
        RemoteOutcome::Rejected(
            envelope
                .error
                .unwrap_or_else(|| "Request rejected".to_string()),
        )
    }
}

fn login_outcome(outcome: RemoteOutcome<AuthEnvelope>) -> RemoteOutcome<ProfileFields> {
    match outcome {
        RemoteOutcome::Accepted(AuthEnvelope { user: Some(user), .. }) => {
            RemoteOutcome::Accepted(user)
        }
        RemoteOutcome::Accepted(_) => {
            RemoteOutcome::Unreachable("Login succeeded without a user record".into())
        }
        RemoteOutcome::Rejected(reason) => RemoteOutcome::Rejected(reason),
        RemoteOutcome::Unreachable(reason) => RemoteOutcome::Unreachable(reason),
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, identifier: &str, secret: &str) -> RemoteOutcome<ProfileFields> {
        let body = serde_json::json!({
            "identifier": identifier,
            "password": secret,
        });
        login_outcome(self.post("/auth/login", &body).await)
    }

    async fn register(&self, request: &RegistrationRequest) -> RemoteOutcome<Registration> {
        self.post("/auth/register", request)
            .await
            .map(|envelope| Registration {
                user: envelope.user,
                requires_verification: envelope.requires_verification,
            })
    }
}
