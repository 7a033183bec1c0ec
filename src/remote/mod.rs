//! Remote authentication service seam
//!
//! The resolver and the sign-up flow only see [`AuthService`]. Outcomes are
//! three-way so callers can tell an authoritative "no" apart from "could not
//! ask": the resolver falls back on [`RemoteOutcome::Unreachable`] and stops on
//! [`RemoteOutcome::Rejected`].

mod http;
#[cfg(test)]
pub(crate) mod scripted;

pub use http::HttpAuthService;

use async_trait::async_trait;
use serde::{Serialize, Serializer};
use zeroize::Zeroizing;

use crate::types::{Language, ProfileFields};

/// Result of one call to the auth service
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteOutcome<T> {
    /// Service reached and the request succeeded
    Accepted(T),
    /// Service reached and explicitly refused (reason from the service)
    Rejected(String),
    /// Transport failure, non-2xx status, timeout or unreadable body
    Unreachable(String),
}

impl<T> RemoteOutcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RemoteOutcome<U> {
        match self {
            RemoteOutcome::Accepted(v) => RemoteOutcome::Accepted(f(v)),
            RemoteOutcome::Rejected(r) => RemoteOutcome::Rejected(r),
            RemoteOutcome::Unreachable(r) => RemoteOutcome::Unreachable(r),
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, RemoteOutcome::Unreachable(_))
    }
}

/// Account creation payload sent to `POST /auth/register`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(serialize_with = "serialize_secret")]
    pub password: Zeroizing<String>,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<u8>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub school: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_code: Option<String>,
    pub language: Language,
}

fn serialize_secret<S: Serializer>(secret: &Zeroizing<String>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(secret.as_str())
}

/// Accepted registration
#[derive(Debug, Clone, Default)]
pub struct Registration {
    /// Created user, when the service returns one
    pub user: Option<ProfileFields>,
    /// The account must be verified (e.g. by email) before full use
    pub requires_verification: bool,
}

/// Remote authentication service
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials; on success returns the user record
    async fn login(&self, identifier: &str, secret: &str) -> RemoteOutcome<ProfileFields>;

    /// Create an account
    async fn register(&self, request: &RegistrationRequest) -> RemoteOutcome<Registration>;
}

/// Service used when no auth URL is configured: always unreachable, so sign-in
/// runs entirely on the offline tiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAuthService;

#[async_trait]
impl AuthService for OfflineAuthService {
    async fn login(&self, _identifier: &str, _secret: &str) -> RemoteOutcome<ProfileFields> {
        RemoteOutcome::Unreachable("no auth service configured".into())
    }

    async fn register(&self, _request: &RegistrationRequest) -> RemoteOutcome<Registration> {
        RemoteOutcome::Unreachable("no auth service configured".into())
    }
}
