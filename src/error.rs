//! Error types for the Lamad client
//!
//! One enum per concern, folded into [`ClientError`] for callers that do not
//! care which component failed. Every user-facing error maps to a
//! [`MessageKey`](crate::i18n::MessageKey) so the host can render it in the
//! session language.

use thiserror::Error;

use crate::i18n::{self, MessageKey};
use crate::types::Language;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Top-level client error
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Onboarding(#[from] OnboardingError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration error (bad catalogue/roster file, bad URL)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Stable key for the user-facing message
    pub fn message_key(&self) -> MessageKey {
        match self {
            ClientError::Auth(e) => e.message_key(),
            ClientError::Registration(e) => e.message_key(),
            ClientError::Validation(_) => MessageKey::InvalidInput,
            ClientError::Onboarding(_) | ClientError::Session(_) => MessageKey::NotAllowedNow,
            ClientError::Store(_) => MessageKey::StorageFailure,
            ClientError::Config(_) => MessageKey::Generic,
        }
    }

    /// User-facing message in `language`
    pub fn localized(&self, language: Language) -> &'static str {
        i18n::message(self.message_key(), language)
    }
}

/// Sign-in failure surfaced by the credential resolver.
///
/// Only the terminal outcome of a resolution is ever surfaced; intermediate
/// tier failures are logged and swallowed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// A reachable auth service explicitly rejected the credentials
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Remote unreachable and no offline tier recognised the identifier
    #[error("Sign-in unavailable: service unreachable and no offline match")]
    Unavailable,

    /// Another sign-in attempt is already in flight
    #[error("Sign-in already in progress")]
    Busy,

    /// The in-flight attempt was cancelled before it finished
    #[error("Sign-in cancelled")]
    Cancelled,

    /// Credentials failed local shape checks
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Authenticated, but the profile could not be persisted
    #[error("Failed to persist signed-in profile: {0}")]
    Storage(String),
}

impl AuthError {
    pub fn message_key(&self) -> MessageKey {
        match self {
            AuthError::InvalidCredentials(_) => MessageKey::InvalidCredentials,
            AuthError::Unavailable => MessageKey::SignInUnavailable,
            AuthError::Busy => MessageKey::SignInBusy,
            AuthError::Cancelled => MessageKey::SignInCancelled,
            AuthError::Validation(_) => MessageKey::InvalidInput,
            AuthError::Storage(_) => MessageKey::StorageFailure,
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::Storage(err.to_string())
    }
}

/// Account creation failure. Registration has no fallback path and is never
/// retried automatically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// Server-side rejection (duplicate username, bad teacher code, ...)
    #[error("Registration rejected: {0}")]
    Rejected(String),

    /// The auth service could not be reached
    #[error("Registration service unreachable: {0}")]
    Unreachable(String),

    /// The service accepted the account but returned an unusable profile
    #[error("Malformed registration response: {0}")]
    Malformed(String),
}

impl RegistrationError {
    pub fn message_key(&self) -> MessageKey {
        match self {
            RegistrationError::Rejected(_) => MessageKey::RegistrationRejected,
            RegistrationError::Unreachable(_) => MessageKey::RegistrationUnreachable,
            RegistrationError::Malformed(_) => MessageKey::Generic,
        }
    }
}

/// Client-side input shape errors. Handled locally; never sent to the service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    Required(&'static str),

    #[error("Username must be 3-20 characters of letters, digits, '.', '_' or '-'")]
    InvalidUsername,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Grade {0} is outside 6-12")]
    GradeOutOfRange(u8),

    #[error("Teacher enrollment code required")]
    MissingTeacherCode,

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown language code: {0}")]
    UnknownLanguage(String),
}

/// Onboarding flow errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OnboardingError {
    /// The event is not valid for the current step; the step is unchanged
    #[error("Cannot {event} from onboarding step '{step}'")]
    InvalidTransition {
        step: &'static str,
        event: &'static str,
    },
}

/// Rejected session transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No profile is signed in")]
    NotSignedIn,

    #[error("A profile is already signed in")]
    AlreadySignedIn,

    #[error("Unknown demo account: {0}")]
    UnknownDemoAccount(String),

    #[error("Activity reference must not be empty")]
    EmptyReference,

    #[error("No demo account selected")]
    NoDemoSelected,

    #[error(transparent)]
    Onboarding(#[from] OnboardingError),
}

/// Durable storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
