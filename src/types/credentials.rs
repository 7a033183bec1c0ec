//! Transient sign-in credentials

use zeroize::Zeroizing;

use crate::error::ValidationError;

/// Identifier (username or email) plus secret, alive for one sign-in attempt.
///
/// Never serialized. The secret is wiped from memory on drop and redacted
/// from `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    identifier: String,
    secret: Zeroizing<String>,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into().trim().to_string(),
            secret: Zeroizing::new(secret.into()),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Local shape check before any tier is consulted
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.identifier.is_empty() {
            return Err(ValidationError::Required("identifier"));
        }
        if self.secret.is_empty() {
            return Err(ValidationError::Required("password"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}
