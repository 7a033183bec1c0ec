//! Profile Store - durable client-side persistence
//!
//! Holds at most one cached [`UserProfile`] plus two preference flags. It is
//! the only component that touches durable storage; everything else goes
//! through [`ProfileStore`].
//!
//! ## Keys
//!
//! | Key          | Value                         |
//! |--------------|-------------------------------|
//! | `profile`    | camelCase JSON profile record |
//! | `rememberMe` | bool                          |
//! | `language`   | ISO 639-1 code                |
//!
//! Writes are whole-record replacements. A record that fails to decode is
//! treated as absent (and logged) rather than failing startup.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::types::{Language, UserProfile};

const PROFILE_KEY: &str = "profile";
const REMEMBER_ME_KEY: &str = "rememberMe";
const LANGUAGE_KEY: &str = "language";

/// Key-value backend under the profile store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Typed access to the three persisted keys
#[derive(Clone)]
pub struct ProfileStore {
    backend: Arc<dyn KeyValueStore>,
}

impl ProfileStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// File-backed store at `path` (created on first write)
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self::new(Arc::new(FileStore::open(path)?)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// The cached profile, if one decodes cleanly
    pub fn cached_profile(&self) -> Result<Option<UserProfile>, StoreError> {
        let Some(value) = self.backend.get(PROFILE_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_value::<UserProfile>(value) {
            Ok(profile) if profile.is_well_formed() => Ok(Some(profile)),
            Ok(_) => {
                warn!("Cached profile is missing its id or username, ignoring");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Cached profile does not decode, ignoring");
                Ok(None)
            }
        }
    }

    pub fn save_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.backend
            .set(PROFILE_KEY, serde_json::to_value(profile)?)?;
        debug!(user_id = %profile.id(), "Cached profile saved");
        Ok(())
    }

    pub fn clear_profile(&self) -> Result<(), StoreError> {
        self.backend.remove(PROFILE_KEY)
    }

    // =========================================================================
    // Preferences
    // =========================================================================

    pub fn remember_me(&self) -> Result<bool, StoreError> {
        Ok(self
            .backend
            .get(REMEMBER_ME_KEY)?
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    /// Set the marker, or remove it entirely when `remember` is false
    pub fn set_remember_me(&self, remember: bool) -> Result<(), StoreError> {
        if remember {
            self.backend.set(REMEMBER_ME_KEY, Value::Bool(true))
        } else {
            self.backend.remove(REMEMBER_ME_KEY)
        }
    }

    /// Persisted interface language; unknown codes read as absent
    pub fn language(&self) -> Result<Option<Language>, StoreError> {
        Ok(self
            .backend
            .get(LANGUAGE_KEY)?
            .and_then(|v| v.as_str().and_then(Language::from_code)))
    }

    pub fn set_language(&self, language: Language) -> Result<(), StoreError> {
        self.backend
            .set(LANGUAGE_KEY, Value::String(language.code().to_string()))
    }
}

impl std::fmt::Debug for ProfileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileStore").finish_non_exhaustive()
    }
}
