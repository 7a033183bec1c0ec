//! Lamad Client - session core for the Lamad K-12 learning client
//!
//! Decides *who* is signed in and *what* they are looking at, and keeps both
//! decisions standing when the network is gone, an identifier is unknown, or a
//! registration only half-completed.
//!
//! # Architecture
//!
//! ```text
//! SessionController ──owns──► Session { language, Phase }
//!   │                              │
//!   ├── OnboardingMachine          ├── SignedOut { onboarding, pending_demo }
//!   ├── CredentialResolver         └── SignedIn  { profile, activity, history }
//!   │     Remote → Demo roster → Cached profile
//!   ├── ActivityRouter (pure)
//!   └── ProfileStore ──► KeyValueStore (file / memory)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use lamad_client::{
//!     ActivityRouter, CredentialResolver, DemoRoster, OfflineAuthService,
//!     ProfileStore, ResolverConfig, SessionController,
//! };
//! use std::sync::Arc;
//!
//! let store = ProfileStore::open("/data/lamad/profile.json")?;
//! let service = Arc::new(OfflineAuthService);
//! let resolver = CredentialResolver::new(
//!     service.clone(),
//!     DemoRoster::builtin(),
//!     store.clone(),
//!     ResolverConfig::default(),
//! );
//! let mut controller =
//!     SessionController::new(store, resolver, service, ActivityRouter::builtin());
//!
//! controller.restore()?;
//! controller.navigate("advanced-math-unit3")?;
//! let view = controller.current_view();
//! ```

// Error types
pub mod error;

// Profile, role, language and credential types
pub mod types;

// Durable client-side persistence
pub mod store;

// Remote authentication service seam
pub mod remote;

// Tiered credential resolution
pub mod auth;

// Activity reference routing
pub mod router;

// First-run onboarding flow
pub mod onboarding;

// Process-wide session state and controller
pub mod session;

// Localized user-facing messages
pub mod i18n;

// CLI / environment configuration
pub mod config;

pub use error::{
    AuthError, ClientError, OnboardingError, RegistrationError, Result, SessionError,
    StoreError, ValidationError,
};
pub use types::{Credentials, Enrollment, Grade, Language, ProfileFields, Role, UserProfile};

pub use store::{FileStore, KeyValueStore, MemoryStore, ProfileStore};

pub use remote::{
    AuthService, HttpAuthService, OfflineAuthService, Registration, RegistrationRequest,
    RemoteOutcome,
};

pub use auth::{
    AuthTier, CredentialResolver, DemoAccount, DemoRoster, InFlight, Resolution,
    ResolutionStats, ResolverConfig,
};

pub use router::{
    ActivityCatalogue, ActivityRef, ActivityRouter, DashboardView, GameHandler, NamedView,
    UnitView, ViewSelector,
};

pub use onboarding::{Intent, OnboardingEvent, OnboardingMachine, OnboardingStep, SignUpForm, Step};

pub use session::{ActiveView, Phase, Session, SessionController, SessionEffect, SessionEvent};

pub use config::Args;
