//! Credential Resolution - tiered sign-in
//!
//! ## Architecture
//!
//! ```text
//! resolve(identifier, secret)
//!    → Remote auth service     (authoritative)
//!         ↓ unreachable         rejected → InvalidCredentials, stop
//!    → Demo roster             (identifier + secret, exact)
//!         ↓ no match
//!    → Cached profile          (identifier only)
//!         ↓ no match
//!    → Unavailable
//! ```
//!
//! Tiers run strictly in order, never concurrently and never twice in one
//! call. Only the terminal outcome is surfaced; tier misses are logged.
//!
//! ## Offline mode
//!
//! The cached-profile tier accepts the identifier alone, whatever the secret.
//! It lets a returning user into their own device while offline and is
//! logged at `warn` every time it is used.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::guard::InFlight;
use super::roster::DemoRoster;
use crate::error::AuthError;
use crate::remote::{AuthService, RemoteOutcome};
use crate::store::ProfileStore;
use crate::types::{Credentials, UserProfile};

// =============================================================================
// Resolution Types
// =============================================================================

/// Which tier authenticated the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthTier {
    Remote,
    DemoRoster,
    CachedProfile,
}

impl AuthTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthTier::Remote => "remote",
            AuthTier::DemoRoster => "demo-roster",
            AuthTier::CachedProfile => "cached-profile",
        }
    }
}

/// Successful sign-in
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub profile: UserProfile,
    pub tier: AuthTier,
}

/// Resolver tuning
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Upper bound on the remote call; exceeding it counts as unreachable
    pub remote_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            remote_timeout: Duration::from_secs(10),
        }
    }
}

/// Sign-in statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    /// Attempts that passed local validation and acquired the slot
    pub attempts: u64,
    pub remote_successes: u64,
    pub roster_successes: u64,
    pub cache_successes: u64,
    /// Times the roster was consulted (remote unreachable)
    pub roster_lookups: u64,
    /// Times the cached profile was consulted
    pub cache_lookups: u64,
    /// Authoritative rejections from the remote service
    pub rejections: u64,
    /// Attempts that exhausted every tier
    pub exhausted: u64,
    pub cancelled: u64,
}

// =============================================================================
// Credential Resolver
// =============================================================================

pub struct CredentialResolver {
    service: Arc<dyn AuthService>,
    roster: DemoRoster,
    store: ProfileStore,
    config: ResolverConfig,
    in_flight: InFlight,
    stats: RwLock<ResolutionStats>,
}

impl CredentialResolver {
    pub fn new(
        service: Arc<dyn AuthService>,
        roster: DemoRoster,
        store: ProfileStore,
        config: ResolverConfig,
    ) -> Self {
        info!(
            demo_accounts = roster.len(),
            remote_timeout_ms = config.remote_timeout.as_millis() as u64,
            "Credential resolver initialized"
        );
        Self {
            service,
            roster,
            store,
            config,
            in_flight: InFlight::new(),
            stats: RwLock::new(ResolutionStats::default()),
        }
    }

    /// Resolve credentials to exactly one profile.
    ///
    /// Credentials are taken as given; shape checks belong to the caller.
    /// On success the profile's last-login time is stamped, the profile is
    /// cached, and the remember-me marker is set (or cleared when `remember`
    /// is false). A failed or cancelled attempt has no side effects.
    pub async fn resolve(
        &self,
        credentials: Credentials,
        remember: bool,
    ) -> Result<Resolution, AuthError> {
        let permit = self.in_flight.try_acquire().ok_or_else(|| {
            debug!("Sign-in rejected, another attempt is in flight");
            AuthError::Busy
        })?;
        self.stats.write().await.attempts += 1;

        let identifier = credentials.identifier();

        // Tier 1: remote
        let outcome = tokio::select! {
            _ = permit.token().cancelled() => {
                return Err(self.cancelled(identifier).await);
            }
            result = tokio::time::timeout(
                self.config.remote_timeout,
                self.service.login(identifier, credentials.secret()),
            ) => match result {
                Ok(outcome) => outcome,
                Err(_) => RemoteOutcome::Unreachable(format!(
                    "timed out after {}ms",
                    self.config.remote_timeout.as_millis()
                )),
            },
        };

        let (profile, tier) = match outcome {
            RemoteOutcome::Accepted(fields) => match fields.into_profile(Utc::now()) {
                Ok(profile) => (profile, AuthTier::Remote),
                Err(e) => {
                    warn!(identifier, error = %e, "Auth service returned an unusable profile, falling back");
                    self.resolve_offline(&credentials).await?
                }
            },
            RemoteOutcome::Rejected(reason) => {
                self.stats.write().await.rejections += 1;
                info!(identifier, reason = %reason, "Sign-in rejected by auth service");
                return Err(AuthError::InvalidCredentials(reason));
            }
            RemoteOutcome::Unreachable(reason) => {
                debug!(identifier, reason = %reason, "Auth service unreachable, trying offline tiers");
                self.resolve_offline(&credentials).await?
            }
        };

        if permit.is_cancelled() {
            return Err(self.cancelled(identifier).await);
        }

        let profile = self.commit(profile, remember)?;
        self.record_success(tier).await;

        info!(
            identifier,
            user_id = %profile.id(),
            tier = tier.as_str(),
            "Sign-in resolved"
        );

        Ok(Resolution { profile, tier })
    }

    /// Tiers 2 and 3
    async fn resolve_offline(
        &self,
        credentials: &Credentials,
    ) -> Result<(UserProfile, AuthTier), AuthError> {
        let identifier = credentials.identifier();

        self.stats.write().await.roster_lookups += 1;
        if let Some(account) = self.roster.find(identifier, credentials.secret()) {
            debug!(identifier, "Matched demo roster account");
            return Ok((account.to_profile()?, AuthTier::DemoRoster));
        }

        self.stats.write().await.cache_lookups += 1;
        let cached = match self.store.cached_profile() {
            Ok(cached) => cached,
            Err(e) => {
                warn!(error = %e, "Failed to read cached profile");
                None
            }
        };

        if let Some(profile) = cached.filter(|p| p.matches_identifier(identifier)) {
            warn!(
                identifier,
                user_id = %profile.id(),
                "Offline sign-in accepted on identifier alone from cached profile"
            );
            return Ok((profile, AuthTier::CachedProfile));
        }

        self.stats.write().await.exhausted += 1;
        info!(identifier, "Sign-in unavailable, no tier recognised the identifier");
        Err(AuthError::Unavailable)
    }

    fn commit(&self, mut profile: UserProfile, remember: bool) -> Result<UserProfile, AuthError> {
        profile.touch_login(Utc::now());
        self.store.save_profile(&profile)?;
        self.store.set_remember_me(remember)?;
        Ok(profile)
    }

    async fn record_success(&self, tier: AuthTier) {
        let mut stats = self.stats.write().await;
        match tier {
            AuthTier::Remote => stats.remote_successes += 1,
            AuthTier::DemoRoster => stats.roster_successes += 1,
            AuthTier::CachedProfile => stats.cache_successes += 1,
        }
    }

    async fn cancelled(&self, identifier: &str) -> AuthError {
        self.stats.write().await.cancelled += 1;
        info!(identifier, "Sign-in cancelled");
        AuthError::Cancelled
    }

    /// Cancel the in-flight attempt, if any
    pub fn cancel(&self) -> bool {
        self.in_flight.cancel()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_busy()
    }

    pub fn roster(&self) -> &DemoRoster {
        &self.roster
    }

    pub async fn stats(&self) -> ResolutionStats {
        self.stats.read().await.clone()
    }

    pub async fn reset_stats(&self) {
        *self.stats.write().await = ResolutionStats::default();
    }
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("roster", &self.roster.len())
            .field("config", &self.config)
            .field("busy", &self.in_flight.is_busy())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::scripted::ScriptedAuthService;
    use crate::types::{Enrollment, Grade, ProfileFields};

    fn resolver_with(service: ScriptedAuthService) -> (Arc<CredentialResolver>, Arc<ScriptedAuthService>, ProfileStore) {
        let service = Arc::new(service);
        let store = ProfileStore::in_memory();
        let resolver = CredentialResolver::new(
            service.clone(),
            DemoRoster::builtin(),
            store.clone(),
            ResolverConfig::default(),
        );
        (Arc::new(resolver), service, store)
    }

    fn remote_user() -> ProfileFields {
        ProfileFields {
            id: "srv-42".into(),
            name: "Neha Gupta".into(),
            username: "neha".into(),
            email: "neha@example.in".into(),
            role: Some("student".into()),
            grade: Some(10),
            ..Default::default()
        }
    }

    fn cached(store: &ProfileStore) -> UserProfile {
        let profile = UserProfile::new(
            "local-7",
            "Rohan",
            "rohan",
            "Rohan@Example.in",
            Enrollment::Student {
                grade: Grade::try_from(6).unwrap(),
            },
            Utc::now(),
        );
        store.save_profile(&profile).unwrap();
        profile
    }

    #[tokio::test]
    async fn test_remote_success_wins() {
        let (resolver, _, store) = resolver_with(
            ScriptedAuthService::unreachable().with_login(RemoteOutcome::Accepted(remote_user())),
        );

        let resolution = resolver
            .resolve(Credentials::new("neha", "whatever"), true)
            .await
            .unwrap();

        assert_eq!(resolution.tier, AuthTier::Remote);
        assert_eq!(resolution.profile.id(), "srv-42");
        assert_eq!(store.cached_profile().unwrap().unwrap().id(), "srv-42");
        assert!(store.remember_me().unwrap());
    }

    #[tokio::test]
    async fn test_demo_account_when_remote_unreachable() {
        let (resolver, _, store) = resolver_with(ScriptedAuthService::unreachable());

        let resolution = resolver
            .resolve(Credentials::new("aarav.demo", "demo123"), false)
            .await
            .unwrap();

        assert_eq!(resolution.tier, AuthTier::DemoRoster);
        assert_eq!(resolution.profile.id(), "demo-aarav.demo");
        assert!(!store.remember_me().unwrap());
    }

    #[tokio::test]
    async fn test_rejection_never_consults_offline_tiers() {
        let (resolver, _, store) = resolver_with(
            ScriptedAuthService::unreachable()
                .with_login(RemoteOutcome::Rejected("Wrong password".into())),
        );
        cached(&store);

        // Valid demo credentials and a matching cached profile are both ignored
        let err = resolver
            .resolve(Credentials::new("aarav.demo", "demo123"), false)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials("Wrong password".into()));

        let stats = resolver.stats().await;
        assert_eq!(stats.rejections, 1);
        assert_eq!(stats.roster_lookups, 0);
        assert_eq!(stats.cache_lookups, 0);
    }

    #[tokio::test]
    async fn test_cached_profile_accepts_any_secret() {
        let (resolver, _, store) = resolver_with(ScriptedAuthService::unreachable());
        let original = cached(&store);

        let resolution = resolver
            .resolve(Credentials::new("rohan@example.in", "not-the-password"), false)
            .await
            .unwrap();

        assert_eq!(resolution.tier, AuthTier::CachedProfile);
        assert_eq!(resolution.profile.id(), original.id());
        assert!(resolution.profile.last_login_at >= original.last_login_at);
    }

    #[tokio::test]
    async fn test_all_tiers_exhausted_is_unavailable() {
        let (resolver, _, store) = resolver_with(ScriptedAuthService::unreachable());
        cached(&store);

        let err = resolver
            .resolve(Credentials::new("stranger", "pw"), true)
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::Unavailable);
        assert!(!store.remember_me().unwrap());
        assert_eq!(resolver.stats().await.exhausted, 1);
    }

    #[tokio::test]
    async fn test_malformed_remote_profile_falls_back() {
        let mut user = remote_user();
        user.grade = Some(3);
        let (resolver, _, _) =
            resolver_with(ScriptedAuthService::unreachable().with_login(RemoteOutcome::Accepted(user)));

        let resolution = resolver
            .resolve(Credentials::new("ms.sharma", "teach123"), false)
            .await
            .unwrap();
        assert_eq!(resolution.tier, AuthTier::DemoRoster);
    }

    #[tokio::test]
    async fn test_cached_profile_accepts_empty_secret() {
        let (resolver, service, store) = resolver_with(ScriptedAuthService::unreachable());
        cached(&store);

        let resolution = resolver
            .resolve(Credentials::new("rohan", ""), false)
            .await
            .unwrap();

        assert_eq!(resolution.tier, AuthTier::CachedProfile);
        assert_eq!(resolution.profile.id(), "local-7");
        assert_eq!(service.login_calls(), 1);
    }

    #[tokio::test]
    async fn test_same_inputs_same_tier_and_identity() {
        let (resolver, _, _) = resolver_with(ScriptedAuthService::unreachable());

        let first = resolver
            .resolve(Credentials::new("priya.demo", "demo123"), false)
            .await
            .unwrap();
        let second = resolver
            .resolve(Credentials::new("priya.demo", "demo123"), false)
            .await
            .unwrap();

        assert_eq!(first.tier, second.tier);
        assert_eq!(first.profile.id(), second.profile.id());
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_timeout_counts_as_unreachable() {
        let (resolver, _, _) = resolver_with(
            ScriptedAuthService::unreachable()
                .with_login(RemoteOutcome::Accepted(remote_user()))
                .with_delay(Duration::from_secs(60)),
        );

        let resolution = resolver
            .resolve(Credentials::new("aarav.demo", "demo123"), false)
            .await
            .unwrap();
        assert_eq!(resolution.tier, AuthTier::DemoRoster);
    }

    #[tokio::test]
    async fn test_concurrent_attempt_is_busy_and_cancel_has_no_side_effects() {
        let (resolver, _, store) = resolver_with(
            ScriptedAuthService::unreachable()
                .with_login(RemoteOutcome::Accepted(remote_user()))
                .with_delay(Duration::from_secs(30)),
        );

        let running = {
            let resolver = resolver.clone();
            tokio::spawn(async move {
                resolver
                    .resolve(Credentials::new("neha", "pw"), true)
                    .await
            })
        };

        while !resolver.is_busy() {
            tokio::task::yield_now().await;
        }

        let err = resolver
            .resolve(Credentials::new("aarav.demo", "demo123"), false)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::Busy);

        assert!(resolver.cancel());
        assert_eq!(running.await.unwrap().unwrap_err(), AuthError::Cancelled);

        assert!(!resolver.is_busy());
        assert!(store.cached_profile().unwrap().is_none());
        assert!(!store.remember_me().unwrap());
        assert_eq!(resolver.stats().await.cancelled, 1);
    }
}
