//! Session Controller - owner of the session record
//!
//! Wires the reducer to the outside world: runs sign-in through the
//! [`CredentialResolver`], registration through the [`AuthService`], applies
//! durable effects through the [`ProfileStore`], and answers "what is on
//! screen" through the [`ActivityRouter`].

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::reducer::{reduce, SessionEffect, SessionEvent};
use super::state::{Phase, Session};
use crate::auth::{CredentialResolver, Resolution};
use crate::error::{AuthError, OnboardingError, RegistrationError, Result, SessionError};
use crate::onboarding::{OnboardingEvent, OnboardingStep, SignUpForm};
use crate::remote::{AuthService, RemoteOutcome};
use crate::router::{ActivityRouter, DashboardView, ViewSelector};
use crate::store::ProfileStore;
use crate::types::{Credentials, Language, UserProfile};

/// What the renderer should show for a signed-in user
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ActiveView {
    Dashboard { dashboard: DashboardView },
    Activity { selector: ViewSelector },
}

pub struct SessionController {
    session: Session,
    store: ProfileStore,
    resolver: Arc<CredentialResolver>,
    registrar: Arc<dyn AuthService>,
    router: ActivityRouter,
}

fn invalid_transition(step: &OnboardingStep, event: &'static str) -> SessionError {
    OnboardingError::InvalidTransition {
        step: step.name(),
        event,
    }
    .into()
}

impl SessionController {
    pub fn new(
        store: ProfileStore,
        resolver: CredentialResolver,
        registrar: Arc<dyn AuthService>,
        router: ActivityRouter,
    ) -> Self {
        Self {
            session: Session::default(),
            store,
            resolver: Arc::new(resolver),
            registrar,
            router,
        }
    }

    // =========================================================================
    // Startup
    // =========================================================================

    /// Load persisted state: the saved language, and the cached profile when
    /// the remember-me marker is set.
    pub fn restore(&mut self) -> Result<()> {
        if self.session.is_signed_in() {
            return Err(SessionError::AlreadySignedIn.into());
        }

        let language = self.store.language()?.unwrap_or_default();
        self.session = Session::new(language);

        if !self.store.remember_me()? {
            debug!(language = %language, "Session restored signed out");
            return Ok(());
        }

        match self.store.cached_profile()? {
            Some(profile) => {
                info!(user_id = %profile.id(), language = %self.session.language(), "Resuming remembered profile");
                self.dispatch(SessionEvent::Resume(profile))
            }
            None => {
                warn!("Remember-me set without a cached profile, clearing it");
                self.store.set_remember_me(false)?;
                Ok(())
            }
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Run one event through the reducer and apply its effects.
    ///
    /// A rejected event changes nothing. If applying an effect fails the
    /// in-memory transition stands and the storage error is returned.
    pub fn dispatch(&mut self, event: SessionEvent) -> Result<()> {
        let effects = reduce(&mut self.session, event)?;
        for effect in effects {
            self.apply(effect)?;
        }
        Ok(())
    }

    fn apply(&self, effect: SessionEffect) -> Result<()> {
        match effect {
            SessionEffect::PersistLanguage(language) => self.store.set_language(language)?,
            SessionEffect::ClearRememberMe => self.store.set_remember_me(false)?,
            SessionEffect::CacheProfile(profile) => self.store.save_profile(&profile)?,
        }
        Ok(())
    }

    pub fn onboarding(&mut self, event: OnboardingEvent) -> Result<()> {
        self.dispatch(SessionEvent::Onboarding(event))
    }

    pub fn complete_onboarding(&mut self, profile: UserProfile) -> Result<()> {
        info!(user_id = %profile.id(), "Onboarding completed");
        self.dispatch(SessionEvent::CompleteOnboarding(profile))
    }

    /// Sign out. The cached profile stays for offline sign-in; the language
    /// setting stays too.
    pub fn logout(&mut self) -> Result<()> {
        if let Some(profile) = self.session.profile() {
            info!(user_id = %profile.id(), "Logging out");
        }
        self.dispatch(SessionEvent::Logout)
    }

    pub fn change_language(&mut self, language: Language) -> Result<()> {
        self.dispatch(SessionEvent::ChangeLanguage(language))
    }

    pub fn navigate(&mut self, reference: &str) -> Result<()> {
        self.dispatch(SessionEvent::Navigate(reference.to_string()))
    }

    pub fn go_to_dashboard(&mut self) -> Result<()> {
        self.dispatch(SessionEvent::GoToDashboard)
    }

    pub fn back(&mut self) -> Result<()> {
        self.dispatch(SessionEvent::Back)
    }

    /// Prefill the login form with a demo account
    pub fn select_demo_account(&mut self, username: &str) -> Result<()> {
        let account = self
            .resolver
            .roster()
            .by_username(username)
            .ok_or_else(|| SessionError::UnknownDemoAccount(username.to_string()))?;
        let credentials = Credentials::new(&account.username, &account.password);
        self.dispatch(SessionEvent::SelectDemo(credentials))
    }

    // =========================================================================
    // Sign-in and registration
    // =========================================================================

    /// Sign in from the onboarding login step
    pub async fn login(
        &mut self,
        identifier: &str,
        secret: &str,
        remember: bool,
    ) -> Result<Resolution> {
        self.login_with(Credentials::new(identifier, secret), remember)
            .await
    }

    /// Sign in with the demo account picked by [`Self::select_demo_account`]
    pub async fn login_demo(&mut self, remember: bool) -> Result<Resolution> {
        let credentials = self
            .session
            .pending_demo()
            .cloned()
            .ok_or(SessionError::NoDemoSelected)?;
        self.login_with(credentials, remember).await
    }

    async fn login_with(&mut self, credentials: Credentials, remember: bool) -> Result<Resolution> {
        let step = self.current_step()?;
        if !step.is_login() {
            return Err(invalid_transition(step, "complete login").into());
        }
        credentials.validate()?;

        let resolver = Arc::clone(&self.resolver);
        match resolver.resolve(credentials, remember).await {
            Ok(resolution) => {
                self.onboarding(OnboardingEvent::LoginSucceeded(
                    resolution.profile.clone(),
                ))?;
                Ok(resolution)
            }
            Err(e) => {
                // Another attempt owns the login step
                if e != AuthError::Busy {
                    self.onboarding(OnboardingEvent::LoginFailed(e.clone()))?;
                }
                Err(e.into())
            }
        }
    }

    /// Register from a sign-up step. On success the flow moves to the welcome
    /// bonus; claiming it completes onboarding.
    ///
    /// Invalid input is reported without contacting the service and without
    /// changing the step.
    pub async fn sign_up(&mut self, form: SignUpForm) -> Result<()> {
        let step = self.current_step()?;
        let Some(role) = step.sign_up_role() else {
            return Err(invalid_transition(step, "complete registration").into());
        };

        let request = form.to_request(role, self.session.language())?;

        let registrar = Arc::clone(&self.registrar);
        let outcome = registrar.register(&request).await;

        let result = match outcome {
            RemoteOutcome::Accepted(registration) => {
                let now = Utc::now();
                let profile = match registration.user {
                    Some(fields) => fields
                        .into_profile(now)
                        .map_err(|e| RegistrationError::Malformed(e.to_string()))
                        .and_then(|profile| {
                            if profile.role() == role {
                                Ok(profile)
                            } else {
                                Err(RegistrationError::Malformed(format!(
                                    "expected a {} account, got {}",
                                    role,
                                    profile.role()
                                )))
                            }
                        }),
                    None => form
                        .mint_profile(role, now)
                        .map_err(|e| RegistrationError::Malformed(e.to_string())),
                };
                profile.map(|p| (p, registration.requires_verification))
            }
            RemoteOutcome::Rejected(reason) => Err(RegistrationError::Rejected(reason)),
            RemoteOutcome::Unreachable(reason) => Err(RegistrationError::Unreachable(reason)),
        };

        match result {
            Ok((profile, verification_pending)) => {
                info!(
                    user_id = %profile.id(),
                    role = %role,
                    verification_pending,
                    "Registration accepted"
                );
                self.onboarding(OnboardingEvent::RegistrationSucceeded {
                    profile,
                    verification_pending,
                })
            }
            Err(e) => {
                warn!(username = %request.username, error = %e, "Registration failed");
                self.onboarding(OnboardingEvent::RegistrationFailed(e.clone()))?;
                Err(e.into())
            }
        }
    }

    fn current_step(&self) -> std::result::Result<&OnboardingStep, SessionError> {
        self.session
            .onboarding()
            .map(|machine| machine.step())
            .ok_or(SessionError::AlreadySignedIn)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn language(&self) -> Language {
        self.session.language()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.session.profile()
    }

    /// Current screen for a signed-in user; `None` while signed out
    pub fn current_view(&self) -> Option<ActiveView> {
        let Phase::SignedIn {
            profile, activity, ..
        } = self.session.phase()
        else {
            return None;
        };

        let selector = match activity {
            Some(reference) => self.router.route(reference, self.session.language()),
            None => ViewSelector::Dashboard,
        };

        Some(match selector {
            ViewSelector::Dashboard => ActiveView::Dashboard {
                dashboard: DashboardView::for_profile(profile),
            },
            selector => ActiveView::Activity { selector },
        })
    }

    /// Shared resolver. A pending [`Self::login`] holds the controller
    /// mutably, so hosts clone this handle beforehand and cancel through it.
    pub fn resolver(&self) -> &Arc<CredentialResolver> {
        &self.resolver
    }

    pub fn router(&self) -> &ActivityRouter {
        &self.router
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }
}
