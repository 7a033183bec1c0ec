//! The process-wide session record

use crate::onboarding::OnboardingMachine;
use crate::types::{Credentials, Language, UserProfile};

/// Navigation history kept for `back`
pub const MAX_HISTORY: usize = 32;

/// Signed-out and signed-in data never coexist: a session either has an
/// onboarding flow in progress or a profile, not both.
#[derive(Debug, Clone)]
pub enum Phase {
    SignedOut {
        onboarding: OnboardingMachine,
        /// Demo account picked on the login screen, awaiting sign-in
        pending_demo: Option<Credentials>,
    },
    SignedIn {
        profile: UserProfile,
        /// Current activity reference; `None` is the dashboard
        activity: Option<String>,
        /// Previous activity references, oldest first
        history: Vec<String>,
    },
}

impl Phase {
    pub(super) fn signed_out() -> Self {
        Phase::SignedOut {
            onboarding: OnboardingMachine::new(),
            pending_demo: None,
        }
    }
}

/// Session state. Mutated only by [`reduce`](super::reduce).
#[derive(Debug, Clone)]
pub struct Session {
    pub(super) language: Language,
    pub(super) phase: Phase,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl Session {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            phase: Phase::signed_out(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self.phase, Phase::SignedIn { .. })
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        match &self.phase {
            Phase::SignedIn { profile, .. } => Some(profile),
            Phase::SignedOut { .. } => None,
        }
    }

    pub fn activity(&self) -> Option<&str> {
        match &self.phase {
            Phase::SignedIn { activity, .. } => activity.as_deref(),
            Phase::SignedOut { .. } => None,
        }
    }

    pub fn history(&self) -> &[String] {
        match &self.phase {
            Phase::SignedIn { history, .. } => history,
            Phase::SignedOut { .. } => &[],
        }
    }

    pub fn onboarding(&self) -> Option<&OnboardingMachine> {
        match &self.phase {
            Phase::SignedOut { onboarding, .. } => Some(onboarding),
            Phase::SignedIn { .. } => None,
        }
    }

    pub fn pending_demo(&self) -> Option<&Credentials> {
        match &self.phase {
            Phase::SignedOut { pending_demo, .. } => pending_demo.as_ref(),
            Phase::SignedIn { .. } => None,
        }
    }
}
