//! Session reducer.
//!
//! Every session change goes through [`reduce`]. It is synchronous and does
//! no I/O: durable side effects come back as [`SessionEffect`]s for the
//! controller to apply. A rejected event returns an error and leaves the
//! session untouched.

use super::state::{Phase, Session, MAX_HISTORY};
use crate::error::SessionError;
use crate::onboarding::{OnboardingEvent, Step};
use crate::types::{Credentials, Language, UserProfile};

#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Forwarded to the onboarding machine while signed out
    Onboarding(OnboardingEvent),
    /// Adopt a profile produced outside the onboarding machine
    CompleteOnboarding(UserProfile),
    /// Adopt a remembered profile at startup
    Resume(UserProfile),
    Logout,
    ChangeLanguage(Language),
    Navigate(String),
    GoToDashboard,
    Back,
    SelectDemo(Credentials),
}

/// Durable work requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    PersistLanguage(Language),
    ClearRememberMe,
    CacheProfile(UserProfile),
}

pub fn reduce(session: &mut Session, event: SessionEvent) -> Result<Vec<SessionEffect>, SessionError> {
    match event {
        SessionEvent::Onboarding(event) => {
            let Phase::SignedOut { onboarding, .. } = &mut session.phase else {
                return Err(SessionError::AlreadySignedIn);
            };

            let chosen = match &event {
                OnboardingEvent::ChooseLanguage(language) => Some(*language),
                _ => None,
            };

            let step = onboarding.apply(event)?;

            let mut effects = Vec::new();
            if let Some(language) = chosen {
                session.language = language;
                effects.push(SessionEffect::PersistLanguage(language));
            }
            if let Step::Complete(profile) = step {
                effects.push(SessionEffect::CacheProfile(profile.clone()));
                adopt(session, profile);
            }
            Ok(effects)
        }

        SessionEvent::CompleteOnboarding(profile) => {
            ensure_signed_out(session)?;
            let effects = vec![SessionEffect::CacheProfile(profile.clone())];
            adopt(session, profile);
            Ok(effects)
        }

        SessionEvent::Resume(profile) => {
            ensure_signed_out(session)?;
            adopt(session, profile);
            Ok(Vec::new())
        }

        SessionEvent::Logout => {
            session.phase = Phase::signed_out();
            Ok(vec![SessionEffect::ClearRememberMe])
        }

        SessionEvent::ChangeLanguage(language) => {
            session.language = language;
            Ok(vec![SessionEffect::PersistLanguage(language)])
        }

        SessionEvent::Navigate(reference) => {
            let Phase::SignedIn {
                activity, history, ..
            } = &mut session.phase
            else {
                return Err(SessionError::NotSignedIn);
            };
            if reference.is_empty() {
                return Err(SessionError::EmptyReference);
            }
            if activity.as_deref() != Some(reference.as_str()) {
                if let Some(previous) = activity.replace(reference) {
                    push_history(history, previous);
                }
            }
            Ok(Vec::new())
        }

        SessionEvent::GoToDashboard => {
            let Phase::SignedIn {
                activity, history, ..
            } = &mut session.phase
            else {
                return Err(SessionError::NotSignedIn);
            };
            if let Some(previous) = activity.take() {
                push_history(history, previous);
            }
            Ok(Vec::new())
        }

        SessionEvent::Back => {
            let Phase::SignedIn {
                activity, history, ..
            } = &mut session.phase
            else {
                return Err(SessionError::NotSignedIn);
            };
            *activity = history.pop();
            Ok(Vec::new())
        }

        SessionEvent::SelectDemo(credentials) => {
            let Phase::SignedOut { pending_demo, .. } = &mut session.phase else {
                return Err(SessionError::AlreadySignedIn);
            };
            *pending_demo = Some(credentials);
            Ok(Vec::new())
        }
    }
}

fn ensure_signed_out(session: &Session) -> Result<(), SessionError> {
    if session.is_signed_in() {
        Err(SessionError::AlreadySignedIn)
    } else {
        Ok(())
    }
}

/// Onboarding state and pending demo credentials go with the signed-out phase
fn adopt(session: &mut Session, profile: UserProfile) {
    session.phase = Phase::SignedIn {
        profile,
        activity: None,
        history: Vec::new(),
    };
}

fn push_history(history: &mut Vec<String>, reference: String) {
    if history.len() == MAX_HISTORY {
        history.remove(0);
    }
    history.push(reference);
}
