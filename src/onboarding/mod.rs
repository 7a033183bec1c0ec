//! Onboarding State Machine
//!
//! ```text
//! Welcome → LanguageSelect → UserTypeSelect ─┬─ sign up, student → SignUp        ─┐
//!                                            ├─ sign up, teacher → TeacherSignUp ─┴→ WelcomeBonus → Complete
//!                                            └─ log in           → Login ──────────────────────→ Complete
//! ```
//!
//! `Back` returns to the immediately preceding step; `Welcome` and
//! `WelcomeBonus` have no back. An event the current step does not accept is
//! an [`OnboardingError::InvalidTransition`] and leaves the step as it was.
//!
//! The machine never talks to the network or the store. The session
//! controller performs the sign-in or registration and feeds the outcome back
//! in as an event; the flow ends when [`OnboardingMachine::apply`] returns
//! [`Step::Complete`].

mod form;

pub use form::{SignUpForm, MIN_PASSWORD_LEN};

use tracing::debug;

use crate::error::{AuthError, OnboardingError, RegistrationError};
use crate::types::{Language, Role, UserProfile};

/// Whether the user is creating an account or signing into one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    SignUp,
    Login,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OnboardingStep {
    Welcome,
    LanguageSelect,
    UserTypeSelect,
    /// Student registration; `error` holds the last server rejection
    SignUp { error: Option<RegistrationError> },
    /// Teacher registration (requires an enrollment code)
    TeacherSignUp { error: Option<RegistrationError> },
    Login { error: Option<AuthError> },
    WelcomeBonus {
        profile: UserProfile,
        verification_pending: bool,
    },
}

impl OnboardingStep {
    pub fn name(&self) -> &'static str {
        match self {
            OnboardingStep::Welcome => "welcome",
            OnboardingStep::LanguageSelect => "language-select",
            OnboardingStep::UserTypeSelect => "user-type-select",
            OnboardingStep::SignUp { .. } => "sign-up",
            OnboardingStep::TeacherSignUp { .. } => "teacher-sign-up",
            OnboardingStep::Login { .. } => "login",
            OnboardingStep::WelcomeBonus { .. } => "welcome-bonus",
        }
    }

    /// Role being registered, on the two sign-up steps
    pub fn sign_up_role(&self) -> Option<Role> {
        match self {
            OnboardingStep::SignUp { .. } => Some(Role::Student),
            OnboardingStep::TeacherSignUp { .. } => Some(Role::Teacher),
            _ => None,
        }
    }

    pub fn is_login(&self) -> bool {
        matches!(self, OnboardingStep::Login { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OnboardingEvent {
    Start,
    ChooseLanguage(Language),
    ChooseUserType { role: Role, intent: Intent },
    Back,
    RegistrationSucceeded {
        profile: UserProfile,
        verification_pending: bool,
    },
    RegistrationFailed(RegistrationError),
    LoginSucceeded(UserProfile),
    LoginFailed(AuthError),
    ClaimBonus,
}

impl OnboardingEvent {
    pub fn name(&self) -> &'static str {
        match self {
            OnboardingEvent::Start => "start",
            OnboardingEvent::ChooseLanguage(_) => "choose a language",
            OnboardingEvent::ChooseUserType { .. } => "choose a user type",
            OnboardingEvent::Back => "go back",
            OnboardingEvent::RegistrationSucceeded { .. } => "complete registration",
            OnboardingEvent::RegistrationFailed(_) => "fail registration",
            OnboardingEvent::LoginSucceeded(_) => "complete login",
            OnboardingEvent::LoginFailed(_) => "fail login",
            OnboardingEvent::ClaimBonus => "claim the welcome bonus",
        }
    }
}

/// Result of a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Continue,
    /// Onboarding finished with this profile
    Complete(UserProfile),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingMachine {
    step: OnboardingStep,
}

impl Default for OnboardingMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl OnboardingMachine {
    pub fn new() -> Self {
        Self {
            step: OnboardingStep::Welcome,
        }
    }

    pub fn step(&self) -> &OnboardingStep {
        &self.step
    }

    /// Apply one event. The whole transition table lives in this match.
    pub fn apply(&mut self, event: OnboardingEvent) -> Result<Step, OnboardingError> {
        use OnboardingEvent as E;
        use OnboardingStep as S;

        let next = match (&self.step, event) {
            (S::Welcome, E::Start) => S::LanguageSelect,
            (S::LanguageSelect, E::ChooseLanguage(_)) => S::UserTypeSelect,
            (S::UserTypeSelect, E::ChooseUserType { role, intent }) => match (intent, role) {
                (Intent::Login, _) => S::Login { error: None },
                (Intent::SignUp, Role::Student) => S::SignUp { error: None },
                (Intent::SignUp, Role::Teacher) => S::TeacherSignUp { error: None },
            },

            (S::LanguageSelect, E::Back) => S::Welcome,
            (S::UserTypeSelect, E::Back) => S::LanguageSelect,
            (S::SignUp { .. } | S::TeacherSignUp { .. } | S::Login { .. }, E::Back) => {
                S::UserTypeSelect
            }

            (
                S::SignUp { .. } | S::TeacherSignUp { .. },
                E::RegistrationSucceeded {
                    profile,
                    verification_pending,
                },
            ) => S::WelcomeBonus {
                profile,
                verification_pending,
            },
            (S::SignUp { .. }, E::RegistrationFailed(e)) => S::SignUp { error: Some(e) },
            (S::TeacherSignUp { .. }, E::RegistrationFailed(e)) => {
                S::TeacherSignUp { error: Some(e) }
            }

            (S::Login { .. }, E::LoginSucceeded(profile)) => {
                debug!(user_id = %profile.id(), "Onboarding complete via login");
                return Ok(Step::Complete(profile));
            }
            (S::Login { .. }, E::LoginFailed(e)) => S::Login { error: Some(e) },

            (S::WelcomeBonus { profile, .. }, E::ClaimBonus) => {
                debug!(user_id = %profile.id(), "Onboarding complete via sign-up");
                return Ok(Step::Complete(profile.clone()));
            }

            (step, event) => {
                return Err(OnboardingError::InvalidTransition {
                    step: step.name(),
                    event: event.name(),
                })
            }
        };

        debug!(from = self.step.name(), to = next.name(), "Onboarding step");
        self.step = next;
        Ok(Step::Continue)
    }
}
