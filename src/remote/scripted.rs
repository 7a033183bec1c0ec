//! In-process [`AuthService`] double for unit tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::{AuthService, Registration, RegistrationRequest, RemoteOutcome};
use crate::types::ProfileFields;

pub(crate) struct ScriptedAuthService {
    login: Mutex<RemoteOutcome<ProfileFields>>,
    register: Mutex<RemoteOutcome<Registration>>,
    delay: Option<Duration>,
    pub(crate) login_calls: AtomicUsize,
    pub(crate) register_calls: AtomicUsize,
}

impl ScriptedAuthService {
    pub(crate) fn unreachable() -> Self {
        Self {
            login: Mutex::new(RemoteOutcome::Unreachable("scripted".into())),
            register: Mutex::new(RemoteOutcome::Unreachable("scripted".into())),
            delay: None,
            login_calls: AtomicUsize::new(0),
            register_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_login(self, outcome: RemoteOutcome<ProfileFields>) -> Self {
        *self.login.lock().unwrap() = outcome;
        self
    }

    pub(crate) fn with_register(self, outcome: RemoteOutcome<Registration>) -> Self {
        *self.register.lock().unwrap() = outcome;
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthService for ScriptedAuthService {
    async fn login(&self, _identifier: &str, _secret: &str) -> RemoteOutcome<ProfileFields> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.login.lock().unwrap().clone()
    }

    async fn register(&self, _request: &RegistrationRequest) -> RemoteOutcome<Registration> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        self.register.lock().unwrap().clone()
    }
}
