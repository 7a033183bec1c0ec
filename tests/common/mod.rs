//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use lamad_client::{
    ActivityRouter, AuthService, CredentialResolver, DemoRoster, ProfileFields, ProfileStore,
    Registration, RegistrationRequest, RemoteOutcome, ResolverConfig, SessionController,
};

/// Auth service whose answers are set by the test
pub struct FakeAuthService {
    pub login: Mutex<RemoteOutcome<ProfileFields>>,
    pub register: Mutex<RemoteOutcome<Registration>>,
    pub login_calls: AtomicUsize,
    pub last_registration: Mutex<Option<RegistrationRequest>>,
}

impl FakeAuthService {
    pub fn offline() -> Arc<Self> {
        Arc::new(Self {
            login: Mutex::new(RemoteOutcome::Unreachable("offline".into())),
            register: Mutex::new(RemoteOutcome::Unreachable("offline".into())),
            login_calls: AtomicUsize::new(0),
            last_registration: Mutex::new(None),
        })
    }

    pub fn set_login(&self, outcome: RemoteOutcome<ProfileFields>) {
        *self.login.lock().unwrap() = outcome;
    }

    pub fn set_register(&self, outcome: RemoteOutcome<Registration>) {
        *self.register.lock().unwrap() = outcome;
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthService for FakeAuthService {
    async fn login(&self, _identifier: &str, _secret: &str) -> RemoteOutcome<ProfileFields> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.login.lock().unwrap().clone()
    }

    async fn register(&self, request: &RegistrationRequest) -> RemoteOutcome<Registration> {
        *self.last_registration.lock().unwrap() = Some(request.clone());
        self.register.lock().unwrap().clone()
    }
}

/// Controller over a file-backed store at `dir/profile.json`
pub fn controller(dir: &Path, service: Arc<FakeAuthService>) -> SessionController {
    let store = ProfileStore::open(dir.join("profile.json")).unwrap();
    let resolver = CredentialResolver::new(
        service.clone(),
        DemoRoster::builtin(),
        store.clone(),
        ResolverConfig::default(),
    );
    SessionController::new(store, resolver, service, ActivityRouter::builtin())
}

pub fn remote_user(id: &str, username: &str) -> ProfileFields {
    ProfileFields {
        id: id.into(),
        name: username.into(),
        username: username.into(),
        email: format!("{}@example.in", username),
        role: Some("student".into()),
        grade: Some(9),
        ..Default::default()
    }
}
