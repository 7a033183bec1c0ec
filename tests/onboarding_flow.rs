//! Onboarding through to a signed-in session

mod common;

use lamad_client::onboarding::OnboardingStep;
use lamad_client::{
    ActiveView, ClientError, DashboardView, Intent, Language, OnboardingEvent, Registration,
    RemoteOutcome, Role, SessionError, SignUpForm, ViewSelector,
};
use zeroize::Zeroizing;

use common::{controller, remote_user, FakeAuthService};

fn student_form() -> SignUpForm {
    SignUpForm {
        name: "Ananya Rao".into(),
        username: "ananya".into(),
        email: "ananya@example.in".into(),
        password: Zeroizing::new("river-song".into()),
        grade: Some(9),
        school: "Government Girls School".into(),
        teacher_code: None,
    }
}

#[tokio::test]
async fn test_sign_up_in_hindi_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let service = FakeAuthService::offline();
    service.set_register(RemoteOutcome::Accepted(Registration {
        user: Some(remote_user("srv-ananya", "ananya")),
        requires_verification: false,
    }));
    let mut controller = controller(dir.path(), service.clone());
    controller.restore().unwrap();

    controller.onboarding(OnboardingEvent::Start).unwrap();
    controller
        .onboarding(OnboardingEvent::ChooseLanguage(Language::Hi))
        .unwrap();
    controller
        .onboarding(OnboardingEvent::ChooseUserType {
            role: Role::Student,
            intent: Intent::SignUp,
        })
        .unwrap();
    controller.sign_up(student_form()).await.unwrap();

    assert!(matches!(
        controller.session().onboarding().map(|m| m.step()),
        Some(OnboardingStep::WelcomeBonus { .. })
    ));

    controller.onboarding(OnboardingEvent::ClaimBonus).unwrap();

    let profile = controller.profile().unwrap();
    assert!(!profile.id().is_empty());
    assert!(!profile.name.is_empty());
    assert_eq!(profile.role(), Role::Student);
    assert_eq!(controller.language(), Language::Hi);

    let sent = service.last_registration.lock().unwrap().clone().unwrap();
    assert_eq!(sent.language, Language::Hi);
    assert_eq!(sent.grade, Some(9));
}

#[tokio::test]
async fn test_registration_rejection_is_surfaced_and_not_retried() {
    let dir = tempfile::tempdir().unwrap();
    let service = FakeAuthService::offline();
    service.set_register(RemoteOutcome::Rejected("Username already taken".into()));
    let mut controller = controller(dir.path(), service);

    controller.onboarding(OnboardingEvent::Start).unwrap();
    controller
        .onboarding(OnboardingEvent::ChooseLanguage(Language::En))
        .unwrap();
    controller
        .onboarding(OnboardingEvent::ChooseUserType {
            role: Role::Student,
            intent: Intent::SignUp,
        })
        .unwrap();

    let err = controller.sign_up(student_form()).await.unwrap_err();
    assert!(matches!(err, ClientError::Registration(_)));
    assert!(controller.profile().is_none());
    assert!(matches!(
        controller.session().onboarding().map(|m| m.step()),
        Some(OnboardingStep::SignUp { error: Some(_) })
    ));
}

#[tokio::test]
async fn test_logout_then_navigate_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut controller = controller(dir.path(), FakeAuthService::offline());

    controller.onboarding(OnboardingEvent::Start).unwrap();
    controller
        .onboarding(OnboardingEvent::ChooseLanguage(Language::Ta))
        .unwrap();
    controller
        .onboarding(OnboardingEvent::ChooseUserType {
            role: Role::Teacher,
            intent: Intent::Login,
        })
        .unwrap();
    controller.login("ms.sharma", "teach123", true).await.unwrap();

    assert_eq!(
        controller.current_view(),
        Some(ActiveView::Dashboard {
            dashboard: DashboardView::Teacher
        })
    );
    controller.navigate("leaderboard").unwrap();

    controller.logout().unwrap();
    let err = controller.navigate("subjects").unwrap_err();
    assert!(matches!(err, ClientError::Session(SessionError::NotSignedIn)));
    assert_eq!(controller.session().activity(), None);
    assert_eq!(controller.current_view(), None);

    // Language is a device preference and survives logout
    assert_eq!(controller.language(), Language::Ta);
    assert!(!controller.store().remember_me().unwrap());
    assert!(controller.store().cached_profile().unwrap().is_some());
}

#[tokio::test]
async fn test_navigation_uses_session_language() {
    let dir = tempfile::tempdir().unwrap();
    let mut controller = controller(dir.path(), FakeAuthService::offline());

    controller.onboarding(OnboardingEvent::Start).unwrap();
    controller
        .onboarding(OnboardingEvent::ChooseLanguage(Language::En))
        .unwrap();
    controller
        .onboarding(OnboardingEvent::ChooseUserType {
            role: Role::Student,
            intent: Intent::Login,
        })
        .unwrap();
    controller.select_demo_account("priya.demo").unwrap();
    controller.login_demo(false).await.unwrap();

    controller.navigate("varnamala").unwrap();
    assert!(matches!(
        controller.current_view(),
        Some(ActiveView::Dashboard { .. })
    ));

    controller.change_language(Language::Hi).unwrap();
    assert!(matches!(
        controller.current_view(),
        Some(ActiveView::Activity {
            selector: ViewSelector::Game { .. }
        })
    ));

    controller.go_to_dashboard().unwrap();
    controller.back().unwrap();
    assert_eq!(controller.session().activity(), Some("varnamala"));
}
