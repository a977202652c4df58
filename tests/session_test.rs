//! Session lifecycle tests: login, signup, logout, restore and status refresh.

mod common;

use admissions_portal::api::types::Role;
use admissions_portal::session::{
    AuthSession, MemoryStorage, SessionError, SessionState, SessionStorage, SignupDetails,
};
use common::*;

fn logged_in_storage() -> MemoryStorage {
    MemoryStorage::with_state(SessionState {
        token: Some(TOKEN.to_string()),
        user: Some(applicant_user()),
        applicant: Some(applicant_status(Some(1))),
        verified: false,
    })
}

fn signup_details() -> SignupDetails {
    SignupDetails {
        name: "Ada Obi".to_string(),
        email: APPLICANT_EMAIL.to_string(),
        password: PASSWORD.to_string(),
        confirm_password: PASSWORD.to_string(),
        phone_number: "08012345678".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_login_establishes_session() {
    let api = FakeBackend::with(|s| {
        s.login = Some(auth_response(applicant_user(), Some(applicant_status(None))));
    });
    let storage = MemoryStorage::new();
    let mut session = AuthSession::restore(storage.clone());

    session.login(&api, APPLICANT_EMAIL, PASSWORD).await.expect("login");

    assert!(session.is_authenticated());
    assert_eq!(session.role(), Some(Role::Applicant));
    assert_eq!(session.home_path(), "/applicant/select-program");
    let stored = storage.snapshot();
    assert_eq!(stored.token.as_deref(), Some(TOKEN));
    assert!(stored.verified);
}

#[tokio::test]
async fn test_admin_login_lands_on_admin_dashboard() {
    let api = FakeBackend::with(|s| s.login = Some(auth_response(admin_user(), None)));
    let mut session = AuthSession::restore(MemoryStorage::new());

    session.login(&api, ADMIN_EMAIL, PASSWORD).await.expect("login");
    assert_eq!(session.home_path(), "/admin/dashboard");
    assert!(session.applicant().is_none());
}

#[tokio::test]
async fn test_malformed_email_makes_no_call() {
    let api = FakeBackend::new();
    let mut session = AuthSession::restore(MemoryStorage::new());

    let err = session.login(&api, "not-an-email", PASSWORD).await.unwrap_err();
    assert_eq!(err, SessionError::Invalid("Valid email is required".to_string()));
    assert_eq!(session.error(), Some("Valid email is required"));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_failed_login_keeps_prior_session() {
    let api = FakeBackend::new();
    let storage = logged_in_storage();
    let mut session = AuthSession::restore(storage.clone());

    let err = session.login(&api, "other@gmail.com", "wrong").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(session.error(), Some("Invalid credentials"));
    assert_eq!(session.user().map(|u| u.id), Some(1));
    assert_eq!(storage.snapshot().token.as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn test_login_replaces_previous_identity() {
    let api = FakeBackend::with(|s| s.login = Some(auth_response(admin_user(), None)));
    let storage = logged_in_storage();
    let mut session = AuthSession::restore(storage.clone());

    session.login(&api, ADMIN_EMAIL, PASSWORD).await.expect("login");
    assert_eq!(session.role(), Some(Role::Admin));
    assert!(storage.snapshot().applicant.is_none());
}

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_signup_establishes_session() {
    let api = FakeBackend::new();
    let mut session = AuthSession::restore(MemoryStorage::new());

    session.signup(&api, &signup_details()).await.expect("signup");
    assert!(session.is_authenticated());
    assert_eq!(session.user().map(|u| u.name.as_str()), Some("Ada Obi"));
}

#[tokio::test]
async fn test_signup_password_mismatch_makes_no_call() {
    let api = FakeBackend::new();
    let mut session = AuthSession::restore(MemoryStorage::new());
    let details = SignupDetails {
        confirm_password: "different".to_string(),
        ..signup_details()
    };

    let err = session.signup(&api, &details).await.unwrap_err();
    assert_eq!(err.to_string(), "Passwords do not match");
    assert_eq!(session.error(), Some("Passwords do not match"));
    assert!(!api.called("signup"));
}

#[tokio::test]
async fn test_signup_backend_error_is_kept() {
    let api = FakeBackend::new();
    api.fail("signup", 409, "Email already registered");
    let mut session = AuthSession::restore(MemoryStorage::new());

    let err = session.signup(&api, &signup_details()).await.unwrap_err();
    assert_eq!(err.to_string(), "Email already registered");
    assert_eq!(session.error(), Some("Email already registered"));
    assert!(!session.is_authenticated());
}

// ---------------------------------------------------------------------------
// Logout and restore
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_logout_clears_even_when_backend_fails() {
    let api = FakeBackend::new();
    api.fail("logout", 500, "Server error");
    let storage = logged_in_storage();
    let mut session = AuthSession::restore(storage.clone());

    session.logout(&api).await;

    assert!(api.called("logout"));
    assert!(!session.is_authenticated());
    assert_eq!(storage.snapshot(), SessionState::default());
}

#[tokio::test]
async fn test_initialize_hydrates_applicant_status() {
    let api = FakeBackend::with(|s| s.status = admitted_status());
    let storage = logged_in_storage();
    let mut session = AuthSession::restore(storage.clone());

    session.initialize(&api).await;

    assert!(session.applicant().is_some_and(|a| a.is_admitted()));
    assert!(storage.snapshot().verified);

    // Verification happens once per session.
    session.initialize(&api).await;
    let verifications = api.calls().iter().filter(|c| *c == "verify_token").count();
    assert_eq!(verifications, 1);
}

#[tokio::test]
async fn test_initialize_clears_rejected_token() {
    let api = FakeBackend::new();
    api.fail("verify_token", 401, "Invalid token");
    let storage = logged_in_storage();
    let mut session = AuthSession::restore(storage.clone());

    session.initialize(&api).await;

    assert!(!session.is_authenticated());
    assert_eq!(storage.snapshot(), SessionState::default());
}

#[tokio::test]
async fn test_initialize_keeps_session_when_status_fails() {
    let api = FakeBackend::new();
    api.fail("applicant_status", 500, "Server error");
    let mut session = AuthSession::restore(logged_in_storage());

    session.initialize(&api).await;

    assert!(session.is_authenticated());
    assert!(session.state().verified);
    assert_eq!(session.applicant().and_then(|a| a.program_id), Some(1));
}

#[tokio::test]
async fn test_initialize_without_token_is_a_no_op() {
    let api = FakeBackend::new();
    let mut session = AuthSession::restore(MemoryStorage::new());
    session.initialize(&api).await;
    assert!(api.calls().is_empty());
}

// ---------------------------------------------------------------------------
// Status refresh
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_refresh_replaces_status() {
    let api = FakeBackend::with(|s| s.status = admitted_status());
    let storage = logged_in_storage();
    let mut session = AuthSession::restore(storage.clone());

    session.refresh_status(&api).await;
    assert_eq!(
        storage.snapshot().applicant.map(|a| a.admission_status),
        Some("admitted".to_string())
    );
}

#[tokio::test]
async fn test_refresh_failure_keeps_previous_status() {
    let api = FakeBackend::new();
    api.fail("applicant_status", 500, "Server error");
    let mut session = AuthSession::restore(logged_in_storage());

    session.refresh_status(&api).await;
    assert_eq!(session.applicant(), Some(&applicant_status(Some(1))));
}

#[test]
fn test_memory_storage_clear_resets_state() {
    let storage = logged_in_storage();
    storage.clear();
    assert_eq!(storage.load(), SessionState::default());
}
