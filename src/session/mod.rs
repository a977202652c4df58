//! Who is logged in.
//!
//! `AuthSession` is the single source of truth for the current user and
//! applicant identity. It is restored from a [`SessionStorage`] at the start
//! of a request, mutated by the auth operations, and written back through the
//! same storage. Nothing about the session lives in global state.

mod memory;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::api::types::{ApplicantStatus, Role, SignupRequest, User};
use crate::api::{ApiError, AuthApi};
use crate::auth::validate;

pub use memory::MemoryStorage;

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "auth_token";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<User>,
    pub applicant: Option<ApplicantStatus>,
    /// Set once the token has been checked against the backend.
    #[serde(default)]
    pub verified: bool,
}

/// Persisted home of a [`SessionState`].
pub trait SessionStorage {
    fn load(&self) -> SessionState;
    fn store(&self, state: &SessionState);
    fn clear(&self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Rejected locally, before any backend call.
    Invalid(String),
    Api(ApiError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Invalid(msg) => write!(f, "{msg}"),
            SessionError::Api(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<ApiError> for SessionError {
    fn from(e: ApiError) -> Self {
        SessionError::Api(e)
    }
}

/// Signup input as typed by the applicant.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupDetails {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    pub phone_number: String,
}

pub struct AuthSession<S: SessionStorage> {
    storage: S,
    state: SessionState,
    error: Option<String>,
}

impl<S: SessionStorage> AuthSession<S> {
    /// Build the session from whatever the storage currently holds.
    pub fn restore(storage: S) -> Self {
        let state = storage.load();
        Self { storage, state, error: None }
    }

    /// Verify a restored token once, hydrating the applicant status.
    ///
    /// A rejected token tears the whole session down. A failed status fetch
    /// after a good verification keeps the session.
    pub async fn initialize<A: AuthApi + ?Sized>(&mut self, api: &A) {
        let Some(token) = self.state.token.clone() else {
            return;
        };
        if self.state.verified {
            return;
        }

        match api.verify_token(&token).await {
            Ok(info) => {
                self.state.verified = true;
                if info.role == Role::Applicant {
                    match api.applicant_status(&token).await {
                        Ok(status) => self.state.applicant = Some(status),
                        Err(e) => log::warn!("Could not load applicant status: {e}"),
                    }
                }
                self.persist();
            }
            Err(e) => {
                log::info!("Stored token rejected ({e}); clearing session");
                self.teardown();
            }
        }
    }

    pub async fn login<A: AuthApi + ?Sized>(
        &mut self,
        api: &A,
        email: &str,
        password: &str,
    ) -> Result<(), SessionError> {
        if let Some(msg) = validate::validate_login(email, password) {
            self.error = Some(msg.clone());
            return Err(SessionError::Invalid(msg));
        }
        self.error = None;

        match api.login(email.trim(), password).await {
            Ok(response) => {
                self.establish(response.token, response.user, response.applicant);
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    pub async fn signup<A: AuthApi + ?Sized>(
        &mut self,
        api: &A,
        details: &SignupDetails,
    ) -> Result<(), SessionError> {
        if let Some(msg) = validate::validate_signup(details) {
            self.error = Some(msg.clone());
            return Err(SessionError::Invalid(msg));
        }
        self.error = None;

        let request = SignupRequest {
            name: details.name.trim().to_string(),
            email: details.email.trim().to_string(),
            password: details.password.clone(),
            phone_number: details.phone_number.trim().to_string(),
        };
        match api.signup(&request).await {
            Ok(response) => {
                self.establish(response.token, response.user, response.applicant);
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Always ends with an empty session, even when the backend call fails.
    pub async fn logout<A: AuthApi + ?Sized>(&mut self, api: &A) {
        if let Some(token) = self.state.token.as_deref() {
            if let Err(e) = api.logout(token).await {
                log::warn!("Logout error: {e}");
            }
        }
        self.teardown();
    }

    /// Re-fetch the applicant status. Failures leave the previous status in
    /// place.
    pub async fn refresh_status<A: AuthApi + ?Sized>(&mut self, api: &A) {
        let Some(token) = self.state.token.as_deref() else {
            return;
        };
        match api.applicant_status(token).await {
            Ok(status) => {
                self.state.applicant = Some(status);
                self.persist();
            }
            Err(e) => log::error!("Error refreshing status: {e}"),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.token.is_some() && self.state.user.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.state.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.state.user.as_ref().map(|u| u.role)
    }

    pub fn applicant(&self) -> Option<&ApplicantStatus> {
        self.state.applicant.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Where an authenticated user lands after login.
    pub fn home_path(&self) -> &'static str {
        match self.role() {
            Some(Role::Admin) => "/admin/dashboard",
            Some(Role::Applicant) => {
                if self.applicant().is_some_and(|a| a.has_program()) {
                    "/applicant/dashboard"
                } else {
                    "/applicant/select-program"
                }
            }
            None => "/auth/login",
        }
    }

    fn establish(&mut self, token: String, user: User, applicant: Option<ApplicantStatus>) {
        self.state = SessionState {
            token: Some(token),
            user: Some(user),
            applicant,
            verified: true,
        };
        self.persist();
    }

    fn persist(&self) {
        self.storage.store(&self.state);
    }

    fn teardown(&mut self) {
        self.state = SessionState::default();
        self.error = None;
        self.storage.clear();
    }
}
