use actix_session::Session;

use crate::api::types::{ApplicantStatus, User};
use crate::session::{AuthSession, SessionState, SessionStorage, TOKEN_KEY};

const USER_KEY: &str = "user";
const APPLICANT_KEY: &str = "applicant";
const VERIFIED_KEY: &str = "verified";
const FLASH_KEY: &str = "flash";

/// [`SessionStorage`] over the encrypted actix session cookie.
#[derive(Clone)]
pub struct CookieStorage(pub Session);

impl CookieStorage {
    fn insert<T: serde::Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.0.insert(key, value) {
            log::warn!("Failed to write session key {key}: {e}");
        }
    }
}

impl SessionStorage for CookieStorage {
    fn load(&self) -> SessionState {
        SessionState {
            token: self.0.get::<String>(TOKEN_KEY).unwrap_or(None),
            user: self.0.get::<User>(USER_KEY).unwrap_or(None),
            applicant: self.0.get::<ApplicantStatus>(APPLICANT_KEY).unwrap_or(None),
            verified: self.0.get::<bool>(VERIFIED_KEY).unwrap_or(None).unwrap_or(false),
        }
    }

    fn store(&self, state: &SessionState) {
        match &state.token {
            Some(token) => self.insert(TOKEN_KEY, token),
            None => {
                self.0.remove(TOKEN_KEY);
            }
        }
        match &state.user {
            Some(user) => self.insert(USER_KEY, user),
            None => {
                self.0.remove(USER_KEY);
            }
        }
        match &state.applicant {
            Some(applicant) => self.insert(APPLICANT_KEY, applicant),
            None => {
                self.0.remove(APPLICANT_KEY);
            }
        }
        self.insert(VERIFIED_KEY, &state.verified);
    }

    /// Drops identity keys only, so the CSRF token and flash survive logout.
    fn clear(&self) {
        for key in [TOKEN_KEY, USER_KEY, APPLICANT_KEY, VERIFIED_KEY] {
            self.0.remove(key);
        }
    }
}

/// The auth session of the current request.
pub fn portal_session(session: &Session) -> AuthSession<CookieStorage> {
    AuthSession::restore(CookieStorage(session.clone()))
}

pub fn set_flash(session: &Session, message: impl Into<String>) {
    if let Err(e) = session.insert(FLASH_KEY, message.into()) {
        log::warn!("Failed to store flash message: {e}");
    }
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>(FLASH_KEY).unwrap_or(None);
    if flash.is_some() {
        session.remove(FLASH_KEY);
    }
    flash
}
