//! Routing decisions derived from the session alone.

use crate::api::types::Role;
use crate::session::{AuthSession, SessionStorage};

pub const LOGIN_PATH: &str = "/auth/login";
pub const SELECT_PROGRAM_PATH: &str = "/applicant/select-program";

/// Where an applicant without a selected program must go instead of `path`.
///
/// `None` means the request may proceed. Requests already aimed at the
/// program selection page always proceed.
pub fn program_redirect<S: SessionStorage>(
    session: &AuthSession<S>,
    path: &str,
) -> Option<&'static str> {
    if !session.is_authenticated() || session.role() != Some(Role::Applicant) {
        return None;
    }
    if path.trim_end_matches('/') == SELECT_PROGRAM_PATH {
        return None;
    }
    if session.applicant().is_some_and(|a| a.has_program()) {
        None
    } else {
        Some(SELECT_PROGRAM_PATH)
    }
}

/// Where a session lacking `role` is sent.
pub fn role_redirect<S: SessionStorage>(
    session: &AuthSession<S>,
    role: Role,
) -> Option<&'static str> {
    if !session.is_authenticated() {
        return Some(LOGIN_PATH);
    }
    if session.role() == Some(role) {
        None
    } else {
        Some(session.home_path())
    }
}
