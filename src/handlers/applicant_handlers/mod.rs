pub mod application;
pub mod dashboard;
pub mod letter;
pub mod payment;

use crate::api::types::ApplicantStatus;
use crate::auth::session::CookieStorage;
use crate::errors::AppError;
use crate::session::AuthSession;

/// Bearer token of a session the applicant guard already admitted.
pub(crate) fn token(auth: &AuthSession<CookieStorage>) -> Result<String, AppError> {
    auth.token()
        .map(String::from)
        .ok_or_else(|| AppError::Session("No token in session".to_string()))
}

pub(crate) fn applicant(auth: &AuthSession<CookieStorage>) -> Result<ApplicantStatus, AppError> {
    auth.applicant()
        .cloned()
        .ok_or_else(|| AppError::Session("No applicant status in session".to_string()))
}
