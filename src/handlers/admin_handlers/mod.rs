pub mod applications;
pub mod dashboard;
pub mod letters;

use crate::auth::session::CookieStorage;
use crate::errors::AppError;
use crate::session::AuthSession;

pub(crate) fn token(auth: &AuthSession<CookieStorage>) -> Result<String, AppError> {
    auth.token()
        .map(String::from)
        .ok_or_else(|| AppError::Session("No token in session".to_string()))
}
