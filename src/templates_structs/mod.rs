// Template context structures for Askama templates, organized by area.

use actix_session::Session;

use crate::api::types::Role;
use crate::auth::csrf;
use crate::auth::session::{CookieStorage, take_flash};
use crate::session::AuthSession;

pub const APP_NAME: &str = "Admissions Portal";

/// Common context shared by all authenticated pages.
/// Templates access these as `ctx.user_name`, `ctx.csrf_token`, etc.
pub struct PageContext {
    pub app_name: String,
    pub user_name: String,
    pub avatar_initial: String,
    pub is_admin: bool,
    pub flash: Option<String>,
    pub csrf_token: String,
    pub current_path: String,
}

impl PageContext {
    pub fn build(session: &Session, auth: &AuthSession<CookieStorage>, current_path: &str) -> Self {
        let user_name = auth.user().map(|u| u.name.clone()).unwrap_or_default();
        let avatar_initial = user_name
            .chars()
            .next()
            .unwrap_or('?')
            .to_uppercase()
            .to_string();
        Self {
            app_name: APP_NAME.to_string(),
            user_name,
            avatar_initial,
            is_admin: auth.role() == Some(Role::Admin),
            flash: take_flash(session),
            csrf_token: csrf::get_or_create_token(session),
            current_path: current_path.to_string(),
        }
    }

    /// For nav links: whether `prefix` is the active section.
    pub fn is_active(&self, prefix: &str) -> bool {
        self.current_path.starts_with(prefix)
    }
}

/// A `<select>` option.
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

mod admin;
mod applicant;
mod auth;

pub use admin::*;
pub use applicant::*;
pub use auth::*;
