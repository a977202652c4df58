use actix_session::SessionExt;
use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web,
};

use crate::api::types::Role;
use crate::auth::guard;
use crate::auth::session::{CookieStorage, portal_session};
use crate::session::AuthSession;
use crate::state::AppState;

fn redirect(req: ServiceRequest, location: &str) -> ServiceResponse {
    let response = HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish();
    req.into_response(response)
}

/// Restore the session and verify its token once per browser session.
async fn restore_verified(req: &ServiceRequest) -> AuthSession<CookieStorage> {
    let mut auth = portal_session(&req.get_session());
    if let Some(state) = req.app_data::<web::Data<AppState>>() {
        auth.initialize(state.api()).await;
    } else {
        log::error!("AppState missing; cannot verify session token");
    }
    auth
}

/// Admin pages: authenticated admins only.
pub async fn require_admin(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let auth = restore_verified(&req).await;
    if let Some(location) = guard::role_redirect(&auth, Role::Admin) {
        return Ok(redirect(req, location).map_into_right_body());
    }
    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Applicant pages: authenticated applicants with a selected program,
/// except on the program selection page itself.
pub async fn require_applicant(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let auth = restore_verified(&req).await;
    let location = guard::role_redirect(&auth, Role::Applicant)
        .or_else(|| guard::program_redirect(&auth, req.path()));
    if let Some(location) = location {
        return Ok(redirect(req, location).map_into_right_body());
    }
    next.call(req).await.map(|res| res.map_into_left_body())
}
