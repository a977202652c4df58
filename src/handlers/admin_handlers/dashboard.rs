use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::api::ReviewApi;
use crate::auth::session::portal_session;
use crate::errors::{AppError, render};
use crate::state::AppState;
use crate::templates_structs::{AdminDashboardTemplate, PageContext};

use super::token;

/// GET /admin/dashboard
pub async fn index(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let auth = portal_session(&session);
    let token = token(&auth)?;
    let stats = state.api().statistics(&token).await?;

    let ctx = PageContext::build(&session, &auth, req.path());
    render(AdminDashboardTemplate { ctx, stats })
}
