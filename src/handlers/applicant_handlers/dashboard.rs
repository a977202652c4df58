use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use crate::api::ProgramApi;
use crate::auth::csrf;
use crate::auth::session::{portal_session, set_flash};
use crate::errors::{AppError, redirect, render};
use crate::state::AppState;
use crate::templates_structs::{ApplicantDashboardTemplate, PageContext, SelectProgramTemplate};

use super::{applicant, token};

#[derive(Deserialize)]
pub struct SelectProgramForm {
    pub program_id: i64,
    pub csrf_token: String,
}

/// GET /applicant/dashboard
pub async fn index(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let mut auth = portal_session(&session);
    auth.refresh_status(state.api()).await;
    let applicant = applicant(&auth)?;

    let ctx = PageContext::build(&session, &auth, req.path());
    render(ApplicantDashboardTemplate {
        ctx,
        program_name: applicant.program_name.clone().unwrap_or_default(),
        application_label: applicant.application_status.replace('_', " "),
        is_submitted: applicant.application_status != "pending",
        is_admitted: applicant.is_admitted(),
        applicant,
    })
}

/// GET /applicant/select-program
pub async fn select_program_page(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let auth = portal_session(&session);
    let programs = state.api().programs().await?;
    let ctx = PageContext::build(&session, &auth, req.path());
    render(SelectProgramTemplate {
        ctx,
        programs,
        error: None,
    })
}

/// POST /applicant/select-program
pub async fn select_program_submit(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<SelectProgramForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let mut auth = portal_session(&session);
    let token = token(&auth)?;

    match state.api().select_program(&token, form.program_id).await {
        Ok(()) => {
            auth.refresh_status(state.api()).await;
            set_flash(&session, "Program selected. You can now fill in your application.");
            Ok(redirect("/applicant/dashboard"))
        }
        Err(e) => {
            log::warn!("Program selection failed: {e}");
            let programs = state.api().programs().await.unwrap_or_default();
            let ctx = PageContext::build(&session, &auth, req.path());
            render(SelectProgramTemplate {
                ctx,
                programs,
                error: Some(e.to_string()),
            })
        }
    }
}
