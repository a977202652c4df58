use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use crate::api::types::{ApplicationStatus, Program};
use crate::api::{Backend, ProgramApi};
use crate::auth::csrf;
use crate::auth::session::{CookieStorage, portal_session};
use crate::errors::{AppError, render};
use crate::session::AuthSession;
use crate::state::AppState;
use crate::templates_structs::{
    ApplicationDetailTemplate, ApplicationListTemplate, PageContext, SelectOption,
};
use crate::workflow::WorkflowError;
use crate::workflow::review::{self, ApplicationFilter, ReviewForm, ReviewOutcome, ReviewPanel};

use super::token;

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub program_id: Option<String>,
}

#[derive(Deserialize)]
pub struct ReviewInput {
    pub recommendation: String,
    #[serde(default)]
    pub review_notes: String,
    #[serde(default)]
    pub recommended_program_id: String,
    pub csrf_token: String,
}

async fn programs(api: &dyn Backend) -> Vec<Program> {
    match api.programs().await {
        Ok(programs) => programs,
        Err(e) => {
            log::warn!("Could not load programs: {e}");
            Vec::new()
        }
    }
}

/// GET /admin/applications
pub async fn list(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let auth = portal_session(&session);
    let token = token(&auth)?;
    let filter = ApplicationFilter::from_query(query.status.as_deref(), query.program_id.as_deref());
    let applications = filter.fetch(state.api(), &token).await?;

    let statuses = ApplicationStatus::ALL
        .iter()
        .map(|s| SelectOption {
            value: s.as_str().to_string(),
            label: s.label(),
            selected: *s == filter.status,
        })
        .collect();
    let programs = programs(state.api())
        .await
        .into_iter()
        .map(|p| SelectOption {
            value: p.id.to_string(),
            label: p.name,
            selected: Some(p.id) == filter.program_id,
        })
        .collect();

    let ctx = PageContext::build(&session, &auth, req.path());
    render(ApplicationListTemplate {
        ctx,
        applications,
        statuses,
        programs,
        status_label: filter.status.label(),
    })
}

async fn detail_page(
    req: &HttpRequest,
    session: &Session,
    auth: &AuthSession<CookieStorage>,
    api: &dyn Backend,
    panel: ReviewPanel,
    error: Option<String>,
    notice: Option<&str>,
) -> Result<HttpResponse, AppError> {
    let current = panel.record.applicant.program_id;
    let selected_program = panel.form.recommended_program_id.trim().parse::<i64>().ok();
    let programs = review::selectable_programs(&programs(api).await, current)
        .into_iter()
        .map(|p| SelectOption {
            value: p.id.to_string(),
            label: p.name,
            selected: Some(p.id) == selected_program,
        })
        .collect();
    let form_entries = panel
        .record
        .form
        .as_ref()
        .map(review::form_entries)
        .unwrap_or_default();

    let mut ctx = PageContext::build(session, auth, req.path());
    if let Some(notice) = notice {
        ctx.flash = Some(notice.to_string());
    }
    render(ApplicationDetailTemplate {
        ctx,
        status_label: panel.record.applicant.application_status.label(),
        form_entries,
        programs,
        record: panel.record,
        form: panel.form,
        error,
    })
}

/// GET /admin/application/{id}
pub async fn detail(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let auth = portal_session(&session);
    let token = token(&auth)?;
    let panel = ReviewPanel::load(state.api(), &token, path.into_inner()).await?;
    detail_page(&req, &session, &auth, state.api(), panel, None, None).await
}

/// POST /admin/application/{id}/review
pub async fn review(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<i64>,
    input: web::Form<ReviewInput>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &input.csrf_token)?;
    let auth = portal_session(&session);
    let token = token(&auth)?;
    let applicant_id = path.into_inner();
    let input = input.into_inner();
    let form = ReviewForm {
        recommendation: input.recommendation,
        review_notes: input.review_notes,
        recommended_program_id: input.recommended_program_id,
    };

    let mut panel = ReviewPanel::load(state.api(), &token, applicant_id).await?;
    match panel.submit(state.api(), &token, form).await {
        Ok(outcome) => {
            let error = match outcome {
                ReviewOutcome::Refreshed => None,
                ReviewOutcome::Stale(e) if e.is_unauthorized() => return Err(e.into()),
                ReviewOutcome::Stale(e) => Some(format!("Could not reload the application: {e}")),
            };
            detail_page(
                &req,
                &session,
                &auth,
                state.api(),
                panel,
                error,
                Some("Review submitted successfully."),
            )
            .await
        }
        Err(WorkflowError::Backend(e)) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            log::warn!("Review of applicant {applicant_id} rejected: {e}");
            detail_page(&req, &session, &auth, state.api(), panel, Some(e.to_string()), None).await
        }
    }
}
