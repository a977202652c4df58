use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use crate::api::types::{ApplicationStatus, SendResult};
use crate::api::{Backend, LetterApi};
use crate::auth::csrf;
use crate::auth::session::portal_session;
use crate::errors::{AppError, pdf, render};
use crate::state::AppState;
use crate::templates_structs::{PageContext, SelectOption, SendLettersTemplate};
use crate::workflow::WorkflowError;
use crate::workflow::letters::{self, DEFAULT_TEMPLATE_ID};
use crate::workflow::review::ApplicationFilter;

use super::token;

#[derive(Deserialize)]
pub struct PreviewQuery {
    pub admission_date: Option<String>,
    pub template_id: Option<String>,
}

/// Letter templates as select options, falling back to the default template.
async fn template_options(api: &dyn Backend, token: &str, selected: &str) -> Vec<SelectOption> {
    let templates = match api.letter_templates(token).await {
        Ok(templates) => templates,
        Err(e) => {
            log::warn!("Could not load letter templates: {e}");
            Vec::new()
        }
    };
    if templates.is_empty() {
        return vec![SelectOption {
            value: DEFAULT_TEMPLATE_ID.to_string(),
            label: "Default".to_string(),
            selected: true,
        }];
    }
    templates
        .into_iter()
        .map(|t| SelectOption {
            selected: t.id == selected,
            value: t.id,
            label: t.name,
        })
        .collect()
}

async fn template_name(api: &dyn Backend, token: &str, template_id: &str) -> Option<String> {
    let template_id = match template_id.trim() {
        "" => DEFAULT_TEMPLATE_ID,
        id => id,
    };
    match api.letter_template(token, template_id).await {
        Ok(template) => Some(template.name),
        Err(e) => {
            log::warn!("Could not load letter template {template_id}: {e}");
            None
        }
    }
}

/// GET /admin/preview-letter/{id}
pub async fn preview(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<i64>,
    query: web::Query<PreviewQuery>,
) -> Result<HttpResponse, AppError> {
    let auth = portal_session(&session);
    let token = token(&auth)?;
    let applicant_id = path.into_inner();
    let bytes = letters::preview_letter(
        state.api(),
        &token,
        applicant_id,
        query.admission_date.as_deref(),
        query.template_id.as_deref(),
    )
    .await?;
    Ok(pdf(bytes, &format!("admission-letter-{applicant_id}.pdf")))
}

async fn send_page(
    req: &HttpRequest,
    session: &Session,
    api: &dyn Backend,
    admission_date: String,
    template_id: &str,
    result: Option<SendResult>,
    error: Option<String>,
) -> Result<HttpResponse, AppError> {
    let auth = portal_session(session);
    let token = token(&auth)?;
    let filter = ApplicationFilter {
        status: ApplicationStatus::Accepted,
        program_id: None,
    };
    let applications = filter.fetch(api, &token).await?;
    let templates = template_options(api, &token, template_id).await;
    let sent_with = match &result {
        Some(_) => template_name(api, &token, template_id).await,
        None => None,
    };

    let ctx = PageContext::build(session, &auth, req.path());
    render(SendLettersTemplate {
        ctx,
        applications,
        templates,
        admission_date,
        result,
        sent_with,
        error,
    })
}

/// GET /admin/send-letters
pub async fn send_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    send_page(
        &req,
        &session,
        state.api(),
        letters::default_admission_date(),
        DEFAULT_TEMPLATE_ID,
        None,
        None,
    )
    .await
}

/// POST /admin/send-letters
///
/// The body repeats `applicant_ids` once per checked applicant.
pub async fn send_submit(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<Vec<(String, String)>>,
) -> Result<HttpResponse, AppError> {
    let mut csrf_token = "";
    let mut admission_date = "";
    let mut template_id = "";
    let mut applicant_ids = Vec::new();
    for (key, value) in form.iter() {
        match key.as_str() {
            "csrf_token" => csrf_token = value.as_str(),
            "admission_date" => admission_date = value.as_str(),
            "template_id" => template_id = value.as_str(),
            "applicant_ids" => match value.trim().parse::<i64>() {
                Ok(id) => applicant_ids.push(id),
                Err(_) => log::warn!("Ignoring malformed applicant id {value:?}"),
            },
            _ => {}
        }
    }
    csrf::validate_csrf(&session, csrf_token)?;

    let auth = portal_session(&session);
    let token = token(&auth)?;
    let date = if admission_date.trim().is_empty() {
        letters::default_admission_date()
    } else {
        admission_date.trim().to_string()
    };

    match letters::send_batch(state.api(), &token, &applicant_ids, admission_date, template_id).await {
        Ok(result) => {
            send_page(&req, &session, state.api(), date, template_id, Some(result), None).await
        }
        Err(WorkflowError::Backend(e)) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            send_page(&req, &session, state.api(), date, template_id, None, Some(e.to_string()))
                .await
        }
    }
}
