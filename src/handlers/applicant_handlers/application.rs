use actix_multipart::{Field, Multipart};
use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use futures_util::StreamExt;

use crate::api::types::{ApplicantStatus, PendingFile};
use crate::api::{ApplicationApi, Backend};
use crate::auth::csrf;
use crate::auth::session::{CookieStorage, portal_session, set_flash};
use crate::errors::{AppError, redirect, render};
use crate::handlers::auth_handlers::CsrfOnly;
use crate::session::AuthSession;
use crate::state::AppState;
use crate::templates_structs::{ApplicationTemplate, PageContext};
use crate::workflow::{ApplicationForm, FormState, MAX_UPLOAD_BYTES, WorkflowError};

use super::{applicant, token};

/// Multipart name prefix of file inputs: `document_<type>`.
pub const DOCUMENT_FIELD_PREFIX: &str = "document_";

/// Rebuild the form from the template and whatever the backend has saved.
async fn load_form(
    api: &dyn Backend,
    token: &str,
    applicant: &ApplicantStatus,
) -> Result<ApplicationForm, AppError> {
    let program_id = applicant
        .program_id
        .ok_or_else(|| AppError::Session("No program selected".to_string()))?;
    let template = api.form_template(token, program_id).await?;
    let mut form = ApplicationForm::new(template, program_id, applicant.id);

    match api.saved_application(token, applicant.id).await {
        Ok(saved) => form.hydrate(saved),
        Err(e) if e.status() == Some(404) => {}
        Err(e) => return Err(e.into()),
    }
    if applicant.application_status != "pending" {
        form.mark_submitted();
    }
    Ok(form)
}

fn page(
    req: &HttpRequest,
    session: &Session,
    auth: &AuthSession<CookieStorage>,
    form: &ApplicationForm,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(session, auth, req.path());
    let is_submitted = matches!(form.state(), FormState::Submitted(_));
    render(ApplicationTemplate::new(ctx, form, is_submitted, errors))
}

/// Read one multipart field, keeping at most one byte past the upload limit
/// so oversized files are still recognisable.
async fn read_field(field: &mut Field) -> Result<Vec<u8>, AppError> {
    let cap = MAX_UPLOAD_BYTES as usize + 1;
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::Invalid(format!("Upload interrupted: {e}")))?;
        if bytes.len() < cap {
            let room = cap - bytes.len();
            bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
        }
    }
    Ok(bytes)
}

/// GET /applicant/application
pub async fn form_page(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let mut auth = portal_session(&session);
    auth.refresh_status(state.api()).await;
    let token = token(&auth)?;
    let applicant = applicant(&auth)?;

    let form = load_form(state.api(), &token, &applicant).await?;
    page(&req, &session, &auth, &form, Vec::new())
}

/// POST /applicant/application/save
///
/// Text parts become field values; `document_<type>` file parts become
/// pending uploads. The whole draft is saved, then pending files are uploaded
/// in template order.
pub async fn save(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let auth = portal_session(&session);
    let token = token(&auth)?;
    let applicant = applicant(&auth)?;
    let mut form = load_form(state.api(), &token, &applicant).await?;

    let mut csrf_token = String::new();
    let mut errors = Vec::new();
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| AppError::Invalid(format!("Malformed form data: {e}")))?;
        let (name, filename) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().unwrap_or_default().to_string(),
                cd.get_filename().map(String::from),
            ),
            None => continue,
        };
        let content_type = field
            .content_type()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let bytes = read_field(&mut field).await?;

        if name == "csrf_token" {
            csrf_token = String::from_utf8_lossy(&bytes).into_owned();
        } else if let Some(document_type) = name.strip_prefix(DOCUMENT_FIELD_PREFIX) {
            // An untouched file input arrives as an empty part.
            let Some(filename) = filename.filter(|f| !f.is_empty()) else {
                continue;
            };
            if bytes.is_empty() {
                continue;
            }
            let file = PendingFile::new(filename, content_type, bytes);
            if let Err(e) = form.select_file(document_type, file) {
                errors.push(e.to_string());
            }
        } else {
            form.set_field(&name, String::from_utf8_lossy(&bytes).into_owned());
        }
    }
    csrf::validate_csrf(&session, &csrf_token)?;

    match form.save(state.api(), &token).await {
        Ok(outcome) if errors.is_empty() => {
            let mut message = "Application form saved.".to_string();
            if !outcome.uploads.committed.is_empty() {
                message.push_str(&format!(
                    " Uploaded {} document(s).",
                    outcome.uploads.committed.len()
                ));
            }
            set_flash(&session, message);
            Ok(redirect("/applicant/application"))
        }
        Ok(_) => page(&req, &session, &auth, &form, errors),
        Err(WorkflowError::Upload {
            document_type,
            source,
            report,
        }) => {
            errors.push(format!("Form saved, but uploading {document_type} failed: {source}"));
            if !report.skipped.is_empty() {
                errors.push(format!("Not uploaded: {}", report.skipped.join(", ")));
            }
            page(&req, &session, &auth, &form, errors)
        }
        Err(WorkflowError::Backend(e)) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            errors.insert(0, e.to_string());
            page(&req, &session, &auth, &form, errors)
        }
    }
}

/// POST /applicant/application/submit
pub async fn submit(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let mut auth = portal_session(&session);
    let token = token(&auth)?;
    let applicant = applicant(&auth)?;
    let mut application = load_form(state.api(), &token, &applicant).await?;

    match application.submit(state.api(), &token).await {
        Ok(()) => {
            log::info!("Applicant {} submitted their application", applicant.id);
            auth.refresh_status(state.api()).await;
            set_flash(&session, "Application submitted successfully.");
            Ok(redirect("/applicant/dashboard"))
        }
        Err(WorkflowError::Backend(e)) if e.is_unauthorized() => Err(e.into()),
        Err(e) => page(&req, &session, &auth, &application, vec![e.to_string()]),
    }
}
