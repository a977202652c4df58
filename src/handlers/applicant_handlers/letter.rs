use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::auth::session::{portal_session, set_flash};
use crate::errors::{AppError, pdf, redirect, render};
use crate::state::AppState;
use crate::templates_structs::{AdmissionLetterTemplate, PageContext};
use crate::workflow::WorkflowError;
use crate::workflow::letters;

use super::{applicant, token};

const NOT_ADMITTED_NOTICE: &str = "Your admission letter will be available once you are admitted.";

/// GET /applicant/admission-letter
pub async fn show(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let mut auth = portal_session(&session);
    auth.refresh_status(state.api()).await;
    let token = token(&auth)?;
    let applicant = applicant(&auth)?;

    match letters::applicant_letter(state.api(), &token, &applicant).await {
        Ok(letter) => {
            let ctx = PageContext::build(&session, &auth, req.path());
            render(AdmissionLetterTemplate { ctx, letter })
        }
        Err(WorkflowError::NotAdmitted) => {
            set_flash(&session, NOT_ADMITTED_NOTICE);
            Ok(redirect("/applicant/dashboard"))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /applicant/admission-letter/pdf
pub async fn download(state: web::Data<AppState>, session: Session) -> Result<HttpResponse, AppError> {
    let mut auth = portal_session(&session);
    auth.refresh_status(state.api()).await;
    let token = token(&auth)?;
    let applicant = applicant(&auth)?;

    match letters::applicant_letter_pdf(state.api(), &token, &applicant).await {
        Ok(bytes) => Ok(pdf(bytes, "admission-letter.pdf")),
        Err(WorkflowError::NotAdmitted) => {
            set_flash(&session, NOT_ADMITTED_NOTICE);
            Ok(redirect("/applicant/dashboard"))
        }
        Err(e) => Err(e.into()),
    }
}
