use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use crate::api::types::{PaymentTransaction, PaymentType};
use crate::api::{Backend, PaymentApi};
use crate::auth::csrf;
use crate::auth::session::{portal_session, set_flash};
use crate::errors::{AppError, pdf, redirect, render};
use crate::state::AppState;
use crate::templates_structs::{PageContext, PaymentTemplate};
use crate::workflow::WorkflowError;
use crate::workflow::payment;

use super::token;

#[derive(Deserialize)]
pub struct PayForm {
    pub payment_type: String,
    pub csrf_token: String,
}

async fn history(api: &dyn Backend, token: &str) -> Vec<PaymentTransaction> {
    match api.payment_history(token).await {
        Ok(history) => history.payment_history,
        Err(e) => {
            log::warn!("Could not load payment history: {e}");
            Vec::new()
        }
    }
}

fn not_admitted(session: &Session) -> HttpResponse {
    set_flash(session, "Payments open once you have been admitted.");
    redirect("/applicant/dashboard")
}

/// GET /applicant/payment
pub async fn index(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let auth = portal_session(&session);
    let token = token(&auth)?;
    let info = match payment::load_payment_info(state.api(), &token).await {
        Ok(info) => info,
        Err(WorkflowError::NotAdmitted) => return Ok(not_admitted(&session)),
        Err(e) => return Err(e.into()),
    };
    let history = history(state.api(), &token).await;

    let ctx = PageContext::build(&session, &auth, req.path());
    render(PaymentTemplate::new(ctx, &info, &history, None))
}

/// POST /applicant/payment/pay
pub async fn pay(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<PayForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let mut auth = portal_session(&session);
    let token = token(&auth)?;
    let kind = PaymentType::parse(&form.payment_type)
        .ok_or_else(|| AppError::Invalid(format!("Unknown payment type: {}", form.payment_type)))?;

    let info = match payment::load_payment_info(state.api(), &token).await {
        Ok(info) => info,
        Err(WorkflowError::NotAdmitted) => return Ok(not_admitted(&session)),
        Err(e) => return Err(e.into()),
    };

    match payment::pay(state.api(), &token, &info, kind, chrono::Utc::now()).await {
        Ok(receipt) => {
            auth.refresh_status(state.api()).await;
            set_flash(
                &session,
                format!("{} payment successful. Reference: {}", kind.label(), receipt.transaction_id),
            );
            Ok(redirect("/applicant/payment"))
        }
        Err(WorkflowError::Backend(e)) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            let history = history(state.api(), &token).await;
            let ctx = PageContext::build(&session, &auth, req.path());
            render(PaymentTemplate::new(ctx, &info, &history, Some(e.to_string())))
        }
    }
}

/// GET /applicant/payment/receipt/{id}
pub async fn receipt(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let auth = portal_session(&session);
    let token = token(&auth)?;
    let transaction_id = path.into_inner();
    let bytes = state.api().payment_receipt(&token, transaction_id).await?;
    Ok(pdf(bytes, &format!("receipt-{transaction_id}.pdf")))
}
