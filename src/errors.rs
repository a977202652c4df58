use actix_web::{HttpResponse, ResponseError};
use askama::Template;
use std::fmt;

use crate::api::ApiError;
use crate::workflow::WorkflowError;

#[derive(Debug)]
pub enum AppError {
    Api(ApiError),
    Template(askama::Error),
    Session(String),
    Csrf,
    /// Rejected input that a page could not show inline.
    Invalid(String),
    PermissionDenied(String),
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Api(e) => write!(f, "Backend error: {e}"),
            AppError::Template(e) => write!(f, "Template error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Csrf => write!(f, "Invalid or missing CSRF token"),
            AppError::Invalid(msg) => write!(f, "{msg}"),
            AppError::PermissionDenied(what) => write!(f, "Permission denied: {what}"),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound().body("Not Found"),
            AppError::Csrf => HttpResponse::Forbidden().body("Invalid or missing CSRF token"),
            AppError::Invalid(msg) => HttpResponse::BadRequest().body(msg.clone()),
            AppError::PermissionDenied(_) => HttpResponse::Forbidden().body("Forbidden"),
            // An expired token sends the browser back to the login page.
            AppError::Api(e) if e.is_unauthorized() => HttpResponse::SeeOther()
                .insert_header(("Location", "/auth/login"))
                .finish(),
            AppError::Api(e @ ApiError::Status { status: 404, .. }) => {
                log::info!("{e}");
                HttpResponse::NotFound().body("Not Found")
            }
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
        }
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        AppError::Api(e)
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

impl From<WorkflowError> for AppError {
    fn from(e: WorkflowError) -> Self {
        match e {
            WorkflowError::Backend(api) => AppError::Api(api),
            WorkflowError::Upload { source, .. } => AppError::Api(source),
            WorkflowError::NotAdmitted => AppError::PermissionDenied("not admitted".to_string()),
            other => AppError::Invalid(other.to_string()),
        }
    }
}

/// Render a template into an HTML response.
pub fn render(tmpl: impl Template) -> Result<HttpResponse, AppError> {
    let html = tmpl.render()?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// 303 redirect, the response to every successful form POST.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}

/// Stream PDF bytes inline.
pub fn pdf(bytes: Vec<u8>, filename: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            "Content-Disposition",
            format!("inline; filename=\"{filename}\""),
        ))
        .body(bytes)
}
