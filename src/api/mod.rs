//! Typed client for the admissions backend REST API.
//!
//! The client owns the HTTP transport and the base URL only. Bearer tokens
//! belong to the caller's session and are passed to every authenticated call.

pub mod admin;
pub mod applicant;
pub mod auth;
pub mod letters;
pub mod payments;
pub mod types;

use std::fmt;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

pub use admin::ReviewApi;
pub use applicant::{ApplicationApi, ProgramApi};
pub use auth::AuthApi;
pub use letters::LetterApi;
pub use payments::PaymentApi;

/// Every backend surface the portal talks to.
pub trait Backend:
    AuthApi + ProgramApi + ApplicationApi + ReviewApi + LetterApi + PaymentApi
{
}

impl<T> Backend for T where
    T: AuthApi + ProgramApi + ApplicationApi + ReviewApi + LetterApi + PaymentApi
{
}

/// Fallback message when the backend does not explain a failure.
pub const GENERIC_FAILURE: &str = "API request failed";

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Non-success HTTP status; `message` comes from the body's `message`
    /// field, or a per-call fallback.
    Status { status: u16, message: String },
    /// The request never produced a response.
    Network(String),
    /// The response body did not match the expected shape.
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Status { message, .. } => write!(f, "{message}"),
            ApiError::Network(e) => write!(f, "Network error: {e}"),
            ApiError::Decode(e) => write!(f, "Unexpected response from server: {e}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// Build the error for a non-success response body.
pub fn error_from_body(status: u16, body: &[u8], fallback: &str) -> ApiError {
    let message = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string());
    ApiError::Status { status, message }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn get(&self, endpoint: &str, token: Option<&str>) -> RequestBuilder {
        authorize(self.http.get(self.url(endpoint)), token)
    }

    fn post(&self, endpoint: &str, token: Option<&str>) -> RequestBuilder {
        authorize(self.http.post(self.url(endpoint)), token)
    }

    /// Send a request and decode a JSON body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(failure(status, &body, fallback));
        }
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send a request whose successful body is binary (PDF letters, receipts).
    async fn send_bytes(&self, request: RequestBuilder, fallback: &str) -> Result<Vec<u8>, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(failure(status, &body, fallback));
        }
        Ok(body.to_vec())
    }
}

fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

fn failure(status: StatusCode, body: &[u8], fallback: &str) -> ApiError {
    log::debug!("Backend responded {status}");
    error_from_body(status.as_u16(), body, fallback)
}
