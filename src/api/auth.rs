use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::types::{ApplicantStatus, AuthResponse, SignupRequest, TokenInfo};
use super::{ApiClient, ApiError, GENERIC_FAILURE};

/// Identity endpoints used by the session store.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError>;
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError>;
    async fn verify_token(&self, token: &str) -> Result<TokenInfo, ApiError>;
    async fn logout(&self, token: &str) -> Result<(), ApiError>;
    async fn applicant_status(&self, token: &str) -> Result<ApplicantStatus, ApiError>;
}

#[derive(Deserialize)]
struct StatusEnvelope {
    applicant: ApplicantStatus,
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError> {
        self.send_json(self.post("/auth/signup", None).json(request), GENERIC_FAILURE)
            .await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = json!({ "email": email, "password": password });
        self.send_json(self.post("/auth/login", None).json(&body), GENERIC_FAILURE)
            .await
    }

    async fn verify_token(&self, token: &str) -> Result<TokenInfo, ApiError> {
        self.send_json(self.get("/auth/verify-token", Some(token)), GENERIC_FAILURE)
            .await
    }

    async fn logout(&self, token: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .send_json(self.post("/auth/logout", Some(token)), GENERIC_FAILURE)
            .await?;
        Ok(())
    }

    async fn applicant_status(&self, token: &str) -> Result<ApplicantStatus, ApiError> {
        let envelope: StatusEnvelope = self
            .send_json(self.get("/applicant/get-applicant-status", Some(token)), GENERIC_FAILURE)
            .await?;
        Ok(envelope.applicant)
    }
}
