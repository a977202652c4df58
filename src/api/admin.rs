use async_trait::async_trait;

use super::types::{
    ApplicationList, ApplicationRecord, ApplicationStatus, ApplicationSummary, ReviewRequest,
    ReviewResponse, Statistics,
};
use super::{ApiClient, ApiError, GENERIC_FAILURE};

/// Admin endpoints behind the review workflow.
#[async_trait]
pub trait ReviewApi: Send + Sync {
    async fn applications(
        &self,
        token: &str,
        status: ApplicationStatus,
        program_id: Option<i64>,
    ) -> Result<Vec<ApplicationSummary>, ApiError>;
    async fn application_detail(
        &self,
        token: &str,
        applicant_id: i64,
    ) -> Result<ApplicationRecord, ApiError>;
    async fn review_application(
        &self,
        token: &str,
        request: &ReviewRequest,
    ) -> Result<ReviewResponse, ApiError>;
    async fn statistics(&self, token: &str) -> Result<Statistics, ApiError>;
}

#[async_trait]
impl ReviewApi for ApiClient {
    async fn applications(
        &self,
        token: &str,
        status: ApplicationStatus,
        program_id: Option<i64>,
    ) -> Result<Vec<ApplicationSummary>, ApiError> {
        let mut query = vec![("status", status.as_str().to_string())];
        if let Some(program_id) = program_id {
            query.push(("program_id", program_id.to_string()));
        }
        let list: ApplicationList = self
            .send_json(
                self.get("/admin/applications", Some(token)).query(&query),
                GENERIC_FAILURE,
            )
            .await?;
        Ok(list.applications)
    }

    async fn application_detail(
        &self,
        token: &str,
        applicant_id: i64,
    ) -> Result<ApplicationRecord, ApiError> {
        self.send_json(
            self.get(&format!("/admin/application/{applicant_id}"), Some(token)),
            GENERIC_FAILURE,
        )
        .await
    }

    async fn review_application(
        &self,
        token: &str,
        request: &ReviewRequest,
    ) -> Result<ReviewResponse, ApiError> {
        self.send_json(
            self.post("/admin/review-application", Some(token)).json(request),
            GENERIC_FAILURE,
        )
        .await
    }

    async fn statistics(&self, token: &str) -> Result<Statistics, ApiError> {
        self.send_json(self.get("/admin/statistics", Some(token)), GENERIC_FAILURE)
            .await
    }
}
