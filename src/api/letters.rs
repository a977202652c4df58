use async_trait::async_trait;
use serde::Deserialize;

use super::types::{
    AdmissionLetterData, BatchLetterRequest, LetterTemplate, LetterTemplateList,
    PreviewLetterRequest, SendResult,
};
use super::{ApiClient, ApiError, GENERIC_FAILURE};

/// Admission letter data, PDFs and batch dispatch.
#[async_trait]
pub trait LetterApi: Send + Sync {
    async fn admission_letter(&self, token: &str) -> Result<AdmissionLetterData, ApiError>;
    async fn print_admission_letter(&self, token: &str) -> Result<Vec<u8>, ApiError>;
    async fn preview_admission_letter(
        &self,
        token: &str,
        request: &PreviewLetterRequest,
    ) -> Result<Vec<u8>, ApiError>;
    async fn send_batch_letters(
        &self,
        token: &str,
        request: &BatchLetterRequest,
    ) -> Result<SendResult, ApiError>;
    async fn letter_templates(&self, token: &str) -> Result<Vec<LetterTemplate>, ApiError>;
    async fn letter_template(&self, token: &str, template_id: &str) -> Result<LetterTemplate, ApiError>;
}

#[derive(Deserialize)]
struct TemplateEnvelope {
    template: LetterTemplate,
}

#[async_trait]
impl LetterApi for ApiClient {
    async fn admission_letter(&self, token: &str) -> Result<AdmissionLetterData, ApiError> {
        self.send_json(self.get("/applicant/admission-letter", Some(token)), GENERIC_FAILURE)
            .await
    }

    async fn print_admission_letter(&self, token: &str) -> Result<Vec<u8>, ApiError> {
        self.send_bytes(
            self.post("/applicant/print-admission-letter", Some(token)),
            "Failed to generate PDF",
        )
        .await
    }

    async fn preview_admission_letter(
        &self,
        token: &str,
        request: &PreviewLetterRequest,
    ) -> Result<Vec<u8>, ApiError> {
        self.send_bytes(
            self.post("/admin/preview-admission-letter", Some(token)).json(request),
            "Preview request failed",
        )
        .await
    }

    async fn send_batch_letters(
        &self,
        token: &str,
        request: &BatchLetterRequest,
    ) -> Result<SendResult, ApiError> {
        self.send_json(
            self.post("/admin/send-batch-letters", Some(token)).json(request),
            "Failed to send letters",
        )
        .await
    }

    async fn letter_templates(&self, token: &str) -> Result<Vec<LetterTemplate>, ApiError> {
        let list: LetterTemplateList = self
            .send_json(self.get("/admin/letter-templates", Some(token)), GENERIC_FAILURE)
            .await?;
        Ok(list.templates)
    }

    async fn letter_template(&self, token: &str, template_id: &str) -> Result<LetterTemplate, ApiError> {
        let envelope: TemplateEnvelope = self
            .send_json(
                self.get(&format!("/admin/letter-template/{template_id}"), Some(token)),
                GENERIC_FAILURE,
            )
            .await?;
        Ok(envelope.template)
    }
}
