use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;

use super::types::{
    FormTemplate, PendingFile, Program, SavedApplication, SubmitFormResponse, UploadedDocument,
};
use super::{ApiClient, ApiError, GENERIC_FAILURE};

/// Program catalogue and selection.
#[async_trait]
pub trait ProgramApi: Send + Sync {
    async fn programs(&self) -> Result<Vec<Program>, ApiError>;
    async fn select_program(&self, token: &str, program_id: i64) -> Result<(), ApiError>;
}

/// Endpoints behind the application form workflow.
#[async_trait]
pub trait ApplicationApi: Send + Sync {
    async fn form_template(&self, token: &str, program_id: i64) -> Result<FormTemplate, ApiError>;
    async fn saved_application(
        &self,
        token: &str,
        applicant_id: i64,
    ) -> Result<SavedApplication, ApiError>;
    /// Persist the whole draft; returns the server-assigned form id.
    async fn submit_form(
        &self,
        token: &str,
        program_id: i64,
        draft: &BTreeMap<String, String>,
    ) -> Result<i64, ApiError>;
    async fn upload_document(
        &self,
        token: &str,
        form_id: i64,
        document_type: &str,
        file: &PendingFile,
    ) -> Result<UploadedDocument, ApiError>;
    async fn submit_application(&self, token: &str, applicant_id: i64) -> Result<(), ApiError>;
}

#[derive(Deserialize)]
struct ProgramList {
    #[serde(default)]
    programs: Vec<Program>,
}

#[async_trait]
impl ProgramApi for ApiClient {
    async fn programs(&self) -> Result<Vec<Program>, ApiError> {
        let list: ProgramList = self
            .send_json(self.get("/applicant/programs", None), GENERIC_FAILURE)
            .await?;
        Ok(list.programs)
    }

    async fn select_program(&self, token: &str, program_id: i64) -> Result<(), ApiError> {
        let body = json!({ "program_id": program_id });
        let _: serde_json::Value = self
            .send_json(
                self.post("/applicant/select-program", Some(token)).json(&body),
                GENERIC_FAILURE,
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ApplicationApi for ApiClient {
    async fn form_template(&self, token: &str, program_id: i64) -> Result<FormTemplate, ApiError> {
        self.send_json(
            self.get(&format!("/applicant/form/{program_id}"), Some(token)),
            GENERIC_FAILURE,
        )
        .await
    }

    async fn saved_application(
        &self,
        token: &str,
        applicant_id: i64,
    ) -> Result<SavedApplication, ApiError> {
        self.send_json(
            self.get(&format!("/applicant/get-form/{applicant_id}"), Some(token)),
            GENERIC_FAILURE,
        )
        .await
    }

    async fn submit_form(
        &self,
        token: &str,
        program_id: i64,
        draft: &BTreeMap<String, String>,
    ) -> Result<i64, ApiError> {
        // The backend reads `request.form`, so this is multipart rather than JSON.
        let form = draft
            .iter()
            .fold(Form::new().text("program_id", program_id.to_string()), |form, (k, v)| {
                form.text(k.clone(), v.clone())
            });
        let response: SubmitFormResponse = self
            .send_json(
                self.post("/applicant/submit-form", Some(token)).multipart(form),
                "Failed to save application form",
            )
            .await?;
        Ok(response.form_id)
    }

    async fn upload_document(
        &self,
        token: &str,
        form_id: i64,
        document_type: &str,
        file: &PendingFile,
    ) -> Result<UploadedDocument, ApiError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.filename.clone())
            .mime_str(&file.content_type)?;
        let form = Form::new()
            .part("file", part)
            .text("form_id", form_id.to_string())
            .text("document_type", document_type.to_string());

        let mut document: UploadedDocument = self
            .send_json(
                self.post("/applicant/upload-document", Some(token)).multipart(form),
                "Upload failed",
            )
            .await?;
        // The upload response omits the type and filename; fill them from the request.
        if document.document_type.is_empty() {
            document.document_type = document_type.to_string();
        }
        if document.original_filename.is_empty() {
            document.original_filename = file.filename.clone();
        }
        Ok(document)
    }

    async fn submit_application(&self, token: &str, applicant_id: i64) -> Result<(), ApiError> {
        let body = json!({ "applicant_id": applicant_id });
        let _: serde_json::Value = self
            .send_json(
                self.post("/applicant/submit-application", Some(token)).json(&body),
                GENERIC_FAILURE,
            )
            .await?;
        Ok(())
    }
}
