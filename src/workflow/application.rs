//! The application form state machine.
//!
//! ```text
//! Unsaved --save--> Saved(form_id) --submit--> Submitting(form_id) --ok--> Submitted(form_id)
//!                     ^    |                         |
//!                     +----+ save                    +--error--> Saved(form_id)
//! ```
//!
//! Saving persists the whole draft and then runs the upload pipeline: pending
//! file selections for document types that have no upload yet are sent one
//! at a time in template order, stopping at the first failure.

use std::collections::{BTreeMap, HashSet};

use crate::api::ApiError;
use crate::api::ApplicationApi;
use crate::api::types::{FormTemplate, PendingFile, SavedApplication, UploadedDocument};

use super::WorkflowError;

/// Largest accepted document: 15 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 15 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Unsaved,
    Saved(i64),
    Submitting(i64),
    Submitted(i64),
}

impl FormState {
    pub fn form_id(&self) -> Option<i64> {
        match self {
            FormState::Unsaved => None,
            FormState::Saved(id) | FormState::Submitting(id) | FormState::Submitted(id) => Some(*id),
        }
    }
}

/// What the upload pipeline did during one save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadReport {
    /// Document types uploaded by this run, in order.
    pub committed: Vec<String>,
    /// The first failing type and its error.
    pub failed: Option<(String, ApiError)>,
    /// Types not attempted because an earlier upload failed.
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub form_id: i64,
    pub uploads: UploadReport,
}

pub struct ApplicationForm {
    template: FormTemplate,
    program_id: i64,
    applicant_id: i64,
    draft: BTreeMap<String, String>,
    pending: BTreeMap<String, PendingFile>,
    uploaded: BTreeMap<String, UploadedDocument>,
    state: FormState,
}

impl ApplicationForm {
    pub fn new(template: FormTemplate, program_id: i64, applicant_id: i64) -> Self {
        Self {
            template,
            program_id,
            applicant_id,
            draft: BTreeMap::new(),
            pending: BTreeMap::new(),
            uploaded: BTreeMap::new(),
            state: FormState::Unsaved,
        }
    }

    /// Load a previously saved form and its documents.
    ///
    /// Only fields named by the template are copied into the draft.
    pub fn hydrate(&mut self, saved: SavedApplication) {
        if let Some(form) = saved.form {
            for field in &self.template.fields {
                if let Some(value) = form.value(&field.name) {
                    self.draft.insert(field.name.clone(), value);
                }
            }
            if self.state == FormState::Unsaved {
                self.state = FormState::Saved(form.id);
            }
        }
        for doc in saved.documents {
            self.uploaded.insert(doc.document_type.clone(), doc);
        }
    }

    /// Adopt a submission the backend already reports. Only a saved form can
    /// have been submitted.
    pub fn mark_submitted(&mut self) {
        if let FormState::Saved(id) = self.state {
            self.state = FormState::Submitted(id);
        }
    }

    /// Record an edit. Names outside the template are ignored.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        if !self.template.fields.iter().any(|f| f.name == name) {
            return false;
        }
        self.draft.insert(name.to_string(), value.into());
        true
    }

    /// Accept a file into the pending set for `document_type`.
    pub fn select_file(&mut self, document_type: &str, file: PendingFile) -> Result<(), WorkflowError> {
        if file.size() > MAX_UPLOAD_BYTES {
            return Err(WorkflowError::FileTooLarge {
                document_type: document_type.to_string(),
            });
        }
        if self.template.document(document_type).is_none() {
            return Err(WorkflowError::UnknownDocument {
                document_type: document_type.to_string(),
            });
        }
        if self.uploaded.contains_key(document_type) {
            return Err(WorkflowError::AlreadyUploaded {
                document_type: document_type.to_string(),
            });
        }
        self.pending.insert(document_type.to_string(), file);
        Ok(())
    }

    /// Labels of required fields without a value, in template order.
    pub fn missing_fields(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.template
            .fields
            .iter()
            .filter(|f| f.required && seen.insert(f.name.as_str()))
            .filter(|f| self.draft.get(&f.name).is_none_or(|v| v.is_empty()))
            .map(|f| f.label.clone())
            .collect()
    }

    /// Labels of required documents without an upload, in template order.
    pub fn missing_documents(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.template
            .documents
            .iter()
            .filter(|d| d.required && seen.insert(d.document_type.as_str()))
            .filter(|d| !self.uploaded.contains_key(&d.document_type))
            .map(|d| d.label.clone())
            .collect()
    }

    pub async fn save<A: ApplicationApi + ?Sized>(
        &mut self,
        api: &A,
        token: &str,
    ) -> Result<SaveOutcome, WorkflowError> {
        if matches!(self.state, FormState::Submitting(_) | FormState::Submitted(_)) {
            return Err(WorkflowError::AlreadySubmitted);
        }

        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(WorkflowError::MissingFields(missing));
        }

        let returned_id = api.submit_form(token, self.program_id, &self.draft).await?;
        // The first id assigned to this form sticks.
        let form_id = self.state.form_id().unwrap_or(returned_id);
        self.state = FormState::Saved(form_id);

        let report = self.upload_pending(api, token, form_id).await;
        match report.failed.clone() {
            Some((document_type, source)) => Err(WorkflowError::Upload {
                document_type,
                source,
                report,
            }),
            None => Ok(SaveOutcome { form_id, uploads: report }),
        }
    }

    /// Upload pending files one by one; the first failure stops the run.
    async fn upload_pending<A: ApplicationApi + ?Sized>(
        &mut self,
        api: &A,
        token: &str,
        form_id: i64,
    ) -> UploadReport {
        let mut report = UploadReport::default();
        let queue: Vec<String> = self
            .template
            .documents
            .iter()
            .map(|d| d.document_type.clone())
            .filter(|t| self.pending.contains_key(t) && !self.uploaded.contains_key(t))
            .collect();

        for document_type in queue {
            if report.failed.is_some() {
                report.skipped.push(document_type);
                continue;
            }
            let Some(file) = self.pending.get(&document_type) else {
                continue;
            };
            match api.upload_document(token, form_id, &document_type, file).await {
                Ok(document) => {
                    log::info!("Uploaded {document_type} for form {form_id}");
                    self.pending.remove(&document_type);
                    self.uploaded.insert(document_type.clone(), document);
                    report.committed.push(document_type);
                }
                Err(e) => {
                    log::warn!("Upload of {document_type} for form {form_id} failed: {e}");
                    report.failed = Some((document_type, e));
                }
            }
        }
        report
    }

    /// Submit the saved application for review.
    pub async fn submit<A: ApplicationApi + ?Sized>(
        &mut self,
        api: &A,
        token: &str,
    ) -> Result<(), WorkflowError> {
        let form_id = match self.state {
            FormState::Unsaved => return Err(WorkflowError::NotSaved),
            FormState::Saved(id) => id,
            FormState::Submitting(_) | FormState::Submitted(_) => {
                return Err(WorkflowError::AlreadySubmitted);
            }
        };

        let missing = self.missing_documents();
        if !missing.is_empty() {
            return Err(WorkflowError::MissingDocuments(missing));
        }

        self.state = FormState::Submitting(form_id);
        match api.submit_application(token, self.applicant_id).await {
            Ok(()) => {
                self.state = FormState::Submitted(form_id);
                Ok(())
            }
            Err(e) => {
                self.state = FormState::Saved(form_id);
                Err(e.into())
            }
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn form_id(&self) -> Option<i64> {
        self.state.form_id()
    }

    pub fn template(&self) -> &FormTemplate {
        &self.template
    }

    pub fn draft(&self) -> &BTreeMap<String, String> {
        &self.draft
    }

    pub fn value(&self, field: &str) -> &str {
        self.draft.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn uploaded(&self, document_type: &str) -> Option<&UploadedDocument> {
        self.uploaded.get(document_type)
    }

    pub fn is_pending(&self, document_type: &str) -> bool {
        self.pending.contains_key(document_type)
    }

    pub fn can_submit(&self) -> bool {
        matches!(self.state, FormState::Saved(_)) && self.missing_documents().is_empty()
    }
}
