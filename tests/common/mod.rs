//! Shared test infrastructure.
//!
//! `FakeBackend` implements every backend trait in memory. It records each
//! call by name, keeps the requests it was sent, and can be told to fail any
//! operation with a given status and message.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use async_trait::async_trait;

use admissions_portal::api::types::*;
use admissions_portal::api::{
    ApiError, ApplicationApi, AuthApi, LetterApi, PaymentApi, ProgramApi, ReviewApi,
};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const TOKEN: &str = "test-token";
pub const APPLICANT_EMAIL: &str = "ada@gmail.com";
pub const ADMIN_EMAIL: &str = "admin@gmail.com";
pub const PASSWORD: &str = "secret123";

// ============================================================================
// FAKE BACKEND
// ============================================================================

pub struct FakeState {
    pub programs: Vec<Program>,
    pub template: FormTemplate,
    pub saved: SavedApplication,
    pub next_form_id: i64,
    pub status: ApplicantStatus,
    pub login: Option<AuthResponse>,
    pub token_role: Role,
    pub letter: AdmissionLetterData,
    pub send_result: Option<SendResult>,
    pub record: Option<ApplicationRecord>,
    pub applications: Vec<ApplicationSummary>,
    pub history: Vec<PaymentTransaction>,

    pub drafts: Vec<BTreeMap<String, String>>,
    pub uploads: Vec<(i64, String, String)>,
    pub reviews: Vec<ReviewRequest>,
    pub batches: Vec<BatchLetterRequest>,
    pub previews: Vec<PreviewLetterRequest>,
    pub payments: Vec<PaymentRequest>,
    pub queries: Vec<(ApplicationStatus, Option<i64>)>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            programs: programs(),
            template: sample_template(),
            saved: SavedApplication::default(),
            next_form_id: 12,
            status: applicant_status(Some(1)),
            login: None,
            token_role: Role::Applicant,
            letter: letter_data(),
            send_result: None,
            record: None,
            applications: Vec::new(),
            history: Vec::new(),
            drafts: Vec::new(),
            uploads: Vec::new(),
            reviews: Vec::new(),
            batches: Vec::new(),
            previews: Vec::new(),
            payments: Vec::new(),
            queries: Vec::new(),
        }
    }
}

#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<String, ApiError>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(setup: impl FnOnce(&mut FakeState)) -> Self {
        let backend = Self::default();
        setup(&mut backend.state());
        backend
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Operation names in call order. Uploads are `upload_document:<type>`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, op: &str) -> bool {
        self.calls().iter().any(|c| c == op)
    }

    pub fn fail(&self, op: &str, status: u16, message: &str) {
        self.failures.lock().unwrap().insert(
            op.to_string(),
            ApiError::Status {
                status,
                message: message.to_string(),
            },
        );
    }

    pub fn succeed(&self, op: &str) {
        self.failures.lock().unwrap().remove(op);
    }

    fn call(&self, op: impl Into<String>) -> Result<(), ApiError> {
        let op = op.into();
        self.calls.lock().unwrap().push(op.clone());
        match self.failures.lock().unwrap().get(&op) {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AuthApi for FakeBackend {
    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError> {
        self.call("signup")?;
        Ok(AuthResponse {
            token: TOKEN.to_string(),
            user: User {
                id: 2,
                name: request.name.clone(),
                email: request.email.clone(),
                role: Role::Applicant,
            },
            applicant: Some(applicant_status(None)),
        })
    }

    async fn login(&self, _email: &str, _password: &str) -> Result<AuthResponse, ApiError> {
        self.call("login")?;
        self.state().login.clone().ok_or(ApiError::Status {
            status: 401,
            message: "Invalid credentials".to_string(),
        })
    }

    async fn verify_token(&self, _token: &str) -> Result<TokenInfo, ApiError> {
        self.call("verify_token")?;
        Ok(TokenInfo {
            user_id: 1,
            role: self.state().token_role,
        })
    }

    async fn logout(&self, _token: &str) -> Result<(), ApiError> {
        self.call("logout")
    }

    async fn applicant_status(&self, _token: &str) -> Result<ApplicantStatus, ApiError> {
        self.call("applicant_status")?;
        Ok(self.state().status.clone())
    }
}

#[async_trait]
impl ProgramApi for FakeBackend {
    async fn programs(&self) -> Result<Vec<Program>, ApiError> {
        self.call("programs")?;
        Ok(self.state().programs.clone())
    }

    async fn select_program(&self, _token: &str, program_id: i64) -> Result<(), ApiError> {
        self.call("select_program")?;
        let mut state = self.state();
        let name = state
            .programs
            .iter()
            .find(|p| p.id == program_id)
            .map(|p| p.name.clone());
        state.status.program_id = Some(program_id);
        state.status.program_name = name;
        Ok(())
    }
}

#[async_trait]
impl ApplicationApi for FakeBackend {
    async fn form_template(&self, _token: &str, _program_id: i64) -> Result<FormTemplate, ApiError> {
        self.call("form_template")?;
        Ok(self.state().template.clone())
    }

    async fn saved_application(
        &self,
        _token: &str,
        _applicant_id: i64,
    ) -> Result<SavedApplication, ApiError> {
        self.call("saved_application")?;
        Ok(self.state().saved.clone())
    }

    async fn submit_form(
        &self,
        _token: &str,
        _program_id: i64,
        draft: &BTreeMap<String, String>,
    ) -> Result<i64, ApiError> {
        self.call("submit_form")?;
        let mut state = self.state();
        state.drafts.push(draft.clone());
        let id = state.next_form_id;
        state.next_form_id += 1;
        Ok(id)
    }

    async fn upload_document(
        &self,
        _token: &str,
        form_id: i64,
        document_type: &str,
        file: &PendingFile,
    ) -> Result<UploadedDocument, ApiError> {
        self.call(format!("upload_document:{document_type}"))?;
        let mut state = self.state();
        state
            .uploads
            .push((form_id, document_type.to_string(), file.filename.clone()));
        Ok(UploadedDocument {
            id: Some(state.uploads.len() as i64),
            document_type: document_type.to_string(),
            original_filename: file.filename.clone(),
            original_size: file.size(),
            compressed_size: None,
            is_compressed: false,
        })
    }

    async fn submit_application(&self, _token: &str, _applicant_id: i64) -> Result<(), ApiError> {
        self.call("submit_application")?;
        self.state().status.application_status = "submitted".to_string();
        Ok(())
    }
}

#[async_trait]
impl ReviewApi for FakeBackend {
    async fn applications(
        &self,
        _token: &str,
        status: ApplicationStatus,
        program_id: Option<i64>,
    ) -> Result<Vec<ApplicationSummary>, ApiError> {
        self.call("applications")?;
        let mut state = self.state();
        state.queries.push((status, program_id));
        Ok(state
            .applications
            .iter()
            .filter(|a| a.application_status == status)
            .filter(|a| program_id.is_none() || a.program_id == program_id)
            .cloned()
            .collect())
    }

    async fn application_detail(
        &self,
        _token: &str,
        _applicant_id: i64,
    ) -> Result<ApplicationRecord, ApiError> {
        self.call("application_detail")?;
        self.state().record.clone().ok_or(ApiError::Status {
            status: 404,
            message: "Application not found".to_string(),
        })
    }

    async fn review_application(
        &self,
        _token: &str,
        request: &ReviewRequest,
    ) -> Result<ReviewResponse, ApiError> {
        self.call("review_application")?;
        let mut state = self.state();
        state.reviews.push(request.clone());
        let new_status = match request.recommendation {
            Recommendation::Accept => ApplicationStatus::Accepted,
            Recommendation::Reject => ApplicationStatus::Rejected,
            Recommendation::RecommendOtherProgram => ApplicationStatus::Recommended,
        };
        let review_id = state.reviews.len() as i64;
        if let Some(record) = state.record.as_mut() {
            record.applicant.application_status = new_status;
            record.reviews.push(Review {
                id: review_id,
                reviewed_by_name: Some("Admin".to_string()),
                review_notes: request.review_notes.clone(),
                recommendation: format!("{:?}", request.recommendation).to_lowercase(),
                recommended_program_id: request.recommended_program_id,
                recommended_program: None,
                reviewed_at: None,
            });
        }
        Ok(ReviewResponse {
            review_id: Some(review_id),
            new_status: Some(new_status),
        })
    }

    async fn statistics(&self, _token: &str) -> Result<Statistics, ApiError> {
        self.call("statistics")?;
        Ok(Statistics {
            total_applications: 3,
            total_admitted: 1,
            by_status: vec![StatusCount {
                application_status: "submitted".to_string(),
                count: 3,
            }],
            by_program: vec![ProgramCount {
                name: Some("Computer Science".to_string()),
                count: 3,
            }],
        })
    }
}

#[async_trait]
impl LetterApi for FakeBackend {
    async fn admission_letter(&self, _token: &str) -> Result<AdmissionLetterData, ApiError> {
        self.call("admission_letter")?;
        Ok(self.state().letter.clone())
    }

    async fn print_admission_letter(&self, _token: &str) -> Result<Vec<u8>, ApiError> {
        self.call("print_admission_letter")?;
        Ok(b"%PDF-1.4 letter".to_vec())
    }

    async fn preview_admission_letter(
        &self,
        _token: &str,
        request: &PreviewLetterRequest,
    ) -> Result<Vec<u8>, ApiError> {
        self.call("preview_admission_letter")?;
        self.state().previews.push(request.clone());
        Ok(b"%PDF-1.4 preview".to_vec())
    }

    async fn send_batch_letters(
        &self,
        _token: &str,
        request: &BatchLetterRequest,
    ) -> Result<SendResult, ApiError> {
        self.call("send_batch_letters")?;
        let mut state = self.state();
        state.batches.push(request.clone());
        Ok(state.send_result.clone().unwrap_or_else(|| SendResult {
            total_requested: request.applicant_ids.len(),
            letters_created: request.applicant_ids.len(),
            errors: 0,
            created: request
                .applicant_ids
                .iter()
                .map(|id| CreatedLetter {
                    applicant_id: *id,
                    letter_id: 100 + id,
                })
                .collect(),
            failed: Vec::new(),
        }))
    }

    async fn letter_templates(&self, _token: &str) -> Result<Vec<LetterTemplate>, ApiError> {
        self.call("letter_templates")?;
        Ok(vec![LetterTemplate {
            id: "1".to_string(),
            name: "Default".to_string(),
            description: None,
            mode: Some("full_time".to_string()),
        }])
    }

    async fn letter_template(&self, token: &str, template_id: &str) -> Result<LetterTemplate, ApiError> {
        self.letter_templates(token)
            .await?
            .into_iter()
            .find(|t| t.id == template_id)
            .ok_or(ApiError::Status {
                status: 404,
                message: "Template not found".to_string(),
            })
    }
}

#[async_trait]
impl PaymentApi for FakeBackend {
    async fn process_payment(
        &self,
        _token: &str,
        request: &PaymentRequest,
    ) -> Result<PaymentResponse, ApiError> {
        self.call("process_payment")?;
        let mut state = self.state();
        state.payments.push(request.clone());
        match request.payment_type {
            PaymentType::AcceptanceFee => state.status.has_paid_acceptance_fee = true,
            PaymentType::Tuition => state.status.has_paid_tuition = true,
        }
        Ok(PaymentResponse {
            message: Some("Payment processed successfully".to_string()),
            transaction_id: request.reference_id.clone(),
            transaction_db_id: state.payments.len() as i64,
            applicant_id: Some(state.status.id),
            payment_type: request.payment_type,
            amount: request.amount,
            status: "completed".to_string(),
            completed_at: None,
        })
    }

    async fn payment_history(&self, _token: &str) -> Result<PaymentHistory, ApiError> {
        self.call("payment_history")?;
        let history = self.state().history.clone();
        Ok(PaymentHistory {
            total_payments: history.len() as i64,
            payment_history: history,
        })
    }

    async fn payment_receipt(&self, _token: &str, transaction_id: i64) -> Result<Vec<u8>, ApiError> {
        self.call(format!("payment_receipt:{transaction_id}"))?;
        Ok(b"%PDF-1.4 receipt".to_vec())
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub fn programs() -> Vec<Program> {
    vec![
        Program {
            id: 1,
            name: "Computer Science".to_string(),
            description: Some("B.Sc. Computer Science".to_string()),
        },
        Program {
            id: 2,
            name: "Mathematics".to_string(),
            description: None,
        },
        Program {
            id: 3,
            name: "Physics".to_string(),
            description: None,
        },
    ]
}

pub fn field(name: &str, label: &str, field_type: FieldType, required: bool) -> Field {
    Field {
        name: name.to_string(),
        field_type,
        label: label.to_string(),
        required,
        options: Vec::new(),
    }
}

pub fn document(document_type: &str, label: &str, required: bool) -> DocumentRequirement {
    DocumentRequirement {
        document_type: document_type.to_string(),
        label: label.to_string(),
        required,
    }
}

/// Required `name` and `email` fields plus a required transcript.
pub fn sample_template() -> FormTemplate {
    FormTemplate {
        program: "Computer Science".to_string(),
        fields: vec![
            field("name", "Name", FieldType::Text, true),
            field("email", "Email", FieldType::Email, true),
            field("hobbies", "Hobbies", FieldType::Textarea, false),
        ],
        documents: vec![document("transcript", "Transcript", true)],
    }
}

pub fn pdf_file(name: &str, size: usize) -> PendingFile {
    PendingFile::new(name, "application/pdf", vec![b'x'; size])
}

pub fn applicant_user() -> User {
    User {
        id: 1,
        name: "Ada Obi".to_string(),
        email: APPLICANT_EMAIL.to_string(),
        role: Role::Applicant,
    }
}

pub fn admin_user() -> User {
    User {
        id: 9,
        name: "Grace Admin".to_string(),
        email: ADMIN_EMAIL.to_string(),
        role: Role::Admin,
    }
}

pub fn applicant_status(program_id: Option<i64>) -> ApplicantStatus {
    ApplicantStatus {
        id: 7,
        program_id,
        program_name: program_id.map(|_| "Computer Science".to_string()),
        application_status: "pending".to_string(),
        admission_status: "not_admitted".to_string(),
        has_paid_acceptance_fee: false,
        has_paid_tuition: false,
        submitted_at: None,
    }
}

pub fn admitted_status() -> ApplicantStatus {
    ApplicantStatus {
        application_status: "accepted".to_string(),
        admission_status: "admitted".to_string(),
        ..applicant_status(Some(1))
    }
}

pub fn auth_response(user: User, applicant: Option<ApplicantStatus>) -> AuthResponse {
    AuthResponse {
        token: TOKEN.to_string(),
        user,
        applicant,
    }
}

pub fn letter_data() -> AdmissionLetterData {
    AdmissionLetterData {
        candidate_name: "Ada Obi".to_string(),
        programme: "Computer Science".to_string(),
        level: "100".to_string(),
        department: "Computer Science".to_string(),
        faculty: "Science".to_string(),
        session: "2025/2026".to_string(),
        mode: "Full Time".to_string(),
        date: "2025-10-10".to_string(),
        resumption_date: "2025-11-03".to_string(),
        acceptance_fee: "₦150,000.00".to_string(),
        tuition: "₦450,000.00".to_string(),
        other_fees: "₦25,000.00".to_string(),
        reference: "ADM/2025/007".to_string(),
    }
}

pub fn summary(id: i64, status: ApplicationStatus, program_id: Option<i64>) -> ApplicationSummary {
    ApplicationSummary {
        id,
        user_id: Some(id + 100),
        name: format!("Applicant {id}"),
        email: format!("applicant{id}@gmail.com"),
        phone_number: Some("08012345678".to_string()),
        program_id,
        program_name: program_id.map(|_| "Computer Science".to_string()),
        application_status: status,
        admission_status: None,
        submitted_at: Some("2025-09-01".to_string()),
    }
}

pub fn record(id: i64, program_id: i64) -> ApplicationRecord {
    let mut values = BTreeMap::new();
    values.insert("id".to_string(), serde_json::json!(5));
    values.insert("applicant_id".to_string(), serde_json::json!(id));
    values.insert("program_id".to_string(), serde_json::json!(program_id));
    values.insert("created_at".to_string(), serde_json::json!("2025-09-01"));
    values.insert("date_of_birth".to_string(), serde_json::json!("2004-02-29"));
    values.insert("state_of_origin".to_string(), serde_json::Value::Null);
    ApplicationRecord {
        applicant: summary(id, ApplicationStatus::Submitted, Some(program_id)),
        form: Some(SavedForm { id: 5, values }),
        documents: Vec::new(),
        reviews: Vec::new(),
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// Cookie session with a fixed key, as configured in `main`.
pub fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::from(&[7u8; 64]))
        .cookie_secure(false)
        .build()
}

/// The CSRF token embedded in a rendered form.
pub fn csrf_from(html: &str) -> String {
    let marker = "name=\"csrf_token\" value=\"";
    let start = html.find(marker).expect("page has a csrf field") + marker.len();
    html[start..start + 64].to_string()
}
