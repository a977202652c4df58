use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// The backend stores booleans as TINYINT columns, so flags arrive either as
/// JSON booleans or as 0/1 integers depending on the endpoint.
fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Null(()),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
        Flag::Null(()) => false,
    })
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Applicant,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Applicant identity and progress as reported by the backend.
///
/// The login response carries only a subset of these fields, hence the
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicantStatus {
    pub id: i64,
    #[serde(default)]
    pub program_id: Option<i64>,
    #[serde(default)]
    pub program_name: Option<String>,
    #[serde(default = "default_application_status")]
    pub application_status: String,
    #[serde(default = "default_admission_status")]
    pub admission_status: String,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub has_paid_acceptance_fee: bool,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub has_paid_tuition: bool,
    #[serde(default)]
    pub submitted_at: Option<String>,
}

fn default_application_status() -> String {
    "pending".to_string()
}

fn default_admission_status() -> String {
    "not_admitted".to_string()
}

impl ApplicantStatus {
    pub fn has_program(&self) -> bool {
        self.program_id.is_some_and(|id| id > 0)
    }

    pub fn is_admitted(&self) -> bool {
        self.admission_status == "admitted"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
    #[serde(default)]
    pub applicant: Option<ApplicantStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenInfo {
    pub user_id: i64,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
}

// ---------------------------------------------------------------------------
// Programs and form templates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Number,
    Date,
    Select,
    Textarea,
}

impl FieldType {
    /// HTML `<input type>` for single-line inputs.
    pub fn input_type(&self) -> &'static str {
        match self {
            FieldType::Email => "email",
            FieldType::Number => "number",
            FieldType::Date => "date",
            _ => "text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRequirement {
    #[serde(rename = "type")]
    pub document_type: String,
    pub label: String,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormTemplate {
    #[serde(default)]
    pub program: String,
    pub fields: Vec<Field>,
    #[serde(default)]
    pub documents: Vec<DocumentRequirement>,
}

impl FormTemplate {
    pub fn document(&self, document_type: &str) -> Option<&DocumentRequirement> {
        self.documents.iter().find(|d| d.document_type == document_type)
    }
}

/// Successful response of `POST /applicant/upload-document`, also the shape of
/// documents listed with a saved form or an application record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedDocument {
    #[serde(default, alias = "document_id")]
    pub id: Option<i64>,
    #[serde(default)]
    pub document_type: String,
    #[serde(default)]
    pub original_filename: String,
    #[serde(default, alias = "file_size")]
    pub original_size: u64,
    #[serde(default)]
    pub compressed_size: Option<u64>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub is_compressed: bool,
}

impl UploadedDocument {
    pub fn original_kb(&self) -> String {
        format!("{:.2}", self.original_size as f64 / 1024.0)
    }

    pub fn compressed_kb(&self) -> Option<String> {
        match (self.is_compressed, self.compressed_size) {
            (true, Some(size)) => Some(format!("{:.2}", size as f64 / 1024.0)),
            _ => None,
        }
    }
}

/// A saved application form row. Besides `id`, the backend returns one
/// column per template field plus bookkeeping columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedForm {
    pub id: i64,
    #[serde(flatten)]
    pub values: BTreeMap<String, serde_json::Value>,
}

impl SavedForm {
    /// The stored value of `field` rendered as a string, if present and
    /// non-empty.
    pub fn value(&self, field: &str) -> Option<String> {
        match self.values.get(field)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// A file selected locally for one document requirement, not yet uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PendingFile {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SavedApplication {
    #[serde(default)]
    pub form: Option<SavedForm>,
    #[serde(default)]
    pub documents: Vec<UploadedDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitFormResponse {
    pub form_id: i64,
}

// ---------------------------------------------------------------------------
// Admin review
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Submitted,
    UnderReview,
    Accepted,
    Rejected,
    Recommended,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Submitted,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
        ApplicationStatus::Recommended,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Recommended => "recommended",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

/// Row of `GET /admin/applications`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSummary {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub program_id: Option<i64>,
    #[serde(default)]
    pub program_name: Option<String>,
    pub application_status: ApplicationStatus,
    #[serde(default)]
    pub admission_status: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationList {
    #[serde(default)]
    pub applications: Vec<ApplicationSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    #[serde(default)]
    pub reviewed_by_name: Option<String>,
    #[serde(default)]
    pub review_notes: Option<String>,
    pub recommendation: String,
    #[serde(default)]
    pub recommended_program_id: Option<i64>,
    #[serde(default)]
    pub recommended_program: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<String>,
}

/// Server-owned application aggregate shown on the admin detail page.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationRecord {
    pub applicant: ApplicationSummary,
    #[serde(default)]
    pub form: Option<SavedForm>,
    #[serde(default)]
    pub documents: Vec<UploadedDocument>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Accept,
    Reject,
    RecommendOtherProgram,
}

impl Recommendation {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "accept" => Some(Recommendation::Accept),
            "reject" => Some(Recommendation::Reject),
            "recommend_other_program" => Some(Recommendation::RecommendOtherProgram),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewRequest {
    pub applicant_id: i64,
    pub recommendation: Recommendation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_program_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewResponse {
    #[serde(default)]
    pub review_id: Option<i64>,
    #[serde(default)]
    pub new_status: Option<ApplicationStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusCount {
    pub application_status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgramCount {
    #[serde(default)]
    pub name: Option<String>,
    pub count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Statistics {
    #[serde(default)]
    pub total_applications: i64,
    #[serde(default)]
    pub total_admitted: i64,
    #[serde(default)]
    pub by_status: Vec<StatusCount>,
    #[serde(default)]
    pub by_program: Vec<ProgramCount>,
}

// ---------------------------------------------------------------------------
// Letters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionLetterData {
    pub candidate_name: String,
    pub programme: String,
    pub level: String,
    pub department: String,
    pub faculty: String,
    pub session: String,
    pub mode: String,
    pub date: String,
    pub resumption_date: String,
    pub acceptance_fee: String,
    pub tuition: String,
    pub other_fees: String,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterTemplate {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Str(String),
        Num(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Str(s) => s,
        Id::Num(n) => n.to_string(),
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct LetterTemplateList {
    #[serde(default)]
    pub templates: Vec<LetterTemplate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchLetterRequest {
    pub applicant_ids: Vec<i64>,
    pub admission_date: String,
    pub template_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewLetterRequest {
    pub applicant_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admission_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedLetter {
    pub applicant_id: i64,
    pub letter_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedLetter {
    pub applicant_id: i64,
    pub error: String,
}

/// Per-applicant outcome of a batch letter run, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendResult {
    pub total_requested: usize,
    pub letters_created: usize,
    pub errors: usize,
    #[serde(default)]
    pub created: Vec<CreatedLetter>,
    #[serde(default)]
    pub failed: Vec<FailedLetter>,
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    AcceptanceFee,
    Tuition,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::AcceptanceFee => "acceptance_fee",
            PaymentType::Tuition => "tuition",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "acceptance_fee" => Some(PaymentType::AcceptanceFee),
            "tuition" => Some(PaymentType::Tuition),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentType::AcceptanceFee => "Acceptance Fee",
            PaymentType::Tuition => "Tuition",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRequest {
    pub payment_type: PaymentType,
    pub amount: f64,
    pub payment_method: String,
    pub reference_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub transaction_id: String,
    pub transaction_db_id: i64,
    #[serde(default)]
    pub applicant_id: Option<i64>,
    pub payment_type: PaymentType,
    pub amount: f64,
    pub status: String,
    #[serde(default)]
    pub completed_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentTransaction {
    pub transaction_id: i64,
    pub payment_type: String,
    pub amount: f64,
    pub status: String,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub reference_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentHistory {
    #[serde(default)]
    pub payment_history: Vec<PaymentTransaction>,
    #[serde(default)]
    pub total_payments: i64,
}
