//! Client-side workflows layered over the backend API: the application form
//! state machine, admin review, admission letters and fee payment.

pub mod application;
pub mod letters;
pub mod payment;
pub mod review;

use std::fmt;

use crate::api::ApiError;
use crate::api::types::PaymentType;

pub use application::{ApplicationForm, FormState, SaveOutcome, UploadReport, MAX_UPLOAD_BYTES};

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowError {
    MissingFields(Vec<String>),
    MissingDocuments(Vec<String>),
    NotSaved,
    FileTooLarge { document_type: String },
    AlreadyUploaded { document_type: String },
    UnknownDocument { document_type: String },
    AlreadySubmitted,
    /// An upload in the save pipeline failed. The form itself was saved.
    Upload {
        document_type: String,
        source: ApiError,
        report: UploadReport,
    },
    InvalidRecommendation,
    ProgramRequired,
    SameProgram,
    NoApplicantsSelected,
    NotAdmitted,
    AcceptanceFeeFirst,
    AlreadyPaid(PaymentType),
    FeeUnavailable(PaymentType),
    Backend(ApiError),
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowError::MissingFields(labels) => write!(f, "Please fill in: {}", labels.join(", ")),
            WorkflowError::MissingDocuments(labels) => write!(f, "Please upload: {}", labels.join(", ")),
            WorkflowError::NotSaved => write!(f, "Please save your form first"),
            WorkflowError::FileTooLarge { document_type } => {
                write!(f, "File size exceeds 15MB limit for {document_type}")
            }
            WorkflowError::AlreadyUploaded { document_type } => {
                write!(f, "A document has already been uploaded for {document_type}")
            }
            WorkflowError::UnknownDocument { document_type } => {
                write!(f, "Unknown document type: {document_type}")
            }
            WorkflowError::AlreadySubmitted => write!(f, "Application has already been submitted"),
            WorkflowError::Upload { source, .. } => write!(f, "{source}"),
            WorkflowError::InvalidRecommendation => write!(f, "Invalid recommendation"),
            WorkflowError::ProgramRequired => write!(f, "Please select a program to recommend"),
            WorkflowError::SameProgram => {
                write!(f, "Recommended program must differ from the applicant's current program")
            }
            WorkflowError::NoApplicantsSelected => write!(f, "Please select at least one applicant"),
            WorkflowError::NotAdmitted => write!(f, "Admission letter not available"),
            WorkflowError::AcceptanceFeeFirst => {
                write!(f, "You must pay the acceptance fee first before paying tuition.")
            }
            WorkflowError::AlreadyPaid(kind) => write!(f, "{} has already been paid", kind.label()),
            WorkflowError::FeeUnavailable(kind) => {
                write!(f, "{} amount is not available", kind.label())
            }
            WorkflowError::Backend(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for WorkflowError {}

impl From<ApiError> for WorkflowError {
    fn from(e: ApiError) -> Self {
        WorkflowError::Backend(e)
    }
}
