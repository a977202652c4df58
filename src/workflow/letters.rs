use std::collections::HashSet;

use chrono::NaiveDate;

use crate::api::LetterApi;
use crate::api::types::{
    AdmissionLetterData, ApplicantStatus, BatchLetterRequest, PreviewLetterRequest, SendResult,
};

use super::WorkflowError;

pub const DEFAULT_TEMPLATE_ID: &str = "1";

/// Today's date as `YYYY-MM-DD`, the default admission date.
pub fn default_admission_date() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Blank or malformed dates fall back to today.
fn admission_date_or_today(date: &str) -> String {
    match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
        Ok(d) => d.format("%Y-%m-%d").to_string(),
        Err(_) => default_admission_date(),
    }
}

/// Ask the backend to generate letters for `applicant_ids`.
///
/// The backend reports per-applicant success and failure in the returned
/// [`SendResult`]; neither list is dropped here.
pub async fn send_batch<A: LetterApi + ?Sized>(
    api: &A,
    token: &str,
    applicant_ids: &[i64],
    admission_date: &str,
    template_id: &str,
) -> Result<SendResult, WorkflowError> {
    let mut seen = HashSet::new();
    let applicant_ids: Vec<i64> = applicant_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect();
    if applicant_ids.is_empty() {
        return Err(WorkflowError::NoApplicantsSelected);
    }

    let template_id = match template_id.trim() {
        "" => DEFAULT_TEMPLATE_ID.to_string(),
        id => id.to_string(),
    };
    let request = BatchLetterRequest {
        applicant_ids,
        admission_date: admission_date_or_today(admission_date),
        template_id,
    };
    let result = api.send_batch_letters(token, &request).await?;
    log::info!(
        "Batch letters: {} requested, {} created, {} failed",
        result.total_requested,
        result.letters_created,
        result.errors
    );
    Ok(result)
}

/// Letter data for the logged-in applicant, only once admitted.
pub async fn applicant_letter<A: LetterApi + ?Sized>(
    api: &A,
    token: &str,
    status: &ApplicantStatus,
) -> Result<AdmissionLetterData, WorkflowError> {
    if !status.is_admitted() {
        return Err(WorkflowError::NotAdmitted);
    }
    Ok(api.admission_letter(token).await?)
}

/// Printable PDF of the applicant's letter, only once admitted.
pub async fn applicant_letter_pdf<A: LetterApi + ?Sized>(
    api: &A,
    token: &str,
    status: &ApplicantStatus,
) -> Result<Vec<u8>, WorkflowError> {
    if !status.is_admitted() {
        return Err(WorkflowError::NotAdmitted);
    }
    Ok(api.print_admission_letter(token).await?)
}

/// Admin preview of one applicant's letter as PDF.
pub async fn preview_letter<A: LetterApi + ?Sized>(
    api: &A,
    token: &str,
    applicant_id: i64,
    admission_date: Option<&str>,
    template_id: Option<&str>,
) -> Result<Vec<u8>, WorkflowError> {
    let request = PreviewLetterRequest {
        applicant_id,
        admission_date: admission_date
            .filter(|d| !d.trim().is_empty())
            .map(admission_date_or_today),
        template_id: template_id
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from),
    };
    Ok(api.preview_admission_letter(token, &request).await?)
}
