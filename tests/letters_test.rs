//! Admission letter tests: batch dispatch, previews and applicant access.

mod common;

use admissions_portal::api::types::{CreatedLetter, FailedLetter, SendResult};
use admissions_portal::workflow::WorkflowError;
use admissions_portal::workflow::letters::{
    DEFAULT_TEMPLATE_ID, applicant_letter, applicant_letter_pdf, default_admission_date,
    preview_letter, send_batch,
};
use common::*;

// ---------------------------------------------------------------------------
// Batch dispatch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_batch_reports_partial_success() {
    let api = FakeBackend::with(|s| {
        s.send_result = Some(SendResult {
            total_requested: 3,
            letters_created: 2,
            errors: 1,
            created: vec![
                CreatedLetter { applicant_id: 1, letter_id: 11 },
                CreatedLetter { applicant_id: 2, letter_id: 12 },
            ],
            failed: vec![FailedLetter {
                applicant_id: 3,
                error: "Applicant has no program".to_string(),
            }],
        });
    });

    let result = send_batch(&api, TOKEN, &[1, 2, 3], "2025-10-10", "2")
        .await
        .expect("send");

    assert_eq!(result.letters_created, 2);
    assert_eq!(result.failed.len(), 1);
    assert_eq!(result.failed[0].applicant_id, 3);

    let batches = api.state().batches.clone();
    assert_eq!(batches[0].applicant_ids, vec![1, 2, 3]);
    assert_eq!(batches[0].admission_date, "2025-10-10");
    assert_eq!(batches[0].template_id, "2");
}

#[tokio::test]
async fn test_batch_defaults_template_and_date() {
    let api = FakeBackend::new();

    send_batch(&api, TOKEN, &[4], "", " ").await.expect("send");

    let batch = api.state().batches[0].clone();
    assert_eq!(batch.template_id, DEFAULT_TEMPLATE_ID);
    assert_eq!(batch.admission_date, default_admission_date());
}

#[tokio::test]
async fn test_batch_deduplicates_ids() {
    let api = FakeBackend::new();

    let result = send_batch(&api, TOKEN, &[5, 6, 5], "2025-10-10", "1")
        .await
        .expect("send");

    assert_eq!(api.state().batches[0].applicant_ids, vec![5, 6]);
    assert_eq!(result.total_requested, 2);
}

#[tokio::test]
async fn test_empty_selection_makes_no_call() {
    let api = FakeBackend::new();

    let err = send_batch(&api, TOKEN, &[], "2025-10-10", "1").await.unwrap_err();
    assert_eq!(err, WorkflowError::NoApplicantsSelected);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_batch_backend_failure_surfaces() {
    let api = FakeBackend::new();
    api.fail("send_batch_letters", 500, "Letter service unavailable");

    let err = send_batch(&api, TOKEN, &[1], "2025-10-10", "1").await.unwrap_err();
    assert_eq!(err.to_string(), "Letter service unavailable");
}

// ---------------------------------------------------------------------------
// Preview
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_preview_omits_blank_options() {
    let api = FakeBackend::new();

    let pdf = preview_letter(&api, TOKEN, 5, Some(""), None).await.expect("preview");
    assert!(pdf.starts_with(b"%PDF"));

    let request = api.state().previews[0].clone();
    assert_eq!(request.applicant_id, 5);
    assert_eq!(request.admission_date, None);
    assert_eq!(request.template_id, None);
}

#[tokio::test]
async fn test_preview_forwards_date_and_template() {
    let api = FakeBackend::new();

    preview_letter(&api, TOKEN, 5, Some("2025-12-01"), Some("3"))
        .await
        .expect("preview");

    let request = api.state().previews[0].clone();
    assert_eq!(request.admission_date.as_deref(), Some("2025-12-01"));
    assert_eq!(request.template_id.as_deref(), Some("3"));
}

// ---------------------------------------------------------------------------
// Applicant access
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_letter_requires_admission() {
    let api = FakeBackend::new();
    let status = applicant_status(Some(1));

    let err = applicant_letter(&api, TOKEN, &status).await.unwrap_err();
    assert_eq!(err, WorkflowError::NotAdmitted);
    let err = applicant_letter_pdf(&api, TOKEN, &status).await.unwrap_err();
    assert_eq!(err, WorkflowError::NotAdmitted);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_admitted_applicant_gets_letter() {
    let api = FakeBackend::new();
    let status = admitted_status();

    let letter = applicant_letter(&api, TOKEN, &status).await.expect("letter");
    assert_eq!(letter.reference, "ADM/2025/007");

    let pdf = applicant_letter_pdf(&api, TOKEN, &status).await.expect("pdf");
    assert!(pdf.starts_with(b"%PDF"));
}
