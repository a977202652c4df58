use serde::Deserialize;

use crate::api::{ApiError, ReviewApi};
use crate::api::types::{
    ApplicationRecord, ApplicationStatus, ApplicationSummary, Program, Recommendation,
    ReviewRequest, SavedForm,
};

use super::WorkflowError;

/// Form columns that are bookkeeping rather than applicant answers.
pub const HIDDEN_FORM_COLUMNS: [&str; 5] =
    ["id", "applicant_id", "program_id", "created_at", "updated_at"];

/// List filter for the admin applications page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub status: ApplicationStatus,
    pub program_id: Option<i64>,
}

impl Default for ApplicationFilter {
    fn default() -> Self {
        Self {
            status: ApplicationStatus::Submitted,
            program_id: None,
        }
    }
}

impl ApplicationFilter {
    /// Unknown or missing values fall back to the defaults.
    pub fn from_query(status: Option<&str>, program_id: Option<&str>) -> Self {
        Self {
            status: status
                .and_then(ApplicationStatus::parse)
                .unwrap_or(ApplicationStatus::Submitted),
            program_id: program_id.and_then(|p| p.trim().parse().ok()).filter(|id| *id > 0),
        }
    }

    pub async fn fetch<A: ReviewApi + ?Sized>(
        &self,
        api: &A,
        token: &str,
    ) -> Result<Vec<ApplicationSummary>, WorkflowError> {
        Ok(api.applications(token, self.status, self.program_id).await?)
    }
}

/// The review form as posted by the admin.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReviewForm {
    pub recommendation: String,
    #[serde(default)]
    pub review_notes: String,
    #[serde(default)]
    pub recommended_program_id: String,
}

impl Default for ReviewForm {
    fn default() -> Self {
        Self {
            recommendation: "accept".to_string(),
            review_notes: String::new(),
            recommended_program_id: String::new(),
        }
    }
}

impl ReviewForm {
    /// Turn the posted form into a backend request.
    pub fn to_request(
        &self,
        applicant_id: i64,
        current_program_id: Option<i64>,
    ) -> Result<ReviewRequest, WorkflowError> {
        let recommendation = Recommendation::parse(self.recommendation.trim())
            .ok_or(WorkflowError::InvalidRecommendation)?;

        let recommended_program_id = match recommendation {
            Recommendation::RecommendOtherProgram => {
                let id = self
                    .recommended_program_id
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .filter(|id| *id > 0)
                    .ok_or(WorkflowError::ProgramRequired)?;
                if Some(id) == current_program_id {
                    return Err(WorkflowError::SameProgram);
                }
                Some(id)
            }
            _ => None,
        };

        let notes = self.review_notes.trim();
        Ok(ReviewRequest {
            applicant_id,
            recommendation,
            review_notes: (!notes.is_empty()).then(|| notes.to_string()),
            recommended_program_id,
        })
    }
}

/// Programs an applicant may be redirected to: everything except the current one.
pub fn selectable_programs(programs: &[Program], current_program_id: Option<i64>) -> Vec<Program> {
    programs
        .iter()
        .filter(|p| Some(p.id) != current_program_id)
        .cloned()
        .collect()
}

/// Applicant answers of a saved form as `(label, value)` pairs.
pub fn form_entries(form: &SavedForm) -> Vec<(String, String)> {
    form.values
        .keys()
        .filter(|k| !HIDDEN_FORM_COLUMNS.contains(&k.as_str()))
        .map(|k| {
            let value = form.value(k).unwrap_or_else(|| "N/A".to_string());
            (k.replace('_', " "), value)
        })
        .collect()
}

/// One application's detail view together with its review form.
pub struct ReviewPanel {
    pub record: ApplicationRecord,
    pub form: ReviewForm,
}

impl ReviewPanel {
    pub async fn load<A: ReviewApi + ?Sized>(
        api: &A,
        token: &str,
        applicant_id: i64,
    ) -> Result<Self, WorkflowError> {
        let record = api.application_detail(token, applicant_id).await?;
        Ok(Self {
            record,
            form: ReviewForm::default(),
        })
    }

    /// Post a decision. On success the form is reset and the record
    /// re-fetched; on failure the submitted form is kept for correction.
    pub async fn submit<A: ReviewApi + ?Sized>(
        &mut self,
        api: &A,
        token: &str,
        form: ReviewForm,
    ) -> Result<ReviewOutcome, WorkflowError> {
        let applicant_id = self.record.applicant.id;
        let request = match form.to_request(applicant_id, self.record.applicant.program_id) {
            Ok(request) => request,
            Err(e) => {
                self.form = form;
                return Err(e);
            }
        };

        if let Err(e) = api.review_application(token, &request).await {
            self.form = form;
            return Err(e.into());
        }
        log::info!(
            "Recorded {:?} for applicant {applicant_id}",
            request.recommendation
        );
        self.form = ReviewForm::default();

        match api.application_detail(token, applicant_id).await {
            Ok(record) => {
                self.record = record;
                Ok(ReviewOutcome::Refreshed)
            }
            Err(e) => {
                log::warn!("Reloading applicant {applicant_id} after review failed: {e}");
                Ok(ReviewOutcome::Stale(e))
            }
        }
    }
}

/// A recorded review, and whether the record shown is current.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewOutcome {
    Refreshed,
    /// The review was stored but the record could not be reloaded.
    Stale(ApiError),
}
