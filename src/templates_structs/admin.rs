use askama::Template;

use crate::api::types::{
    ApplicationRecord, ApplicationSummary, LetterTemplate, SendResult, Statistics,
};
use crate::workflow::review::ReviewForm;

use super::{PageContext, SelectOption};

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
    pub ctx: PageContext,
    pub stats: Statistics,
}

#[derive(Template)]
#[template(path = "admin/applications.html")]
pub struct ApplicationListTemplate {
    pub ctx: PageContext,
    pub applications: Vec<ApplicationSummary>,
    pub statuses: Vec<SelectOption>,
    pub programs: Vec<SelectOption>,
    pub status_label: String,
}

#[derive(Template)]
#[template(path = "admin/application_detail.html")]
pub struct ApplicationDetailTemplate {
    pub ctx: PageContext,
    pub record: ApplicationRecord,
    pub form_entries: Vec<(String, String)>,
    pub status_label: String,
    pub programs: Vec<SelectOption>,
    pub form: ReviewForm,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/send_letters.html")]
pub struct SendLettersTemplate {
    pub ctx: PageContext,
    pub applications: Vec<ApplicationSummary>,
    pub templates: Vec<SelectOption>,
    pub admission_date: String,
    pub result: Option<SendResult>,
    /// Name of the letter template used for `result`.
    pub sent_with: Option<String>,
    pub error: Option<String>,
}
