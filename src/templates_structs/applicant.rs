use askama::Template;

use crate::api::types::{
    AdmissionLetterData, ApplicantStatus, FieldType, PaymentTransaction, Program,
};
use crate::workflow::ApplicationForm;
use crate::workflow::payment::{PaymentInfo, format_naira};

use super::PageContext;

#[derive(Template)]
#[template(path = "applicant/select_program.html")]
pub struct SelectProgramTemplate {
    pub ctx: PageContext,
    pub programs: Vec<Program>,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "applicant/dashboard.html")]
pub struct ApplicantDashboardTemplate {
    pub ctx: PageContext,
    pub applicant: ApplicantStatus,
    pub program_name: String,
    pub application_label: String,
    pub is_submitted: bool,
    pub is_admitted: bool,
}

/// One input of the dynamic application form.
pub struct FieldView {
    pub name: String,
    pub label: String,
    pub input_type: String,
    pub is_select: bool,
    pub is_textarea: bool,
    pub options: Vec<String>,
    pub value: String,
    pub required: bool,
}

/// One document slot of the application form.
pub struct DocumentView {
    pub document_type: String,
    pub label: String,
    pub required: bool,
    pub uploaded_filename: Option<String>,
    pub original_kb: String,
    pub compressed_kb: Option<String>,
}

#[derive(Template)]
#[template(path = "applicant/application.html")]
pub struct ApplicationTemplate {
    pub ctx: PageContext,
    pub program_name: String,
    pub fields: Vec<FieldView>,
    pub documents: Vec<DocumentView>,
    pub form_id: Option<i64>,
    pub is_submitted: bool,
    pub can_submit: bool,
    pub errors: Vec<String>,
    pub max_upload_mb: u64,
}

impl ApplicationTemplate {
    pub fn new(ctx: PageContext, form: &ApplicationForm, is_submitted: bool, errors: Vec<String>) -> Self {
        let template = form.template();
        let fields = template
            .fields
            .iter()
            .map(|f| FieldView {
                name: f.name.clone(),
                label: f.label.clone(),
                input_type: f.field_type.input_type().to_string(),
                is_select: f.field_type == FieldType::Select,
                is_textarea: f.field_type == FieldType::Textarea,
                options: f.options.clone(),
                value: form.value(&f.name).to_string(),
                required: f.required,
            })
            .collect();
        let documents = template
            .documents
            .iter()
            .map(|d| {
                let uploaded = form.uploaded(&d.document_type);
                DocumentView {
                    document_type: d.document_type.clone(),
                    label: d.label.clone(),
                    required: d.required,
                    uploaded_filename: uploaded.map(|u| u.original_filename.clone()),
                    original_kb: uploaded.map(|u| u.original_kb()).unwrap_or_default(),
                    compressed_kb: uploaded.and_then(|u| u.compressed_kb()),
                }
            })
            .collect();
        Self {
            ctx,
            program_name: template.program.clone(),
            fields,
            documents,
            form_id: form.form_id(),
            is_submitted,
            can_submit: !is_submitted && form.can_submit(),
            errors,
            max_upload_mb: crate::workflow::MAX_UPLOAD_BYTES / (1024 * 1024),
        }
    }
}

#[derive(Template)]
#[template(path = "applicant/admission_letter.html")]
pub struct AdmissionLetterTemplate {
    pub ctx: PageContext,
    pub letter: AdmissionLetterData,
}

/// A payment history row, amounts pre-formatted.
pub struct TransactionView {
    pub id: i64,
    pub label: String,
    pub amount: String,
    pub status: String,
    pub reference: String,
    pub date: String,
    pub has_receipt: bool,
}

impl From<&PaymentTransaction> for TransactionView {
    fn from(t: &PaymentTransaction) -> Self {
        let label = crate::api::types::PaymentType::parse(&t.payment_type)
            .map(|k| k.label().to_string())
            .unwrap_or_else(|| t.payment_type.clone());
        Self {
            id: t.transaction_id,
            label,
            amount: format_naira(t.amount),
            status: t.status.clone(),
            reference: t.reference_id.clone().unwrap_or_default(),
            date: t
                .completed_at
                .clone()
                .or_else(|| t.created_at.clone())
                .unwrap_or_default(),
            has_receipt: t.status == "completed",
        }
    }
}

#[derive(Template)]
#[template(path = "applicant/payment.html")]
pub struct PaymentTemplate {
    pub ctx: PageContext,
    pub program_name: String,
    pub acceptance_fee: String,
    pub tuition_fee: String,
    pub has_paid_acceptance_fee: bool,
    pub has_paid_tuition: bool,
    pub can_pay_acceptance: bool,
    pub can_pay_tuition: bool,
    pub history: Vec<TransactionView>,
    pub error: Option<String>,
}

impl PaymentTemplate {
    pub fn new(
        ctx: PageContext,
        info: &PaymentInfo,
        history: &[PaymentTransaction],
        error: Option<String>,
    ) -> Self {
        use crate::api::types::PaymentType;

        let fee = |amount: Option<f64>| amount.map(format_naira).unwrap_or_else(|| "N/A".to_string());
        Self {
            ctx,
            program_name: info.program_name.clone(),
            acceptance_fee: fee(info.acceptance_fee),
            tuition_fee: fee(info.tuition_fee),
            has_paid_acceptance_fee: info.has_paid_acceptance_fee,
            has_paid_tuition: info.has_paid_tuition,
            can_pay_acceptance: info.check(PaymentType::AcceptanceFee).is_ok(),
            can_pay_tuition: info.check(PaymentType::Tuition).is_ok(),
            history: history.iter().map(TransactionView::from).collect(),
            error,
        }
    }
}
