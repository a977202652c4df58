//! Acceptance fee and tuition payment.
//!
//! The two obligations are ordered: tuition can only be paid after the
//! acceptance fee. Amounts come from the admission letter, where the backend
//! formats them as naira strings.

use chrono::{DateTime, Utc};

use crate::api::types::{
    AdmissionLetterData, ApplicantStatus, PaymentRequest, PaymentResponse, PaymentType,
};
use crate::api::{AuthApi, LetterApi, PaymentApi};

use super::WorkflowError;

pub const PAYMENT_METHOD: &str = "remita";

/// Parse a formatted fee such as `₦150,000.00`.
pub fn parse_fee(formatted: &str) -> Option<f64> {
    let digits: String = formatted
        .chars()
        .filter(|c| *c != '₦' && *c != ',' && !c.is_whitespace())
        .collect();
    digits.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

/// Format an amount as `₦1,234.50`.
pub fn format_naira(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((&fixed, "00"));
    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}₦{grouped}.{cents}")
}

/// `TXN-<unix millis>`.
pub fn reference_id(now: DateTime<Utc>) -> String {
    format!("TXN-{}", now.timestamp_millis())
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentInfo {
    pub applicant_id: i64,
    pub program_name: String,
    pub admission_status: String,
    pub acceptance_fee: Option<f64>,
    pub tuition_fee: Option<f64>,
    pub has_paid_acceptance_fee: bool,
    pub has_paid_tuition: bool,
}

impl PaymentInfo {
    pub fn from_parts(status: &ApplicantStatus, letter: &AdmissionLetterData) -> Self {
        Self {
            applicant_id: status.id,
            program_name: status
                .program_name
                .clone()
                .unwrap_or_else(|| letter.programme.clone()),
            admission_status: status.admission_status.clone(),
            acceptance_fee: parse_fee(&letter.acceptance_fee),
            tuition_fee: parse_fee(&letter.tuition),
            has_paid_acceptance_fee: status.has_paid_acceptance_fee,
            has_paid_tuition: status.has_paid_tuition,
        }
    }

    pub fn amount(&self, kind: PaymentType) -> Option<f64> {
        match kind {
            PaymentType::AcceptanceFee => self.acceptance_fee,
            PaymentType::Tuition => self.tuition_fee,
        }
    }

    pub fn is_paid(&self, kind: PaymentType) -> bool {
        match kind {
            PaymentType::AcceptanceFee => self.has_paid_acceptance_fee,
            PaymentType::Tuition => self.has_paid_tuition,
        }
    }

    pub fn is_fully_paid(&self) -> bool {
        self.has_paid_acceptance_fee && self.has_paid_tuition
    }

    /// The amount due for `kind`, or why it cannot be paid now.
    pub fn check(&self, kind: PaymentType) -> Result<f64, WorkflowError> {
        if self.admission_status != "admitted" {
            return Err(WorkflowError::NotAdmitted);
        }
        if self.is_paid(kind) {
            return Err(WorkflowError::AlreadyPaid(kind));
        }
        if kind == PaymentType::Tuition && !self.has_paid_acceptance_fee {
            return Err(WorkflowError::AcceptanceFeeFirst);
        }
        self.amount(kind)
            .filter(|amount| *amount > 0.0)
            .ok_or(WorkflowError::FeeUnavailable(kind))
    }
}

/// Current payment state, assembled from the applicant status and the letter.
pub async fn load_payment_info<A>(api: &A, token: &str) -> Result<PaymentInfo, WorkflowError>
where
    A: AuthApi + LetterApi + ?Sized,
{
    let status = api.applicant_status(token).await?;
    if !status.is_admitted() {
        return Err(WorkflowError::NotAdmitted);
    }
    let letter = api.admission_letter(token).await?;
    Ok(PaymentInfo::from_parts(&status, &letter))
}

/// Pay one obligation through the backend.
pub async fn pay<A: PaymentApi + ?Sized>(
    api: &A,
    token: &str,
    info: &PaymentInfo,
    kind: PaymentType,
    now: DateTime<Utc>,
) -> Result<PaymentResponse, WorkflowError> {
    let amount = info.check(kind)?;
    let request = PaymentRequest {
        payment_type: kind,
        amount,
        payment_method: PAYMENT_METHOD.to_string(),
        reference_id: reference_id(now),
    };
    let response = api.process_payment(token, &request).await?;
    log::info!(
        "Payment {} ({}) for applicant {}: {}",
        response.transaction_id,
        kind.as_str(),
        info.applicant_id,
        response.status
    );
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_formatted_fees() {
        assert_eq!(parse_fee("₦150,000.00"), Some(150_000.0));
        assert_eq!(parse_fee("₦0.00"), Some(0.0));
        assert_eq!(parse_fee("N/A"), None);
    }

    #[test]
    fn formats_naira() {
        assert_eq!(format_naira(150_000.0), "₦150,000.00");
        assert_eq!(format_naira(999.5), "₦999.50");
        assert_eq!(format_naira(1_234_567.891), "₦1,234,567.89");
    }

    #[test]
    fn reference_uses_millis() {
        let now = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        assert_eq!(reference_id(now), "TXN-1700000000123");
    }
}
