use async_trait::async_trait;

use super::types::{PaymentHistory, PaymentRequest, PaymentResponse};
use super::{ApiClient, ApiError, GENERIC_FAILURE};

#[async_trait]
pub trait PaymentApi: Send + Sync {
    async fn process_payment(
        &self,
        token: &str,
        request: &PaymentRequest,
    ) -> Result<PaymentResponse, ApiError>;
    async fn payment_history(&self, token: &str) -> Result<PaymentHistory, ApiError>;
    async fn payment_receipt(&self, token: &str, transaction_id: i64) -> Result<Vec<u8>, ApiError>;
}

#[async_trait]
impl PaymentApi for ApiClient {
    async fn process_payment(
        &self,
        token: &str,
        request: &PaymentRequest,
    ) -> Result<PaymentResponse, ApiError> {
        self.send_json(
            self.post("/applicant/process-payment", Some(token)).json(request),
            GENERIC_FAILURE,
        )
        .await
    }

    async fn payment_history(&self, token: &str) -> Result<PaymentHistory, ApiError> {
        self.send_json(self.get("/applicant/payment-history", Some(token)), GENERIC_FAILURE)
            .await
    }

    async fn payment_receipt(&self, token: &str, transaction_id: i64) -> Result<Vec<u8>, ApiError> {
        self.send_bytes(
            self.get(&format!("/applicant/payment-receipt/{transaction_id}"), Some(token)),
            "Failed to download payment receipt",
        )
        .await
    }
}
