use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::booking::PendingBooking;

/// Invoice status as reported by the gateway's webhook events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Paid,
    Expired,
    Failed,
    #[serde(other)]
    Other,
}

/// Asynchronous payment notification. Delivery is at-least-once and may be
/// duplicated or out of order; only the listed fields are consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayEvent {
    pub external_id: String,
    pub status: InvoiceStatus,
    #[serde(default)]
    pub amount: Option<i32>,
    #[serde(default)]
    pub id: Option<String>,
}

/// Outcome of a successful invoice creation.
#[derive(Debug, Clone)]
pub struct Invoice {
    pub id: String,
    pub invoice_url: String,
    /// The gateway's full response body, passed through to the caller.
    pub payload: serde_json::Value,
}

/// Invoice-creation request handed to the gateway adapter. The adapter
/// derives amount, payer and redirect targets from the staged booking.
#[derive(Debug, Clone)]
pub struct InvoiceRequest {
    pub external_id: String,
    pub description: String,
    pub booking: PendingBooking,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The gateway refused the invoice; the caller must roll back state it
    /// wrote before the call.
    #[error("invoice rejected: {message}")]
    Rejected { code: String, message: String },
    #[error("gateway transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an invoice with the provider and return its redirect URL.
    async fn create_invoice(&self, request: &InvoiceRequest) -> Result<Invoice, GatewayError>;
}
