use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the booking entered the system: at the kiosk or through the website.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookingKind {
    #[serde(rename = "walk-in")]
    WalkIn,
    #[serde(rename = "website-booking")]
    Website,
}

/// Staged booking payload, keyed by its correlation id until the payment
/// gateway reports an outcome. Carries everything needed to materialize the
/// reservation without re-deriving it from the webhook event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PendingBooking {
    pub slot: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    pub plate: String,
    pub vehicle: String,
    pub amount: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: BookingKind,
}

impl PendingBooking {
    pub fn is_walk_in(&self) -> bool {
        self.kind == BookingKind::WalkIn
    }
}

/// Body of `POST /api/create-invoice`. Every field is optional at the wire
/// level; required-field checks run first and report which one is missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateInvoiceRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub plate: Option<String>,
    #[serde(default)]
    pub vehicle: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub slot: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub amount: Option<i32>,
}

impl CreateInvoiceRequest {
    pub fn is_walk_in(&self) -> bool {
        self.kind.as_deref() == Some("walk-in")
    }
}

/// Body of `POST /api/exit`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitRequest {
    #[serde(default)]
    pub slot: Option<String>,
    #[serde(default)]
    pub plate: Option<String>,
    #[serde(default)]
    pub exit_time: Option<String>,
    #[serde(default)]
    pub ticket_id: Option<String>,
}
