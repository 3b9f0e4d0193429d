use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TicketKind {
    #[serde(rename = "walkin")]
    WalkIn,
    #[serde(rename = "reservation")]
    Reservation,
}

/// A scannable exit-gate token stored under `/tickets/{ticketId}`.
///
/// Older tickets carry no explicit `type`; those are classified at the gate
/// from their payment/entry flags instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TicketKind>,
    #[serde(default)]
    pub used: bool,
    #[serde(default)]
    pub entry_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub slot: String,
    pub plate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_at: Option<DateTime<Utc>>,
}

impl Ticket {
    pub fn is_paid(&self) -> bool {
        self.status.as_deref() == Some("Paid")
    }
}

/// Partial update applied to a ticket record.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_at: Option<DateTime<Utc>>,
}

impl TicketPatch {
    pub fn consumed(at: DateTime<Utc>) -> Self {
        TicketPatch {
            used: Some(true),
            used_at: Some(at),
        }
    }
}
