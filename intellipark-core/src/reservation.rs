use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::booking::{BookingKind, PendingBooking};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReservationStatus {
    Pending,
    Paid,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReservedVia {
    Kiosk,
    Website,
}

/// The record binding a requester to a slot, stored under
/// `/reservations/{slot}`. At most one non-terminal reservation exists per
/// slot at any time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    pub plate: String,
    pub vehicle: String,
    pub slot: String,
    pub status: ReservationStatus,
    pub amount: i32,
    pub timestamp: DateTime<Utc>,
    pub reserved_via: ReservedVia,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_time: Option<String>,
    pub external_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_created: Option<DateTime<Utc>>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<BookingKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_confirmed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
}

impl Reservation {
    /// The initial Pending reservation written at invoice-creation time.
    pub fn pending(booking: &PendingBooking, external_id: &str) -> Self {
        let walk_in = booking.is_walk_in();
        Reservation {
            name: if walk_in { None } else { booking.name.clone() },
            email: booking.email.clone(),
            plate: booking.plate.clone(),
            vehicle: booking.vehicle.clone(),
            slot: booking.slot.clone(),
            status: ReservationStatus::Pending,
            amount: booking.amount,
            timestamp: booking.timestamp,
            reserved_via: if walk_in {
                ReservedVia::Kiosk
            } else {
                ReservedVia::Website
            },
            exit_time: None,
            booking_time: if walk_in { None } else { booking.time.clone() },
            external_id: external_id.to_string(),
            invoice_created: if walk_in { None } else { Some(booking.timestamp) },
            kind: if walk_in { Some(BookingKind::WalkIn) } else { None },
            invoice_id: None,
            payment_time: None,
            payment_confirmed: None,
            cancel_reason: None,
            ticket_id: None,
        }
    }
}

/// Partial update applied to a reservation record.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReservationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_confirmed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<DateTime<Utc>>,
}

impl ReservationPatch {
    pub fn paid(amount: i32, invoice_id: Option<String>, at: DateTime<Utc>) -> Self {
        ReservationPatch {
            status: Some(ReservationStatus::Paid),
            amount: Some(amount),
            invoice_id,
            payment_time: Some(at),
            payment_confirmed: Some(true),
            ..ReservationPatch::default()
        }
    }

    pub fn cancelled(reason: &str) -> Self {
        ReservationPatch {
            status: Some(ReservationStatus::Cancelled),
            cancel_reason: Some(reason.to_string()),
            ..ReservationPatch::default()
        }
    }

    pub fn completed(exit_time: DateTime<Utc>) -> Self {
        ReservationPatch {
            status: Some(ReservationStatus::Completed),
            exit_time: Some(exit_time),
            ..ReservationPatch::default()
        }
    }
}
