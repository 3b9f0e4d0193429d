use serde::{Deserialize, Serialize};

use crate::booking::{BookingKind, PendingBooking};
use crate::reservation::ReservedVia;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SlotStatus {
    Available,
    Reserved,
    Occupied,
}

/// Full slot record. Slots are never created or destroyed; releasing one
/// writes this record back in its empty form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlotRecord {
    pub status: SlotStatus,
    pub reserved: bool,
    pub name: String,
    pub email: String,
    pub plate: String,
    pub vehicle: String,
    pub time: String,
    pub booked_at: String,
}

impl SlotRecord {
    pub fn empty() -> Self {
        SlotRecord {
            status: SlotStatus::Available,
            reserved: false,
            name: String::new(),
            email: String::new(),
            plate: String::new(),
            vehicle: String::new(),
            time: String::new(),
            booked_at: String::new(),
        }
    }
}

/// Partial update applied to a slot record in the durable store.
///
/// Only the populated fields are written; the store merges them into the
/// existing record. Field names match the database layout consumed by the
/// dashboard, so occupant details are denormalized onto the slot here.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SlotStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_type: Option<ReservedVia>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booked_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
}

impl SlotPatch {
    /// Marks the slot Reserved and denormalizes the requester onto it.
    pub fn reserved(booking: &PendingBooking) -> Self {
        let walk_in = booking.kind == BookingKind::WalkIn;
        let display_name = if walk_in {
            format!("Walk-in {}", booking.plate)
        } else {
            booking.name.clone().unwrap_or_default()
        };

        SlotPatch {
            status: Some(SlotStatus::Reserved),
            reserved: Some(true),
            reserved_by: Some(display_name.clone()),
            reservation_type: Some(if walk_in {
                ReservedVia::Kiosk
            } else {
                ReservedVia::Website
            }),
            vehicle_type: Some(booking.vehicle.clone()),
            name: Some(display_name),
            email: Some(booking.email.clone()),
            plate: Some(booking.plate.clone()),
            vehicle: Some(booking.vehicle.clone()),
            time: Some(booking.time.clone().unwrap_or_default()),
            booked_at: Some(booking.timestamp.to_rfc3339()),
            amount: Some(booking.amount),
            payment_status: None,
        }
    }

    /// Confirms payment on a reserved slot.
    pub fn paid() -> Self {
        SlotPatch {
            status: Some(SlotStatus::Reserved),
            reserved: Some(true),
            payment_status: Some("Paid".to_string()),
            ..SlotPatch::default()
        }
    }
}
