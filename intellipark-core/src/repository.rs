use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::reservation::{Reservation, ReservationPatch};
use crate::slot::{SlotPatch, SlotRecord, SlotStatus};
use crate::ticket::{Ticket, TicketPatch};

/// Which durable-store namespace a booking lookup reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingLocation {
    Reservations,
    WalkIns,
}

/// Repository trait over the durable store's hierarchical layout:
/// `/{slot}` for slot records, `/reservations/{key}`, `/tickets/{ticketId}`
/// and `/walk-in-bookings/{externalId}`.
///
/// Each method maps to a single-path read or partial update; the store
/// offers no transaction spanning more than one path.
#[async_trait]
pub trait ParkingRepository: Send + Sync {
    async fn slot_status(
        &self,
        slot: &str,
    ) -> Result<Option<SlotStatus>, Box<dyn std::error::Error + Send + Sync>>;

    async fn update_slot(
        &self,
        slot: &str,
        patch: &SlotPatch,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Replace the slot record wholesale. Used on release, so a freed slot
    /// always lands in the same empty representation.
    async fn put_slot(
        &self,
        slot: &str,
        record: &SlotRecord,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn reservation(
        &self,
        slot: &str,
    ) -> Result<Option<Reservation>, Box<dyn std::error::Error + Send + Sync>>;

    async fn put_reservation(
        &self,
        slot: &str,
        reservation: &Reservation,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn update_reservation(
        &self,
        slot: &str,
        patch: &ReservationPatch,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn remove_reservation(
        &self,
        slot: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// All current reservation records, keyed by slot code.
    async fn reservations(
        &self,
    ) -> Result<BTreeMap<String, Reservation>, Box<dyn std::error::Error + Send + Sync>>;

    async fn ticket(
        &self,
        ticket_id: &str,
    ) -> Result<Option<Ticket>, Box<dyn std::error::Error + Send + Sync>>;

    async fn update_ticket(
        &self,
        ticket_id: &str,
        patch: &TicketPatch,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Raw booking record for the status-lookup endpoint.
    async fn booking_record(
        &self,
        location: BookingLocation,
        id: &str,
    ) -> Result<Option<serde_json::Value>, Box<dyn std::error::Error + Send + Sync>>;
}
