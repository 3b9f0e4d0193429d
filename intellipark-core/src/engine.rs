use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::booking::{BookingKind, CreateInvoiceRequest, ExitRequest, PendingBooking};
use crate::payment::{GatewayError, GatewayEvent, InvoiceRequest, InvoiceStatus, PaymentGateway};
use crate::repository::{BookingLocation, ParkingRepository};
use crate::reservation::{Reservation, ReservationPatch, ReservationStatus};
use crate::slot::{SlotPatch, SlotRecord, SlotStatus};
use crate::staging::StagingTable;
use crate::ticket::{TicketKind, TicketPatch};
use crate::validate::{valid_email, valid_plate, Tariffs};
use crate::{LifecycleError, LifecycleResult};

/// Outcome of a successful invoice creation, returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceCreated {
    pub invoice_url: String,
    pub external_id: String,
    pub amount: i32,
    pub vehicle: String,
    pub invoice: serde_json::Value,
}

/// Outcome of a successful exit.
#[derive(Debug, Clone, Serialize)]
pub struct ExitReceipt {
    pub exit_time: DateTime<Utc>,
    pub duration: String,
    pub slot: String,
    pub plate: String,
}

/// A Paid reservation located by plate scan.
#[derive(Debug, Clone, Serialize)]
pub struct VerifiedExit {
    pub slot: String,
    pub reservation: Reservation,
}

/// Drives a slot through Available -> Reserved/Pending -> Paid -> Completed
/// (or back to Available on expiry, failure, or rollback) in response to
/// booking requests, gateway webhooks, and exit-gate scans.
///
/// Collaborators are injected behind traits: the durable store, the payment
/// gateway, and the staging table bridging invoice creation and webhook
/// confirmation.
pub struct LifecycleEngine {
    repo: Arc<dyn ParkingRepository>,
    gateway: Arc<dyn PaymentGateway>,
    staging: Arc<dyn StagingTable>,
    tariffs: Tariffs,
    // Serializes CreateInvoice per slot code; without this, two concurrent
    // requests can both pass the availability check before either writes.
    slot_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl LifecycleEngine {
    pub fn new(
        repo: Arc<dyn ParkingRepository>,
        gateway: Arc<dyn PaymentGateway>,
        staging: Arc<dyn StagingTable>,
        tariffs: Tariffs,
    ) -> Self {
        LifecycleEngine {
            repo,
            gateway,
            staging,
            tariffs,
            slot_locks: Mutex::new(HashMap::new()),
        }
    }

    async fn lock_slot(&self, slot: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.slot_locks.lock().await;
            locks
                .entry(slot.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Validate a booking request, stage it, commit the provisional
    /// reservation and request an invoice from the gateway.
    pub async fn create_invoice(
        &self,
        request: CreateInvoiceRequest,
    ) -> LifecycleResult<InvoiceCreated> {
        let walk_in = request.is_walk_in();

        let slot = required(request.slot, "slot")?;
        let email = required(request.email, "email")?;
        let plate = required(request.plate, "plate")?;
        let vehicle = required(request.vehicle, "vehicle")?;
        let amount = request
            .amount
            .ok_or_else(|| missing("amount"))?;
        let time = if walk_in {
            request.time
        } else {
            Some(required(request.time, "time")?)
        };
        let name = if walk_in {
            request.name
        } else {
            Some(required(request.name, "name")?)
        };

        let expected = self.tariffs.expected(&vehicle);
        if amount != expected {
            return Err(LifecycleError::Validation(format!(
                "Invalid amount for {vehicle}. Expected {expected}"
            )));
        }
        if !valid_email(&email) {
            return Err(LifecycleError::Validation("Invalid email format".to_string()));
        }
        if !valid_plate(&plate) {
            return Err(LifecycleError::Validation(
                "Plate number must be in format ABC123 (3 letters + 3 digits)".to_string(),
            ));
        }

        let _guard = self.lock_slot(&slot).await;

        let status = self
            .repo
            .slot_status(&slot)
            .await
            .map_err(LifecycleError::Store)?;

        if !walk_in && status != Some(SlotStatus::Available) {
            return Err(LifecycleError::Validation(format!(
                "Slot {slot} is no longer available"
            )));
        }
        if walk_in {
            match status {
                Some(SlotStatus::Occupied) => {
                    return Err(LifecycleError::Validation(format!(
                        "Slot {slot} is currently occupied"
                    )));
                }
                Some(SlotStatus::Reserved) => {
                    let existing = self
                        .repo
                        .reservation(&slot)
                        .await
                        .map_err(LifecycleError::Store)?;
                    match existing {
                        Some(r) if r.status == ReservationStatus::Paid => {
                            return Err(LifecycleError::Validation(format!(
                                "Slot {slot} is already reserved and paid"
                            )));
                        }
                        Some(r) if r.status == ReservationStatus::Pending => {
                            tracing::warn!(slot = %slot, "overriding stale pending reservation");
                            self.repo
                                .remove_reservation(&slot)
                                .await
                                .map_err(LifecycleError::Store)?;
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        let timestamp = Utc::now();
        let marker = if walk_in { "WALKIN" } else { "WEBSITE" };
        let external_id = format!("{}_{}_{}", marker, slot, timestamp.timestamp_millis());

        let booking = PendingBooking {
            slot: slot.clone(),
            name: if walk_in { None } else { name },
            email,
            plate,
            vehicle: vehicle.clone(),
            amount,
            time,
            timestamp,
            kind: if walk_in {
                BookingKind::WalkIn
            } else {
                BookingKind::Website
            },
        };

        self.staging
            .put(&external_id, booking.clone())
            .await
            .map_err(LifecycleError::Store)?;

        let reservation = Reservation::pending(&booking, &external_id);
        self.repo
            .put_reservation(&slot, &reservation)
            .await
            .map_err(LifecycleError::Store)?;
        self.repo
            .update_slot(&slot, &SlotPatch::reserved(&booking))
            .await
            .map_err(LifecycleError::Store)?;

        tracing::info!(slot = %slot, external_id = %external_id, amount, "slot reserved, requesting invoice");

        let description = if walk_in {
            format!("Walk-in Parking ({vehicle}) - {slot}")
        } else {
            format!("Website Reservation ({vehicle}) - {slot}")
        };
        let invoice_request = InvoiceRequest {
            external_id: external_id.clone(),
            description,
            booking,
        };

        match self.gateway.create_invoice(&invoice_request).await {
            Ok(invoice) => {
                tracing::info!(invoice_id = %invoice.id, external_id = %external_id, "invoice created");
                Ok(InvoiceCreated {
                    invoice_url: invoice.invoice_url,
                    external_id,
                    amount,
                    vehicle,
                    invoice: invoice.payload,
                })
            }
            Err(GatewayError::Rejected { code, message }) => {
                tracing::warn!(slot = %slot, code = %code, "gateway rejected invoice, rolling back");
                self.staging
                    .remove(&external_id)
                    .await
                    .map_err(LifecycleError::Store)?;
                self.repo
                    .remove_reservation(&slot)
                    .await
                    .map_err(LifecycleError::Store)?;
                self.repo
                    .put_slot(&slot, &SlotRecord::empty())
                    .await
                    .map_err(LifecycleError::Store)?;
                Err(LifecycleError::Gateway { message })
            }
            Err(GatewayError::Transport(err)) => Err(LifecycleError::Internal(format!(
                "Failed to create invoice: {err}"
            ))),
        }
    }

    /// Reconcile an asynchronous gateway notification. Replays of already
    /// processed events and unknown correlation ids are acknowledged no-ops;
    /// the staged payload doubles as the completion marker.
    pub async fn handle_payment_event(&self, event: GatewayEvent) -> LifecycleResult<()> {
        match event.status {
            InvoiceStatus::Paid => {
                let staged = self
                    .staging
                    .get(&event.external_id)
                    .await
                    .map_err(LifecycleError::Store)?;
                let Some(booking) = staged else {
                    tracing::warn!(external_id = %event.external_id, "no staged booking for paid invoice");
                    return Ok(());
                };

                let slot = booking.slot.clone();
                let amount = event.amount.unwrap_or(booking.amount);
                self.repo
                    .update_reservation(
                        &slot,
                        &ReservationPatch::paid(amount, event.id.clone(), Utc::now()),
                    )
                    .await
                    .map_err(LifecycleError::Store)?;
                self.repo
                    .update_slot(&slot, &SlotPatch::paid())
                    .await
                    .map_err(LifecycleError::Store)?;
                self.staging
                    .remove(&event.external_id)
                    .await
                    .map_err(LifecycleError::Store)?;
                tracing::info!(slot = %slot, external_id = %event.external_id, "payment confirmed");
            }
            InvoiceStatus::Expired | InvoiceStatus::Failed => {
                let staged = self
                    .staging
                    .get(&event.external_id)
                    .await
                    .map_err(LifecycleError::Store)?;
                // Walk-in payment failures are not auto-released here; the
                // kiosk retries in place.
                if let Some(booking) = staged.filter(|b| !b.is_walk_in()) {
                    let reason = if event.status == InvoiceStatus::Expired {
                        "Payment timeout"
                    } else {
                        "Payment failed"
                    };
                    let slot = booking.slot.clone();
                    self.repo
                        .update_reservation(&slot, &ReservationPatch::cancelled(reason))
                        .await
                        .map_err(LifecycleError::Store)?;
                    self.repo
                        .put_slot(&slot, &SlotRecord::empty())
                        .await
                        .map_err(LifecycleError::Store)?;
                    self.staging
                        .remove(&event.external_id)
                        .await
                        .map_err(LifecycleError::Store)?;
                    tracing::info!(slot = %slot, reason, "released slot after failed payment");
                }
            }
            InvoiceStatus::Other => {
                tracing::debug!(external_id = %event.external_id, "ignoring gateway event");
            }
        }
        Ok(())
    }

    /// Free a slot when a vehicle leaves, optionally gated by a scanned
    /// ticket. The reservation's plate must match regardless of the ticket.
    pub async fn exit(&self, request: ExitRequest) -> LifecycleResult<ExitReceipt> {
        let slot = request.slot.clone().filter(|s| !s.is_empty());
        let plate = request.plate.clone().filter(|p| !p.is_empty());
        let (Some(slot), Some(plate)) = (slot, plate) else {
            return Err(LifecycleError::Validation("Missing slot or plate".to_string()));
        };

        let mut scanned_ticket: Option<String> = None;
        if let Some(ticket_id) = request.ticket_id.filter(|id| !id.is_empty()) {
            let ticket = self
                .repo
                .ticket(&ticket_id)
                .await
                .map_err(LifecycleError::Store)?
                .ok_or_else(|| LifecycleError::NotFound("Invalid ticket".to_string()))?;

            if ticket.used {
                return Err(LifecycleError::Forbidden("Ticket already used".to_string()));
            }

            match ticket.kind {
                Some(TicketKind::WalkIn) => {
                    if !ticket.is_paid() {
                        return Err(LifecycleError::Forbidden("Payment required".to_string()));
                    }
                }
                Some(TicketKind::Reservation) => {
                    if !ticket.entry_verified {
                        return Err(LifecycleError::Forbidden(
                            "Please check in at entrance first".to_string(),
                        ));
                    }
                }
                // Legacy tickets carry no type; classify from the flags.
                None => {
                    let inferred_walk_in = ticket.is_paid() && !ticket.entry_verified;
                    if !inferred_walk_in && !ticket.entry_verified {
                        return Err(LifecycleError::Forbidden("Ticket not verified".to_string()));
                    }
                }
            }

            if ticket.slot != slot || ticket.plate != plate {
                return Err(LifecycleError::Forbidden("Ticket data mismatch".to_string()));
            }
            scanned_ticket = Some(ticket_id);
        }

        let reservation = self
            .repo
            .reservation(&slot)
            .await
            .map_err(LifecycleError::Store)?
            .ok_or_else(|| LifecycleError::NotFound("No reservation found".to_string()))?;

        if reservation.plate != plate {
            tracing::warn!(slot = %slot, expected = %reservation.plate, got = %plate, "plate mismatch at exit");
            return Err(LifecycleError::Forbidden("Plate mismatch".to_string()));
        }

        let exit_time = match request.exit_time {
            Some(raw) => DateTime::parse_from_rfc3339(&raw)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|_| LifecycleError::Validation("Invalid exitTime format".to_string()))?,
            None => Utc::now(),
        };

        self.repo
            .update_reservation(&slot, &ReservationPatch::completed(exit_time))
            .await
            .map_err(LifecycleError::Store)?;
        self.repo
            .put_slot(&slot, &SlotRecord::empty())
            .await
            .map_err(LifecycleError::Store)?;
        if let Some(ticket_id) = &scanned_ticket {
            self.repo
                .update_ticket(ticket_id, &TicketPatch::consumed(exit_time))
                .await
                .map_err(LifecycleError::Store)?;
        }

        let duration = elapsed_label(reservation.timestamp, exit_time);
        tracing::info!(slot = %slot, plate = %plate, duration = %duration, "exit recorded");

        Ok(ExitReceipt {
            exit_time,
            duration,
            slot,
            plate,
        })
    }

    /// Find the Paid reservation matching a plate, if any. Read-only.
    pub async fn verify_exit_by_plate(&self, plate: &str) -> LifecycleResult<VerifiedExit> {
        let reservations = self
            .repo
            .reservations()
            .await
            .map_err(LifecycleError::Store)?;

        if reservations.is_empty() {
            return Err(LifecycleError::NotFound(
                "No active reservations found".to_string(),
            ));
        }

        reservations
            .into_iter()
            .find(|(_, r)| r.plate == plate && r.status == ReservationStatus::Paid)
            .map(|(slot, reservation)| VerifiedExit { slot, reservation })
            .ok_or_else(|| {
                LifecycleError::NotFound(
                    "No active reservation found for this plate number".to_string(),
                )
            })
    }

    /// Look up a booking record by correlation id. The id's marker decides
    /// which store namespace is read.
    pub async fn lookup_booking(&self, external_id: &str) -> LifecycleResult<serde_json::Value> {
        let location = if external_id.contains("WALKIN") {
            BookingLocation::WalkIns
        } else {
            BookingLocation::Reservations
        };

        self.repo
            .booking_record(location, external_id)
            .await
            .map_err(LifecycleError::Store)?
            .ok_or_else(|| LifecycleError::NotFound("Booking not found".to_string()))
    }
}

fn required(value: Option<String>, field: &str) -> LifecycleResult<String> {
    value.filter(|v| !v.is_empty()).ok_or_else(|| missing(field))
}

fn missing(field: &str) -> LifecycleError {
    LifecycleError::Validation(format!("Missing {field} parameter"))
}

/// Elapsed time between entry and exit as whole hours and remainder
/// minutes, floor-rounded.
fn elapsed_label(entry: DateTime<Utc>, exit: DateTime<Utc>) -> String {
    let minutes = (exit - entry).num_minutes();
    format!("{}h {}m", minutes / 60, minutes % 60)
}
