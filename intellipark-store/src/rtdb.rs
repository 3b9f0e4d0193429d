use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

use intellipark_core::repository::{BookingLocation, ParkingRepository};
use intellipark_core::reservation::{Reservation, ReservationPatch};
use intellipark_core::slot::{SlotPatch, SlotRecord, SlotStatus};
use intellipark_core::ticket::{Ticket, TicketPatch};

#[derive(Debug, thiserror::Error)]
pub enum RtdbError {
    #[error("database request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("database record decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Firebase Realtime Database client over its REST surface.
///
/// Each operation is one `GET`/`PUT`/`PATCH`/`DELETE` on a single
/// `{path}.json` node; a `PATCH` merges the posted fields into the node and
/// is atomic for that path only.
#[derive(Clone)]
pub struct RtdbClient {
    http: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl RtdbClient {
    pub fn new(base_url: &str, auth_token: Option<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(RtdbClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        match &self.auth_token {
            Some(token) => format!("{}/{}.json?auth={}", self.base_url, path, token),
            None => format!("{}/{}.json", self.base_url, path),
        }
    }

    async fn get_value(&self, path: &str) -> Result<Option<Value>, RtdbError> {
        let value: Value = self
            .http
            .get(self.endpoint(path))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        // Absent nodes come back as JSON null.
        Ok(if value.is_null() { None } else { Some(value) })
    }

    async fn put_value(&self, path: &str, body: &Value) -> Result<(), RtdbError> {
        self.http
            .put(self.endpoint(path))
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        tracing::debug!(path, "rtdb set");
        Ok(())
    }

    async fn patch_value(&self, path: &str, body: &Value) -> Result<(), RtdbError> {
        self.http
            .patch(self.endpoint(path))
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        tracing::debug!(path, "rtdb update");
        Ok(())
    }

    async fn delete_value(&self, path: &str) -> Result<(), RtdbError> {
        self.http
            .delete(self.endpoint(path))
            .send()
            .await?
            .error_for_status()?;
        tracing::debug!(path, "rtdb remove");
        Ok(())
    }
}

#[async_trait]
impl ParkingRepository for RtdbClient {
    async fn slot_status(
        &self,
        slot: &str,
    ) -> Result<Option<SlotStatus>, Box<dyn std::error::Error + Send + Sync>> {
        match self.get_value(&format!("{slot}/status")).await? {
            Some(value) => Ok(Some(serde_json::from_value(value).map_err(RtdbError::Decode)?)),
            None => Ok(None),
        }
    }

    async fn update_slot(
        &self,
        slot: &str,
        patch: &SlotPatch,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let body = serde_json::to_value(patch).map_err(RtdbError::Decode)?;
        self.patch_value(slot, &body).await?;
        Ok(())
    }

    async fn put_slot(
        &self,
        slot: &str,
        record: &SlotRecord,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let body = serde_json::to_value(record).map_err(RtdbError::Decode)?;
        self.put_value(slot, &body).await?;
        Ok(())
    }

    async fn reservation(
        &self,
        slot: &str,
    ) -> Result<Option<Reservation>, Box<dyn std::error::Error + Send + Sync>> {
        match self.get_value(&format!("reservations/{slot}")).await? {
            Some(value) => Ok(Some(serde_json::from_value(value).map_err(RtdbError::Decode)?)),
            None => Ok(None),
        }
    }

    async fn put_reservation(
        &self,
        slot: &str,
        reservation: &Reservation,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let body = serde_json::to_value(reservation).map_err(RtdbError::Decode)?;
        self.put_value(&format!("reservations/{slot}"), &body).await?;
        Ok(())
    }

    async fn update_reservation(
        &self,
        slot: &str,
        patch: &ReservationPatch,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let body = serde_json::to_value(patch).map_err(RtdbError::Decode)?;
        self.patch_value(&format!("reservations/{slot}"), &body).await?;
        Ok(())
    }

    async fn remove_reservation(
        &self,
        slot: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.delete_value(&format!("reservations/{slot}")).await?;
        Ok(())
    }

    async fn reservations(
        &self,
    ) -> Result<BTreeMap<String, Reservation>, Box<dyn std::error::Error + Send + Sync>> {
        let Some(value) = self.get_value("reservations").await? else {
            return Ok(BTreeMap::new());
        };
        let records: BTreeMap<String, Value> =
            serde_json::from_value(value).map_err(RtdbError::Decode)?;
        // Skip records that don't parse as reservations (e.g. partially
        // written or legacy entries) rather than failing the whole scan.
        Ok(records
            .into_iter()
            .filter_map(|(slot, record)| {
                serde_json::from_value(record).ok().map(|r| (slot, r))
            })
            .collect())
    }

    async fn ticket(
        &self,
        ticket_id: &str,
    ) -> Result<Option<Ticket>, Box<dyn std::error::Error + Send + Sync>> {
        match self.get_value(&format!("tickets/{ticket_id}")).await? {
            Some(value) => Ok(Some(serde_json::from_value(value).map_err(RtdbError::Decode)?)),
            None => Ok(None),
        }
    }

    async fn update_ticket(
        &self,
        ticket_id: &str,
        patch: &TicketPatch,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let body = serde_json::to_value(patch).map_err(RtdbError::Decode)?;
        self.patch_value(&format!("tickets/{ticket_id}"), &body).await?;
        Ok(())
    }

    async fn booking_record(
        &self,
        location: BookingLocation,
        id: &str,
    ) -> Result<Option<Value>, Box<dyn std::error::Error + Send + Sync>> {
        let path = match location {
            BookingLocation::WalkIns => format!("walk-in-bookings/{id}"),
            BookingLocation::Reservations => format!("reservations/{id}"),
        };
        Ok(self.get_value(&path).await?)
    }
}
