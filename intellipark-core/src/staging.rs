use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::booking::PendingBooking;

/// Transient mapping from correlation id to the booking payload that
/// produced it, bridging invoice creation and webhook confirmation.
///
/// Keys are unique per invoice attempt; the only ordering guarantee is
/// last-write-wins per key. The trait exists so the in-process table can be
/// swapped for a durable-backed one without touching the lifecycle engine.
#[async_trait]
pub trait StagingTable: Send + Sync {
    async fn put(
        &self,
        external_id: &str,
        booking: PendingBooking,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn get(
        &self,
        external_id: &str,
    ) -> Result<Option<PendingBooking>, Box<dyn std::error::Error + Send + Sync>>;

    async fn remove(
        &self,
        external_id: &str,
    ) -> Result<Option<PendingBooking>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Process-local staging table. Volatile: a restart between invoice creation
/// and webhook delivery orphans the pending reservation.
#[derive(Default)]
pub struct InMemoryStaging {
    entries: RwLock<HashMap<String, PendingBooking>>,
}

impl InMemoryStaging {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StagingTable for InMemoryStaging {
    async fn put(
        &self,
        external_id: &str,
        booking: PendingBooking,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| "staging table lock poisoned".to_string())?;
        entries.insert(external_id.to_string(), booking);
        Ok(())
    }

    async fn get(
        &self,
        external_id: &str,
    ) -> Result<Option<PendingBooking>, Box<dyn std::error::Error + Send + Sync>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| "staging table lock poisoned".to_string())?;
        Ok(entries.get(external_id).cloned())
    }

    async fn remove(
        &self,
        external_id: &str,
    ) -> Result<Option<PendingBooking>, Box<dyn std::error::Error + Send + Sync>> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| "staging table lock poisoned".to_string())?;
        Ok(entries.remove(external_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::BookingKind;
    use chrono::Utc;

    fn booking(slot: &str, plate: &str) -> PendingBooking {
        PendingBooking {
            slot: slot.to_string(),
            name: None,
            email: "kiosk@example.com".to_string(),
            plate: plate.to_string(),
            vehicle: "Car".to_string(),
            amount: 50,
            time: None,
            timestamp: Utc::now(),
            kind: BookingKind::WalkIn,
        }
    }

    #[tokio::test]
    async fn put_then_get_returns_payload() {
        let table = InMemoryStaging::new();
        table.put("WALKIN_A01_1", booking("A01", "ABC123")).await.unwrap();

        let stored = table.get("WALKIN_A01_1").await.unwrap().unwrap();
        assert_eq!(stored.slot, "A01");
        assert_eq!(stored.plate, "ABC123");
    }

    #[tokio::test]
    async fn remove_discards_the_entry() {
        let table = InMemoryStaging::new();
        table.put("WALKIN_A01_1", booking("A01", "ABC123")).await.unwrap();

        let removed = table.remove("WALKIN_A01_1").await.unwrap();
        assert!(removed.is_some());
        assert!(table.get("WALKIN_A01_1").await.unwrap().is_none());
        assert!(table.remove("WALKIN_A01_1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn same_key_is_last_write_wins() {
        let table = InMemoryStaging::new();
        table.put("WEBSITE_A02_1", booking("A02", "ABC123")).await.unwrap();
        table.put("WEBSITE_A02_1", booking("A02", "XYZ789")).await.unwrap();

        let stored = table.get("WEBSITE_A02_1").await.unwrap().unwrap();
        assert_eq!(stored.plate, "XYZ789");
    }
}
