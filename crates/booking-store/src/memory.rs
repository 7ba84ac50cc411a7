use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::BookingId;
use domain::{Booking, BookingStatus};
use tokio::sync::RwLock;

use crate::{
    error::{Result, StoreError},
    store::BookingStore,
};

#[derive(Default)]
struct InMemoryState {
    bookings: HashMap<BookingId, Booking>,
    fail_on_create: bool,
    fail_on_update: bool,
}

/// In-memory booking store implementation for testing.
///
/// Stores all rows in memory and provides the same interface as the
/// PostgreSQL implementation, plus switches to simulate a lost database
/// connection on writes.
#[derive(Clone, Default)]
pub struct InMemoryBookingStore {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryBookingStore {
    /// Creates a new empty in-memory booking store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of booking rows stored.
    pub async fn booking_count(&self) -> usize {
        self.state.read().await.bookings.len()
    }

    /// Returns true if a row exists for the given ID.
    pub async fn contains(&self, id: BookingId) -> bool {
        self.state.read().await.bookings.contains_key(&id)
    }

    /// Returns all stored rows.
    pub async fn bookings(&self) -> Vec<Booking> {
        self.state.read().await.bookings.values().cloned().collect()
    }

    /// Configures inserts to fail as if the database were unreachable.
    pub async fn set_fail_on_create(&self, fail: bool) {
        self.state.write().await.fail_on_create = fail;
    }

    /// Configures status updates to fail as if the database were unreachable.
    pub async fn set_fail_on_update(&self, fail: bool) {
        self.state.write().await.fail_on_update = fail;
    }

    /// Clears all rows.
    pub async fn clear(&self) {
        self.state.write().await.bookings.clear();
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn create_booking(&self, booking: &Booking) -> Result<()> {
        let mut state = self.state.write().await;

        if state.fail_on_create {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        if state.bookings.contains_key(&booking.id) {
            return Err(StoreError::AlreadyExists(booking.id));
        }

        state.bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn get_booking(&self, id: BookingId) -> Result<Booking> {
        self.state
            .read()
            .await
            .bookings
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn update_booking_status(&self, id: BookingId, status: BookingStatus) -> Result<()> {
        let mut state = self.state.write().await;

        if state.fail_on_update {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }

        let booking = state.bookings.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        booking.status = status;
        booking.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use domain::{CreateBookingInput, ResourceId, UserId};

    fn sample_booking() -> Booking {
        let start = Utc::now();
        Booking::new(CreateBookingInput {
            user_id: UserId::new(),
            resource_id: ResourceId::new(),
            start_time: start,
            end_time: start + Duration::hours(1),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_roundtrip() {
        let store = InMemoryBookingStore::new();
        let booking = sample_booking();

        store.create_booking(&booking).await.unwrap();

        let fetched = store.get_booking(booking.id).await.unwrap();
        assert_eq!(fetched, booking);
        assert_eq!(store.booking_count().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_create_fails() {
        let store = InMemoryBookingStore::new();
        let booking = sample_booking();

        store.create_booking(&booking).await.unwrap();
        let err = store.create_booking(&booking).await.unwrap_err();

        assert!(matches!(err, StoreError::AlreadyExists(id) if id == booking.id));
        assert_eq!(store.booking_count().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing_booking() {
        let store = InMemoryBookingStore::new();
        let id = BookingId::new();

        let err = store.get_booking(id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_update_status_refreshes_updated_at() {
        let store = InMemoryBookingStore::new();
        let booking = sample_booking();
        store.create_booking(&booking).await.unwrap();

        store
            .update_booking_status(booking.id, BookingStatus::Paid)
            .await
            .unwrap();

        let fetched = store.get_booking(booking.id).await.unwrap();
        assert_eq!(fetched.status, BookingStatus::Paid);
        assert!(fetched.updated_at >= booking.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_booking() {
        let store = InMemoryBookingStore::new();
        let id = BookingId::new();

        let err = store
            .update_booking_status(id, BookingStatus::Canceled)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_fail_on_create() {
        let store = InMemoryBookingStore::new();
        store.set_fail_on_create(true).await;

        let err = store.create_booking(&sample_booking()).await.unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
        assert_eq!(store.booking_count().await, 0);
    }

    #[tokio::test]
    async fn test_fail_on_update() {
        let store = InMemoryBookingStore::new();
        let booking = sample_booking();
        store.create_booking(&booking).await.unwrap();
        store.set_fail_on_update(true).await;

        let err = store
            .update_booking_status(booking.id, BookingStatus::Paid)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));

        let fetched = store.get_booking(booking.id).await.unwrap();
        assert_eq!(fetched.status, BookingStatus::PendingPayment);
    }
}
