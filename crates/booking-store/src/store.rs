use async_trait::async_trait;
use common::BookingId;
use domain::{Booking, BookingStatus};

use crate::Result;

/// Core trait for booking store implementations.
///
/// Each operation is atomic at the single-row level; no multi-row
/// transactions are offered. All implementations must be thread-safe
/// (Send + Sync).
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Persists a new booking row.
    ///
    /// Fails with `AlreadyExists` if a row with the booking's ID is
    /// already present.
    async fn create_booking(&self, booking: &Booking) -> Result<()>;

    /// Fetches a booking by ID.
    ///
    /// Fails with `NotFound` when no row exists.
    async fn get_booking(&self, id: BookingId) -> Result<Booking>;

    /// Sets a booking's status and refreshes its `updated_at` timestamp.
    ///
    /// Fails with `NotFound` when no row exists.
    async fn update_booking_status(&self, id: BookingId, status: BookingStatus) -> Result<()>;
}
