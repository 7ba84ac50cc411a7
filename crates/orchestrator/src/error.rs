//! Orchestrator error types.

use booking_store::StoreError;
use common::BookingId;
use domain::{DomainError, ResourceId, UserId};
use thiserror::Error;

/// Errors that can occur while driving the booking workflows.
#[derive(Debug, Error)]
pub enum BookingError {
    /// No booking exists with the given ID.
    #[error("Booking not found: {0}")]
    NotFound(BookingId),

    /// The resource reported unavailable at check time.
    #[error("Resource not available: {0}")]
    ResourceUnavailable(ResourceId),

    /// The requester does not own the booking.
    #[error("User {user_id} is not the owner of booking {booking_id}")]
    NotOwner {
        booking_id: BookingId,
        user_id: UserId,
    },

    /// The payment system refused the charge.
    #[error("Payment declined for booking {booking_id}: {reason}")]
    PaymentDeclined {
        booking_id: BookingId,
        reason: String,
    },

    /// Inventory service error.
    #[error("Inventory service error: {0}")]
    InventoryService(String),

    /// Payment service error.
    #[error("Payment service error: {0}")]
    PaymentService(String),

    /// Booking store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Domain rule violation.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

/// Convenience type alias for workflow results.
pub type Result<T> = std::result::Result<T, BookingError>;
