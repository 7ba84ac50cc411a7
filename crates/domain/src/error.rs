//! Domain error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::status::BookingStatus;

/// Errors that can occur when applying domain rules.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The requested time window does not end after it starts.
    #[error("End time {end} is not after start time {start}")]
    InvalidTimeWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// The status state machine does not allow the requested transition.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStatusTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// A status string does not name a known status.
    #[error("Unknown booking status: {0}")]
    UnknownStatus(String),
}
