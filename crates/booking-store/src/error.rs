use common::BookingId;
use thiserror::Error;

/// Errors that can occur when interacting with the booking store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No booking row exists for the given ID.
    #[error("Booking not found: {0}")]
    NotFound(BookingId),

    /// A booking row with the given ID already exists.
    #[error("Booking already exists: {0}")]
    AlreadyExists(BookingId),

    /// A stored row carries a status string the domain does not know.
    #[error("Invalid stored status: {0}")]
    InvalidStatus(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for booking store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
