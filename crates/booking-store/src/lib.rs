//! Booking store implementations for the booking service.
//!
//! The store is pure CRUD over booking rows: create, fetch by identity,
//! and update a row's status. Transition legality is the domain's concern;
//! nothing here applies business rules.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryBookingStore;
pub use postgres::PostgresBookingStore;
pub use store::BookingStore;
