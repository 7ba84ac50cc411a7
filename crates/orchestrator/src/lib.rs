//! Booking orchestration core.
//!
//! This crate drives the booking-creation workflow across three
//! independently-failing collaborators:
//! 1. Check resource availability in inventory
//! 2. Persist the booking in `pending_payment`
//! 3. Mark the resource booked in inventory
//! 4. Charge the payment
//!
//! If the charge fails or is declined, the completed steps are unwound in
//! reverse order (resource released, booking row canceled) and the original
//! failure is what the caller sees. The charge is the final step; nothing
//! ever compensates a payment.

pub mod compensation;
pub mod coordinator;
pub mod error;
pub mod services;

pub use compensation::{CompensationAction, CompensationLog};
pub use coordinator::BookingOrchestrator;
pub use error::BookingError;
pub use services::{
    ChargeOutcome, HttpInventoryClient, HttpPaymentClient, InMemoryInventoryService,
    InMemoryPaymentService, InventoryService, PaymentService, ResourceStatus,
};
