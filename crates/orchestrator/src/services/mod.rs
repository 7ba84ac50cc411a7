//! Collaborator contracts and implementations for the booking workflow.

pub mod inventory;
pub mod payment;

pub use inventory::{
    HttpInventoryClient, InMemoryInventoryService, InventoryService, ResourceStatus,
};
pub use payment::{ChargeOutcome, HttpPaymentClient, InMemoryPaymentService, PaymentService};
