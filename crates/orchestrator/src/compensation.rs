//! Compensating actions for unwinding a partially completed create workflow.

use booking_store::BookingStore;
use common::BookingId;
use domain::{BookingStatus, ResourceId};

use crate::services::inventory::{InventoryService, ResourceStatus};

/// Reversal of a single completed forward step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompensationAction {
    /// Set the booking row's status to canceled.
    CancelBooking(BookingId),

    /// Mark the resource available again in inventory.
    ReleaseResource(ResourceId),
}

/// Reversal actions recorded as forward steps complete.
///
/// `unwind` executes the recorded actions in reverse order of recording.
/// Every action is best-effort: a failed compensation is logged and the
/// remaining actions still run, so the workflow error that triggered the
/// unwind stays the reported cause.
#[derive(Debug, Default)]
pub struct CompensationLog {
    actions: Vec<CompensationAction>,
}

impl CompensationLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the reversal for a just-completed forward step.
    pub fn record(&mut self, action: CompensationAction) {
        self.actions.push(action);
    }

    /// Returns the recorded actions, oldest first.
    pub fn actions(&self) -> &[CompensationAction] {
        &self.actions
    }

    /// Runs all recorded reversals, newest first.
    pub async fn unwind<S, I>(self, store: &S, inventory: &I)
    where
        S: BookingStore,
        I: InventoryService,
    {
        for action in self.actions.into_iter().rev() {
            match action {
                CompensationAction::CancelBooking(booking_id) => {
                    if let Err(e) = store
                        .update_booking_status(booking_id, BookingStatus::Canceled)
                        .await
                    {
                        tracing::warn!(
                            %booking_id,
                            error = %e,
                            "compensation failed: booking row not canceled"
                        );
                    }
                }
                CompensationAction::ReleaseResource(resource_id) => {
                    if let Err(e) = inventory
                        .update_status(resource_id, ResourceStatus::Available)
                        .await
                    {
                        tracing::warn!(
                            %resource_id,
                            error = %e,
                            "compensation failed: resource not released"
                        );
                    }
                }
            }
        }
    }
}
