//! Booking orchestrator for the create/cancel/status workflows.

use booking_store::{BookingStore, StoreError};
use common::BookingId;
use domain::{BOOKING_PRICE, Booking, BookingStatus, CreateBookingInput, UserId};

use crate::compensation::{CompensationAction, CompensationLog};
use crate::error::BookingError;
use crate::services::inventory::{InventoryService, ResourceStatus};
use crate::services::payment::{ChargeOutcome, PaymentService};

/// Drives the booking lifecycle as a sequence of collaborator calls with
/// explicit compensation, and answers status/cancel requests against
/// persisted state.
///
/// The orchestrator is stateless: all shared state lives in the store and
/// the remote collaborators, so one instance serves concurrent requests.
pub struct BookingOrchestrator<S, I, P>
where
    S: BookingStore,
    I: InventoryService,
    P: PaymentService,
{
    store: S,
    inventory: I,
    payment: P,
}

impl<S, I, P> BookingOrchestrator<S, I, P>
where
    S: BookingStore,
    I: InventoryService,
    P: PaymentService,
{
    /// Creates a new booking orchestrator.
    pub fn new(store: S, inventory: I, payment: P) -> Self {
        Self {
            store,
            inventory,
            payment,
        }
    }

    /// Executes the booking-creation workflow.
    ///
    /// Order: availability check → persist row → reserve in inventory →
    /// charge. Compensation only ever unwinds the inventory reservation
    /// and the booking row, never a payment.
    ///
    /// Known limitation: if the reserve call fails after the row has been
    /// inserted, the row is left in `pending_payment` and nothing
    /// reconciles it later.
    ///
    /// Returns the paid booking together with the payment reference.
    #[tracing::instrument(
        skip(self, input),
        fields(user_id = %input.user_id, resource_id = %input.resource_id)
    )]
    pub async fn create(
        &self,
        input: CreateBookingInput,
    ) -> Result<(Booking, String), BookingError> {
        metrics::counter!("booking_create_total").increment(1);
        let started = std::time::Instant::now();

        input.validate()?;
        let resource_id = input.resource_id;

        // 1. Availability gate, before any side effect.
        let available = self.inventory.check_availability(resource_id).await?;
        if !available {
            tracing::info!(%resource_id, "resource not available");
            return Err(BookingError::ResourceUnavailable(resource_id));
        }

        // 2. Persist the booking in its initial state.
        let mut booking = Booking::new(input)?;
        self.store.create_booking(&booking).await?;

        let mut compensations = CompensationLog::new();
        compensations.record(CompensationAction::CancelBooking(booking.id));

        // 3. Reserve the resource in inventory.
        if let Err(e) = self
            .inventory
            .update_status(resource_id, ResourceStatus::Booked)
            .await
        {
            // The row inserted above stays in pending_payment; nothing
            // reconciles it later.
            tracing::error!(booking_id = %booking.id, error = %e, "inventory reserve failed");
            return Err(e);
        }
        compensations.record(CompensationAction::ReleaseResource(resource_id));

        // 4. Charge. The one step that is never retried or unwound.
        match self
            .payment
            .charge(booking.id, booking.user_id, BOOKING_PRICE)
            .await
        {
            Ok(ChargeOutcome::Approved { payment_id }) => {
                booking.transition_to(BookingStatus::Paid)?;
                self.store
                    .update_booking_status(booking.id, BookingStatus::Paid)
                    .await?;

                metrics::counter!("booking_create_completed").increment(1);
                metrics::histogram!("booking_create_duration_seconds")
                    .record(started.elapsed().as_secs_f64());
                tracing::info!(booking_id = %booking.id, %payment_id, "booking created and paid");
                Ok((booking, payment_id))
            }
            Ok(ChargeOutcome::Declined { reason }) => {
                tracing::warn!(booking_id = %booking.id, %reason, "payment declined");
                compensations.unwind(&self.store, &self.inventory).await;

                metrics::counter!("booking_create_compensated").increment(1);
                metrics::histogram!("booking_create_duration_seconds")
                    .record(started.elapsed().as_secs_f64());
                Err(BookingError::PaymentDeclined {
                    booking_id: booking.id,
                    reason,
                })
            }
            Err(e) => {
                tracing::error!(booking_id = %booking.id, error = %e, "payment call failed");
                compensations.unwind(&self.store, &self.inventory).await;

                metrics::counter!("booking_create_compensated").increment(1);
                metrics::histogram!("booking_create_duration_seconds")
                    .record(started.elapsed().as_secs_f64());
                Err(e)
            }
        }
    }

    /// Cancels a booking on behalf of its owner and releases the resource.
    ///
    /// The inventory release is the primary effect here, not a rollback;
    /// its failure is surfaced to the caller.
    #[tracing::instrument(skip(self))]
    pub async fn cancel(
        &self,
        booking_id: BookingId,
        requester: UserId,
    ) -> Result<(), BookingError> {
        let mut booking = self.fetch(booking_id).await?;

        if !booking.is_owned_by(requester) {
            tracing::info!(%booking_id, user_id = %requester, "cancel denied: not the owner");
            return Err(BookingError::NotOwner {
                booking_id,
                user_id: requester,
            });
        }

        booking.transition_to(BookingStatus::Canceled)?;
        self.store
            .update_booking_status(booking_id, BookingStatus::Canceled)
            .await?;

        self.inventory
            .update_status(booking.resource_id, ResourceStatus::Available)
            .await?;

        metrics::counter!("booking_canceled_total").increment(1);
        tracing::info!(%booking_id, "booking canceled and resource released");
        Ok(())
    }

    /// Returns the persisted status of a booking. Never mutates state.
    #[tracing::instrument(skip(self))]
    pub async fn get_status(&self, booking_id: BookingId) -> Result<BookingStatus, BookingError> {
        Ok(self.fetch(booking_id).await?.status)
    }

    async fn fetch(&self, booking_id: BookingId) -> Result<Booking, BookingError> {
        self.store.get_booking(booking_id).await.map_err(|e| match e {
            StoreError::NotFound(id) => BookingError::NotFound(id),
            other => BookingError::Store(other),
        })
    }
}
