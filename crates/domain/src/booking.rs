//! The booking entity and its creation input.

use chrono::{DateTime, Utc};
use common::BookingId;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::status::BookingStatus;
use crate::value_objects::{Money, ResourceId, UserId};

/// Price charged for every booking, in cents.
pub const BOOKING_PRICE: Money = Money::from_cents(10_000);

/// A reservation of a resource for a user over a time window.
///
/// The persisted row in the booking store is the single source of truth;
/// an in-memory value is only a transient copy taken during a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    pub resource_id: ResourceId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Creates a new booking in `PendingPayment` from validated input.
    ///
    /// Generates the booking identity and stamps both timestamps with the
    /// current UTC time.
    pub fn new(input: CreateBookingInput) -> Result<Self, DomainError> {
        input.validate()?;
        let now = Utc::now();

        Ok(Self {
            id: BookingId::new(),
            user_id: input.user_id,
            resource_id: input.resource_id,
            start_time: input.start_time,
            end_time: input.end_time,
            status: BookingStatus::PendingPayment,
            created_at: now,
            updated_at: now,
        })
    }

    /// Moves the booking to `next` and refreshes `updated_at`.
    ///
    /// Rejects transitions the state machine does not allow.
    pub fn transition_to(&mut self, next: BookingStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Returns true if `user` owns this booking.
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.user_id == user
    }
}

/// Input for the create workflow.
///
/// Carries no identity; consumed once when the booking is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBookingInput {
    pub user_id: UserId,
    pub resource_id: ResourceId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl CreateBookingInput {
    /// Checks that the requested window ends strictly after it starts.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.end_time <= self.start_time {
            return Err(DomainError::InvalidTimeWindow {
                start: self.start_time,
                end: self.end_time,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn valid_input() -> CreateBookingInput {
        let start = Utc::now();
        CreateBookingInput {
            user_id: UserId::new(),
            resource_id: ResourceId::new(),
            start_time: start,
            end_time: start + Duration::hours(1),
        }
    }

    #[test]
    fn test_new_booking_starts_pending_payment() {
        let input = valid_input();
        let booking = Booking::new(input.clone()).unwrap();

        assert_eq!(booking.status, BookingStatus::PendingPayment);
        assert_eq!(booking.user_id, input.user_id);
        assert_eq!(booking.resource_id, input.resource_id);
        assert_eq!(booking.created_at, booking.updated_at);
    }

    #[test]
    fn test_new_bookings_get_unique_ids() {
        let a = Booking::new(valid_input()).unwrap();
        let b = Booking::new(valid_input()).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_end_must_be_after_start() {
        let start = Utc::now();
        let input = CreateBookingInput {
            user_id: UserId::new(),
            resource_id: ResourceId::new(),
            start_time: start,
            end_time: start - Duration::minutes(30),
        };

        let err = Booking::new(input).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTimeWindow { .. }));
    }

    #[test]
    fn test_end_equal_to_start_is_rejected() {
        let start = Utc::now();
        let input = CreateBookingInput {
            user_id: UserId::new(),
            resource_id: ResourceId::new(),
            start_time: start,
            end_time: start,
        };

        assert!(input.validate().is_err());
    }

    #[test]
    fn test_transition_refreshes_updated_at() {
        let mut booking = Booking::new(valid_input()).unwrap();
        let before = booking.updated_at;

        booking.transition_to(BookingStatus::Paid).unwrap();

        assert_eq!(booking.status, BookingStatus::Paid);
        assert!(booking.updated_at >= before);
    }

    #[test]
    fn test_transition_rejects_illegal_moves() {
        let mut booking = Booking::new(valid_input()).unwrap();
        booking.transition_to(BookingStatus::Canceled).unwrap();

        let err = booking.transition_to(BookingStatus::Paid).unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidStatusTransition {
                from: BookingStatus::Canceled,
                to: BookingStatus::Paid,
            }
        ));
        assert_eq!(booking.status, BookingStatus::Canceled);
    }

    #[test]
    fn test_ownership_check() {
        let input = valid_input();
        let owner = input.user_id;
        let booking = Booking::new(input).unwrap();

        assert!(booking.is_owned_by(owner));
        assert!(!booking.is_owned_by(UserId::new()));
    }

    #[test]
    fn test_booking_serialization_roundtrip() {
        let booking = Booking::new(valid_input()).unwrap();
        let json = serde_json::to_string(&booking).unwrap();
        let deserialized: Booking = serde_json::from_str(&json).unwrap();
        assert_eq!(booking, deserialized);
    }

    #[test]
    fn test_booking_price_is_fixed() {
        assert_eq!(BOOKING_PRICE.cents(), 10_000);
        assert!(BOOKING_PRICE.is_positive());
    }
}
