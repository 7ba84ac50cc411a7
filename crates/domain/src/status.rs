//! Booking status state machine.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The status of a booking in its lifecycle.
///
/// Status transitions:
/// ```text
/// PendingPayment ──┬──► Reserved ──► Paid ──► Canceled
///                  ├────────────────► Paid
///                  └──► Canceled ◄─── Reserved
/// ```
///
/// `Canceled` is terminal. `Paid` ends the create workflow but the owner
/// may still cancel a paid booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Booking row exists, payment has not been taken yet.
    #[default]
    PendingPayment,

    /// The resource is held in inventory, awaiting payment.
    Reserved,

    /// Payment confirmed; the booking is committed.
    Paid,

    /// The booking was canceled and the resource released (terminal state).
    Canceled,
}

impl BookingStatus {
    /// Returns true if the state machine allows moving to `next`.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (PendingPayment, Reserved)
                | (PendingPayment, Paid)
                | (PendingPayment, Canceled)
                | (Reserved, Paid)
                | (Reserved, Canceled)
                | (Paid, Canceled)
        )
    }

    /// Returns true if the booking can still be canceled.
    pub fn can_cancel(&self) -> bool {
        self.can_transition_to(BookingStatus::Canceled)
    }

    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Canceled)
    }

    /// Returns the wire form of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::PendingPayment => "pending_payment",
            BookingStatus::Reserved => "reserved",
            BookingStatus::Paid => "paid",
            BookingStatus::Canceled => "canceled",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_payment" => Ok(BookingStatus::PendingPayment),
            "reserved" => Ok(BookingStatus::Reserved),
            "paid" => Ok(BookingStatus::Paid),
            "canceled" => Ok(BookingStatus::Canceled),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}
