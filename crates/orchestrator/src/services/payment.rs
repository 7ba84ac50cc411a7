//! Payment service trait, HTTP client, and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::BookingId;
use domain::{Money, UserId};
use serde::{Deserialize, Serialize};

use crate::error::BookingError;

/// Result of a charge attempt that reached the payment system.
///
/// A declined charge is a normal business outcome, distinct from the `Err`
/// branch of [`PaymentService::charge`], which means the call itself failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargeOutcome {
    /// The charge went through; `payment_id` is the processor's reference.
    Approved { payment_id: String },

    /// The payment system refused the charge.
    Declined { reason: String },
}

/// Trait for the remote payment capability.
///
/// The charge is attempted exactly once per workflow; no retry and no
/// refund operation is part of this contract.
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Charges `amount` for a booking/user pair.
    async fn charge(
        &self,
        booking_id: BookingId,
        user_id: UserId,
        amount: Money,
    ) -> Result<ChargeOutcome, BookingError>;
}

/// HTTP client for the payment service.
pub struct HttpPaymentClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChargeRequest {
    booking_id: BookingId,
    user_id: UserId,
    amount_cents: i64,
}

#[derive(Deserialize)]
struct ChargeResponse {
    status: String,
    #[serde(default)]
    payment_id: String,
    #[serde(default)]
    reason: Option<String>,
}

impl HttpPaymentClient {
    /// Creates a new client for the payment service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            client: reqwest::Client::new(),
        }
    }

    /// Attaches a bearer token sent with every call.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

#[async_trait]
impl PaymentService for HttpPaymentClient {
    async fn charge(
        &self,
        booking_id: BookingId,
        user_id: UserId,
        amount: Money,
    ) -> Result<ChargeOutcome, BookingError> {
        let url = format!("{}/payments", self.base_url);

        let response = self
            .authorize(self.client.post(&url))
            .json(&ChargeRequest {
                booking_id,
                user_id,
                amount_cents: amount.cents(),
            })
            .send()
            .await
            .map_err(|e| BookingError::PaymentService(e.to_string()))?
            .error_for_status()
            .map_err(|e| BookingError::PaymentService(e.to_string()))?;

        let body: ChargeResponse = response
            .json()
            .await
            .map_err(|e| BookingError::PaymentService(e.to_string()))?;

        if body.status == "failed" {
            return Ok(ChargeOutcome::Declined {
                reason: body
                    .reason
                    .unwrap_or_else(|| "payment declined".to_string()),
            });
        }

        Ok(ChargeOutcome::Approved {
            payment_id: body.payment_id,
        })
    }
}

#[derive(Debug, Default)]
struct InMemoryPaymentState {
    payments: HashMap<String, (BookingId, UserId, Money)>,
    next_id: u32,
    fail_on_charge: bool,
    decline: bool,
}

/// In-memory payment service for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentService {
    state: Arc<RwLock<InMemoryPaymentState>>,
}

impl InMemoryPaymentService {
    /// Creates a new in-memory payment service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures charge calls to fail at the transport level.
    pub fn set_fail_on_charge(&self, fail: bool) {
        self.state.write().unwrap().fail_on_charge = fail;
    }

    /// Configures charge calls to come back declined.
    pub fn set_decline(&self, decline: bool) {
        self.state.write().unwrap().decline = decline;
    }

    /// Returns the number of recorded payments.
    pub fn payment_count(&self) -> usize {
        self.state.read().unwrap().payments.len()
    }

    /// Returns true if a payment exists with the given ID.
    pub fn has_payment(&self, payment_id: &str) -> bool {
        self.state.read().unwrap().payments.contains_key(payment_id)
    }
}

#[async_trait]
impl PaymentService for InMemoryPaymentService {
    async fn charge(
        &self,
        booking_id: BookingId,
        user_id: UserId,
        amount: Money,
    ) -> Result<ChargeOutcome, BookingError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_charge {
            return Err(BookingError::PaymentService(
                "payment service unreachable".to_string(),
            ));
        }

        if state.decline {
            return Ok(ChargeOutcome::Declined {
                reason: "card declined".to_string(),
            });
        }

        state.next_id += 1;
        let payment_id = format!("PAY-{:04}", state.next_id);
        state
            .payments
            .insert(payment_id.clone(), (booking_id, user_id, amount));

        Ok(ChargeOutcome::Approved { payment_id })
    }
}
