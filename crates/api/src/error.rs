//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;
use orchestrator::BookingError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request input.
    BadRequest(String),
    /// Missing or invalid credentials.
    Unauthenticated(String),
    /// Booking workflow error.
    Booking(BookingError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Booking(err) => booking_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn booking_error_to_response(err: BookingError) -> (StatusCode, String) {
    let status = match &err {
        BookingError::NotFound(_) => StatusCode::NOT_FOUND,
        BookingError::NotOwner { .. } => StatusCode::FORBIDDEN,
        BookingError::ResourceUnavailable(_) => StatusCode::PRECONDITION_FAILED,
        BookingError::PaymentDeclined { .. } => StatusCode::CONFLICT,
        BookingError::Domain(DomainError::InvalidTimeWindow { .. }) => StatusCode::BAD_REQUEST,
        BookingError::Domain(DomainError::InvalidStatusTransition { .. }) => {
            StatusCode::PRECONDITION_FAILED
        }
        BookingError::InventoryService(_)
        | BookingError::PaymentService(_)
        | BookingError::Store(_)
        | BookingError::Domain(_) => {
            tracing::error!(error = %err, "internal error");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, err.to_string())
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        ApiError::Booking(err)
    }
}
