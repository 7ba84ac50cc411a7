//! Booking creation, cancellation, and status endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use booking_store::BookingStore;
use chrono::{DateTime, Utc};
use common::BookingId;
use domain::{BookingStatus, CreateBookingInput, ResourceId};
use orchestrator::{BookingOrchestrator, InventoryService, PaymentService};
use serde::{Deserialize, Serialize};

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S, I, P>
where
    S: BookingStore,
    I: InventoryService,
    P: PaymentService,
{
    pub orchestrator: BookingOrchestrator<S, I, P>,
}

// -- Request types --

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub resource_id: String,
    pub start_time: String,
    pub end_time: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct CreateBookingResponse {
    pub booking_id: String,
    pub status: String,
    pub payment_reference: String,
}

#[derive(Serialize)]
pub struct CancelBookingResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct BookingStatusResponse {
    pub status: String,
}

// -- Handlers --

/// POST /bookings — run the create workflow for the authenticated user.
#[tracing::instrument(skip(state, req))]
pub async fn create<S, I, P>(
    State(state): State<Arc<AppState<S, I, P>>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), ApiError>
where
    S: BookingStore + 'static,
    I: InventoryService + 'static,
    P: PaymentService + 'static,
{
    let resource_id = parse_resource_id(&req.resource_id)?;
    let start_time = parse_timestamp("start_time", &req.start_time)?;
    let end_time = parse_timestamp("end_time", &req.end_time)?;

    if end_time <= start_time {
        return Err(ApiError::BadRequest(
            "end_time must be after start_time".to_string(),
        ));
    }

    let input = CreateBookingInput {
        user_id,
        resource_id,
        start_time,
        end_time,
    };

    let (booking, payment_reference) = state.orchestrator.create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateBookingResponse {
            booking_id: booking.id.to_string(),
            status: booking.status.as_str().to_string(),
            payment_reference,
        }),
    ))
}

/// POST /bookings/:id/cancel — cancel a booking owned by the caller.
#[tracing::instrument(skip(state))]
pub async fn cancel<S, I, P>(
    State(state): State<Arc<AppState<S, I, P>>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<CancelBookingResponse>, ApiError>
where
    S: BookingStore + 'static,
    I: InventoryService + 'static,
    P: PaymentService + 'static,
{
    let booking_id = parse_booking_id(&id)?;

    state.orchestrator.cancel(booking_id, user_id).await?;

    Ok(Json(CancelBookingResponse {
        status: BookingStatus::Canceled.as_str().to_string(),
    }))
}

/// GET /bookings/:id/status — look up a booking's current status.
#[tracing::instrument(skip(state))]
pub async fn status<S, I, P>(
    State(state): State<Arc<AppState<S, I, P>>>,
    Path(id): Path<String>,
) -> Result<Json<BookingStatusResponse>, ApiError>
where
    S: BookingStore + 'static,
    I: InventoryService + 'static,
    P: PaymentService + 'static,
{
    let booking_id = parse_booking_id(&id)?;

    let status = state.orchestrator.get_status(booking_id).await?;

    Ok(Json(BookingStatusResponse {
        status: status.as_str().to_string(),
    }))
}

fn parse_booking_id(id: &str) -> Result<BookingId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid booking id: {e}")))?;
    Ok(BookingId::from_uuid(uuid))
}

fn parse_resource_id(id: &str) -> Result<ResourceId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid resource_id: {e}")))?;
    Ok(ResourceId::from_uuid(uuid))
}

fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| ApiError::BadRequest(format!("Invalid {field}: {e}")))
}
