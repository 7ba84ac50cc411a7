//! HTTP request boundary for the booking service.
//!
//! Translates inbound requests into orchestrator calls and orchestrator
//! results into wire responses, with bearer-token authentication,
//! structured logging (tracing) and Prometheus metrics.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use booking_store::BookingStore;
use metrics_exporter_prometheus::PrometheusHandle;
use orchestrator::{InventoryService, PaymentService};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use auth::AuthVerifier;
use routes::bookings::AppState;

/// Creates the Axum application router with all routes and shared state.
///
/// The booking routes run behind the auth middleware; `/health` and
/// `/metrics` are open.
pub fn create_app<S, I, P>(
    state: Arc<AppState<S, I, P>>,
    auth: Arc<dyn AuthVerifier>,
    metrics_handle: PrometheusHandle,
) -> Router
where
    S: BookingStore + 'static,
    I: InventoryService + 'static,
    P: PaymentService + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    let bookings = Router::new()
        .route("/bookings", post(routes::bookings::create::<S, I, P>))
        .route(
            "/bookings/{id}/cancel",
            post(routes::bookings::cancel::<S, I, P>),
        )
        .route(
            "/bookings/{id}/status",
            get(routes::bookings::status::<S, I, P>),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            auth,
            auth::require_auth,
        ))
        .with_state(state);

    Router::new()
        .route("/health", get(routes::health::check))
        .merge(bookings)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
