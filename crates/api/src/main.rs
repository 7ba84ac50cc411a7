//! Booking service entry point.

use std::sync::Arc;

use booking_store::PostgresBookingStore;
use orchestrator::{BookingOrchestrator, HttpInventoryClient, HttpPaymentClient};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use api::auth::{AuthVerifier, HttpAuthVerifier};
use api::config::Config;
use api::routes::bookings::AppState;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Connect to the booking store and run migrations
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let store = PostgresBookingStore::new(pool);
    store.run_migrations().await.expect("migrations failed");

    // 4. Wire up the collaborators and the orchestrator
    let mut inventory = HttpInventoryClient::new(config.inventory_url.clone());
    let mut payment = HttpPaymentClient::new(config.payment_url.clone());
    if let Some(token) = &config.service_token {
        inventory = inventory.with_token(token.clone());
        payment = payment.with_token(token.clone());
    }
    let orchestrator = BookingOrchestrator::new(store, inventory, payment);

    let state = Arc::new(AppState { orchestrator });
    let auth: Arc<dyn AuthVerifier> = Arc::new(HttpAuthVerifier::new(config.auth_url.clone()));

    // 5. Build the application
    let app = api::create_app(state, auth, metrics_handle);

    // 6. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting booking service");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
