//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p booking-store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use booking_store::{BookingStore, PostgresBookingStore, StoreError};
use chrono::{Duration, Utc};
use common::BookingId;
use domain::{Booking, BookingStatus, CreateBookingInput, ResourceId, UserId};
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Create a temporary pool just for migrations
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_bookings_table.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and a cleared table
async fn get_test_store() -> PostgresBookingStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    // Clear table for test isolation
    sqlx::query("TRUNCATE TABLE bookings")
        .execute(&pool)
        .await
        .unwrap();

    PostgresBookingStore::new(pool)
}

fn create_test_booking() -> Booking {
    let start = Utc::now();
    Booking::new(CreateBookingInput {
        user_id: UserId::new(),
        resource_id: ResourceId::new(),
        start_time: start,
        end_time: start + Duration::hours(1),
    })
    .unwrap()
}

#[tokio::test]
async fn insert_and_fetch_booking() {
    let store = get_test_store().await;
    let booking = create_test_booking();

    store.create_booking(&booking).await.unwrap();

    let fetched = store.get_booking(booking.id).await.unwrap();
    assert_eq!(fetched.id, booking.id);
    assert_eq!(fetched.user_id, booking.user_id);
    assert_eq!(fetched.resource_id, booking.resource_id);
    assert_eq!(fetched.status, BookingStatus::PendingPayment);
    assert_eq!(
        fetched.start_time.timestamp_micros(),
        booking.start_time.timestamp_micros()
    );
    assert_eq!(
        fetched.end_time.timestamp_micros(),
        booking.end_time.timestamp_micros()
    );
}

#[tokio::test]
async fn duplicate_insert_is_rejected() {
    let store = get_test_store().await;
    let booking = create_test_booking();

    store.create_booking(&booking).await.unwrap();
    let err = store.create_booking(&booking).await.unwrap_err();

    assert!(matches!(err, StoreError::AlreadyExists(id) if id == booking.id));
}

#[tokio::test]
async fn fetch_missing_booking_is_not_found() {
    let store = get_test_store().await;
    let id = BookingId::new();

    let err = store.get_booking(id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(missing) if missing == id));
}

#[tokio::test]
async fn update_status_persists_and_refreshes_updated_at() {
    let store = get_test_store().await;
    let booking = create_test_booking();
    store.create_booking(&booking).await.unwrap();

    store
        .update_booking_status(booking.id, BookingStatus::Canceled)
        .await
        .unwrap();

    let fetched = store.get_booking(booking.id).await.unwrap();
    assert_eq!(fetched.status, BookingStatus::Canceled);
    assert!(fetched.updated_at >= fetched.created_at);
}

#[tokio::test]
async fn update_missing_booking_is_not_found() {
    let store = get_test_store().await;
    let id = BookingId::new();

    let err = store
        .update_booking_status(id, BookingStatus::Canceled)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(missing) if missing == id));
}

#[tokio::test]
async fn each_update_is_independent() {
    let store = get_test_store().await;
    let a = create_test_booking();
    let b = create_test_booking();
    store.create_booking(&a).await.unwrap();
    store.create_booking(&b).await.unwrap();

    store
        .update_booking_status(a.id, BookingStatus::Paid)
        .await
        .unwrap();

    assert_eq!(
        store.get_booking(a.id).await.unwrap().status,
        BookingStatus::Paid
    );
    assert_eq!(
        store.get_booking(b.id).await.unwrap().status,
        BookingStatus::PendingPayment
    );
}
