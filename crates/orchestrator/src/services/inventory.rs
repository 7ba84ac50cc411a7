//! Inventory service trait, HTTP client, and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::ResourceId;
use serde::{Deserialize, Serialize};

use crate::error::BookingError;

/// Status token understood by the inventory system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceStatus {
    /// The resource is held by a booking.
    Booked,
    /// The resource can be booked.
    Available,
}

impl ResourceStatus {
    /// Returns the wire form of the token.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::Booked => "booked",
            ResourceStatus::Available => "available",
        }
    }
}

impl std::fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trait for the remote inventory capability.
///
/// The capability is at-least-once and non-transactional: repeated
/// identical status updates are harmless, and nothing stronger is assumed.
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Returns whether the resource can currently be booked.
    async fn check_availability(&self, resource_id: ResourceId) -> Result<bool, BookingError>;

    /// Sets the resource's status.
    async fn update_status(
        &self,
        resource_id: ResourceId,
        status: ResourceStatus,
    ) -> Result<(), BookingError>;
}

/// HTTP client for the inventory service.
pub struct HttpInventoryClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct AvailabilityResponse {
    is_available: bool,
}

#[derive(Serialize)]
struct UpdateStatusRequest<'a> {
    status: &'a str,
}

impl HttpInventoryClient {
    /// Creates a new client for the inventory service at `base_url`.
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
impl InventoryService for HttpInventoryClient {
    async fn check_availability(&self, resource_id: ResourceId) -> Result<bool, BookingError> {
        let url = format!("{}/resources/{}/availability", self.base_url, resource_id);

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| BookingError::InventoryService(e.to_string()))?
            .error_for_status()
            .map_err(|e| BookingError::InventoryService(e.to_string()))?;

        let body: AvailabilityResponse = response
            .json()
            .await
            .map_err(|e| BookingError::InventoryService(e.to_string()))?;

        Ok(body.is_available)
    }

    async fn update_status(
        &self,
        resource_id: ResourceId,
        status: ResourceStatus,
    ) -> Result<(), BookingError> {
        let url = format!("{}/resources/{}/status", self.base_url, resource_id);

        self.authorize(self.client.post(&url))
            .json(&UpdateStatusRequest {
                status: status.as_str(),
            })
            .send()
            .await
            .map_err(|e| BookingError::InventoryService(e.to_string()))?
            .error_for_status()
            .map_err(|e| BookingError::InventoryService(e.to_string()))?;

        Ok(())
    }
}

#[derive(Debug, Default)]
struct InMemoryInventoryState {
    availability: HashMap<ResourceId, bool>,
    statuses: HashMap<ResourceId, ResourceStatus>,
    fail_on_check: bool,
    fail_on_update: bool,
}

/// In-memory inventory service for testing.
///
/// Unknown resources report as available.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventoryService {
    state: Arc<RwLock<InMemoryInventoryState>>,
}

impl InMemoryInventoryService {
    /// Creates a new in-memory inventory service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether a resource reports as available.
    pub fn set_available(&self, resource_id: ResourceId, available: bool) {
        self.state
            .write()
            .unwrap()
            .availability
            .insert(resource_id, available);
    }

    /// Configures the availability check to fail.
    pub fn set_fail_on_check(&self, fail: bool) {
        self.state.write().unwrap().fail_on_check = fail;
    }

    /// Configures status updates to fail.
    pub fn set_fail_on_update(&self, fail: bool) {
        self.state.write().unwrap().fail_on_update = fail;
    }

    /// Returns the last status written for a resource.
    pub fn status_of(&self, resource_id: ResourceId) -> Option<ResourceStatus> {
        self.state.read().unwrap().statuses.get(&resource_id).copied()
    }
}

#[async_trait]
impl InventoryService for InMemoryInventoryService {
    async fn check_availability(&self, resource_id: ResourceId) -> Result<bool, BookingError> {
        let state = self.state.read().unwrap();

        if state.fail_on_check {
            return Err(BookingError::InventoryService(
                "inventory unreachable".to_string(),
            ));
        }

        Ok(state.availability.get(&resource_id).copied().unwrap_or(true))
    }

    async fn update_status(
        &self,
        resource_id: ResourceId,
        status: ResourceStatus,
    ) -> Result<(), BookingError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_update {
            return Err(BookingError::InventoryService(
                "inventory unreachable".to_string(),
            ));
        }

        let available = matches!(status, ResourceStatus::Available);
        state.availability.insert(resource_id, available);
        state.statuses.insert(resource_id, status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_resource_is_available() {
        let service = InMemoryInventoryService::new();
        let resource_id = ResourceId::new();

        assert!(service.check_availability(resource_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_booking_makes_resource_unavailable() {
        let service = InMemoryInventoryService::new();
        let resource_id = ResourceId::new();

        service
            .update_status(resource_id, ResourceStatus::Booked)
            .await
            .unwrap();

        assert!(!service.check_availability(resource_id).await.unwrap());
        assert_eq!(service.status_of(resource_id), Some(ResourceStatus::Booked));

        service
            .update_status(resource_id, ResourceStatus::Available)
            .await
            .unwrap();

        assert!(service.check_availability(resource_id).await.unwrap());
        assert_eq!(
            service.status_of(resource_id),
            Some(ResourceStatus::Available)
        );
    }

    #[tokio::test]
    async fn test_fail_on_check() {
        let service = InMemoryInventoryService::new();
        service.set_fail_on_check(true);

        let result = service.check_availability(ResourceId::new()).await;
        assert!(matches!(result, Err(BookingError::InventoryService(_))));
    }

    #[tokio::test]
    async fn test_fail_on_update() {
        let service = InMemoryInventoryService::new();
        let resource_id = ResourceId::new();
        service.set_fail_on_update(true);

        let result = service
            .update_status(resource_id, ResourceStatus::Booked)
            .await;
        assert!(matches!(result, Err(BookingError::InventoryService(_))));
        assert_eq!(service.status_of(resource_id), None);
    }

    #[test]
    fn test_status_wire_strings() {
        assert_eq!(ResourceStatus::Booked.as_str(), "booked");
        assert_eq!(ResourceStatus::Available.as_str(), "available");
    }
}
