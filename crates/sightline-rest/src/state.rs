//! Application state for Axum handlers.

use sightline_core::HealthCheck;
use sightline_service::ProfileLookupService;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub profile_service: Arc<dyn ProfileLookupService>,
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(profile_service: Arc<dyn ProfileLookupService>) -> Self {
        Self {
            profile_service,
            health_checks: Vec::new(),
        }
    }

    /// Adds a dependency probed by the readiness endpoint.
    #[must_use]
    pub fn with_health_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health_checks.push(check);
        self
    }
}
