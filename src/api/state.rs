//! Application state for the rotation API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::service::RotationService;

/// Shared application state.
///
/// Holds the rotation service; the fetcher and configuration live inside it.
#[derive(Clone)]
pub struct AppState {
    service: Arc<RotationService>,
}

impl AppState {
    /// Creates a new application state around a rotation service.
    pub fn new(service: RotationService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Returns the rotation service.
    pub fn service(&self) -> &RotationService {
        &self.service
    }
}
