//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::VehicleRepository;
use crate::services::VehicleService;

#[derive(Clone)]
pub struct AppState {
    pub vehicle_service: Arc<VehicleService>,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(repository: Arc<dyn VehicleRepository>, config: EnvironmentConfig) -> Self {
        Self {
            vehicle_service: Arc::new(VehicleService::new(repository)),
            config,
        }
    }
}
