//! Servicio de vehículos
//!
//! Reglas de negocio sobre la flota: validación de altas y modificaciones,
//! búsquedas por tipo y por área, y estadísticas agregadas.

use std::sync::Arc;

use serde_json::Value;

use crate::factories::VehicleFactory;
use crate::models::location::{BoundingBox, Location};
use crate::models::statistics::VehicleStatistics;
use crate::models::vehicle::{Vehicle, VehicleType};
use crate::repositories::VehicleRepository;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct VehicleService {
    repository: Arc<dyn VehicleRepository>,
}

impl VehicleService {
    pub fn new(repository: Arc<dyn VehicleRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_vehicle(&self, data: &Value) -> AppResult<Vehicle> {
        if !VehicleFactory::validate(data) {
            tracing::warn!("⚠️ Datos de vehículo inválidos en alta");
            return Err(AppError::InvalidData);
        }

        let vehicle = VehicleFactory::create(data)?;
        let saved = self.repository.save(&vehicle).await?;

        tracing::info!(
            "✅ Vehículo {} creado ({})",
            saved.id().unwrap_or_default(),
            saved.vehicle_type()
        );
        Ok(saved)
    }

    pub async fn get_vehicle_by_id(&self, id: &str) -> AppResult<Vehicle> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error(id))
    }

    pub async fn get_all_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        self.repository.find_all().await
    }

    pub async fn get_vehicles_by_type(&self, vehicle_type: &str) -> AppResult<Vec<Vehicle>> {
        let vehicle_type: VehicleType = vehicle_type.parse()?;
        self.repository.find_by_type(vehicle_type).await
    }

    /// Reemplaza el registro completo: los campos ausentes en `data` no se conservan
    pub async fn update_vehicle(&self, id: &str, data: &Value) -> AppResult<Vehicle> {
        if !self.repository.exists(id).await? {
            return Err(not_found_error(id));
        }

        if !VehicleFactory::validate(data) {
            tracing::warn!("⚠️ Datos de vehículo inválidos al actualizar {}", id);
            return Err(AppError::InvalidData);
        }

        let vehicle = VehicleFactory::create(data)?.with_id(id);

        // puede haber sido borrado entre la comprobación y la escritura
        let updated = self
            .repository
            .update(id, &vehicle)
            .await?
            .ok_or_else(|| not_found_error(id))?;

        tracing::info!("✏️ Vehículo {} actualizado", id);
        Ok(updated)
    }

    /// Las coordenadas se validan antes de consultar si el vehículo existe
    pub async fn update_vehicle_location(
        &self,
        id: &str,
        latitude: f64,
        longitude: f64,
    ) -> AppResult<Vehicle> {
        let location = Location::new(latitude, longitude)?;

        let updated = self
            .repository
            .update_location(id, location.latitude, location.longitude)
            .await?
            .ok_or_else(|| not_found_error(id))?;

        tracing::debug!("📍 Vehículo {} movido a ({}, {})", id, latitude, longitude);
        Ok(updated)
    }

    pub async fn delete_vehicle(&self, id: &str) -> AppResult<()> {
        if !self.repository.delete(id).await? {
            return Err(not_found_error(id));
        }

        tracing::info!("🗑️ Vehículo {} eliminado", id);
        Ok(())
    }

    pub async fn get_vehicle_count(&self) -> AppResult<u64> {
        self.repository.count().await
    }

    /// Recorre toda la flota; sin índice espacial
    pub async fn get_vehicles_in_area(
        &self,
        min_lat: f64,
        max_lat: f64,
        min_lng: f64,
        max_lng: f64,
    ) -> AppResult<Vec<Vehicle>> {
        let area = BoundingBox::new(min_lat, max_lat, min_lng, max_lng);
        let vehicles = self.repository.find_all().await?;

        Ok(vehicles
            .into_iter()
            .filter(|vehicle| area.contains(&vehicle.location()))
            .collect())
    }

    pub async fn get_statistics(&self) -> AppResult<VehicleStatistics> {
        let vehicles = self.repository.find_all().await?;
        Ok(VehicleStatistics::from_vehicles(&vehicles))
    }
}
