use std::sync::Arc;

use serde_json::Value;

use crate::dto::vehicle_dto::{ApiResponse, AreaQuery, UpdateLocationRequest};
use crate::models::statistics::VehicleStatistics;
use crate::models::vehicle::{Vehicle, VehicleRepresentation};
use crate::services::VehicleService;
use crate::utils::errors::AppError;

pub struct VehicleController {
    service: Arc<VehicleService>,
}

impl VehicleController {
    pub fn new(service: Arc<VehicleService>) -> Self {
        Self { service }
    }

    pub async fn create(
        &self,
        data: Value,
    ) -> Result<ApiResponse<VehicleRepresentation>, AppError> {
        let vehicle = self.service.create_vehicle(&data).await?;
        Ok(ApiResponse::success(vehicle.to_representation()))
    }

    pub async fn list(&self) -> Result<ApiResponse<Vec<VehicleRepresentation>>, AppError> {
        let vehicles = self.service.get_all_vehicles().await?;
        Ok(ApiResponse::list(represent(&vehicles)))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<ApiResponse<VehicleRepresentation>, AppError> {
        let vehicle = self.service.get_vehicle_by_id(id).await?;
        Ok(ApiResponse::success(vehicle.to_representation()))
    }

    pub async fn list_by_type(
        &self,
        vehicle_type: &str,
    ) -> Result<ApiResponse<Vec<VehicleRepresentation>>, AppError> {
        let vehicles = self.service.get_vehicles_by_type(vehicle_type).await?;
        Ok(ApiResponse::list(represent(&vehicles)))
    }

    pub async fn update(
        &self,
        id: &str,
        data: Value,
    ) -> Result<ApiResponse<VehicleRepresentation>, AppError> {
        let vehicle = self.service.update_vehicle(id, &data).await?;
        Ok(ApiResponse::success(vehicle.to_representation()))
    }

    pub async fn update_location(
        &self,
        id: &str,
        request: UpdateLocationRequest,
    ) -> Result<ApiResponse<VehicleRepresentation>, AppError> {
        let vehicle = self
            .service
            .update_vehicle_location(id, request.latitude, request.longitude)
            .await?;
        Ok(ApiResponse::success(vehicle.to_representation()))
    }

    pub async fn delete(&self, id: &str) -> Result<ApiResponse<()>, AppError> {
        self.service.delete_vehicle(id).await?;
        Ok(ApiResponse::message("Vehicle deleted successfully"))
    }

    pub async fn statistics(&self) -> Result<ApiResponse<VehicleStatistics>, AppError> {
        let statistics = self.service.get_statistics().await?;
        Ok(ApiResponse::success(statistics))
    }

    pub async fn list_in_area(
        &self,
        query: AreaQuery,
    ) -> Result<ApiResponse<Vec<VehicleRepresentation>>, AppError> {
        let vehicles = self
            .service
            .get_vehicles_in_area(query.min_lat, query.max_lat, query.min_lng, query.max_lng)
            .await?;
        Ok(ApiResponse::list(represent(&vehicles)))
    }
}

fn represent(vehicles: &[Vehicle]) -> Vec<VehicleRepresentation> {
    vehicles.iter().map(Vehicle::to_representation).collect()
}
