//! Repositorio de vehículos
//!
//! Contrato de persistencia consumido por el servicio y su implementación
//! sobre PostgreSQL. Cada vehículo se guarda como un documento JSONB con la
//! representación plana del modelo; toda lectura lo reconstruye mediante
//! la factory.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::factories::VehicleFactory;
use crate::models::vehicle::{Vehicle, VehicleRepresentation, VehicleType};
use crate::utils::errors::{AppError, AppResult};

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// Persistir un vehículo nuevo; devuelve la copia con id asignado
    async fn save(&self, vehicle: &Vehicle) -> AppResult<Vehicle>;

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Vehicle>>;

    async fn find_all(&self) -> AppResult<Vec<Vehicle>>;

    async fn find_by_type(&self, vehicle_type: VehicleType) -> AppResult<Vec<Vehicle>>;

    /// Reemplazar el documento completo
    async fn update(&self, id: &str, vehicle: &Vehicle) -> AppResult<Option<Vehicle>>;

    /// Modificar sólo la posición
    async fn update_location(
        &self,
        id: &str,
        latitude: f64,
        longitude: f64,
    ) -> AppResult<Option<Vehicle>>;

    /// `false` si no había nada que borrar
    async fn delete(&self, id: &str) -> AppResult<bool>;

    async fn count(&self) -> AppResult<u64>;

    async fn exists(&self, id: &str) -> AppResult<bool>;
}

/// Documento almacenado: la representación sin el id
pub(crate) fn vehicle_document(vehicle: &Vehicle) -> AppResult<Value> {
    let mut representation = vehicle.to_representation();
    representation.id = None;
    serde_json::to_value(representation)
        .map_err(|e| AppError::storage("Failed to serialize vehicle", e))
}

/// Reconstruir un vehículo desde su documento almacenado
pub(crate) fn vehicle_from_document(id: String, document: Value) -> AppResult<Vehicle> {
    let context = || format!("Corrupted vehicle document {}", id);

    let mut representation: VehicleRepresentation =
        serde_json::from_value(document).map_err(|e| AppError::storage(context(), e))?;
    representation.id = Some(id.clone());

    VehicleFactory::from_representation(representation)
        .map_err(|e| AppError::storage(context(), e))
}

#[derive(Debug, sqlx::FromRow)]
struct VehicleRow {
    id: Uuid,
    document: Json<Value>,
}

impl VehicleRow {
    fn into_vehicle(self) -> AppResult<Vehicle> {
        vehicle_from_document(self.id.to_string(), self.document.0)
    }
}

pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Sólo la forma con guiones en minúsculas, la misma que devuelve la API.
    /// Un id en otra forma no puede existir en la tabla.
    fn parse_id(id: &str) -> Option<Uuid> {
        Uuid::try_parse(id)
            .ok()
            .filter(|uuid| uuid.hyphenated().to_string() == id)
    }
}

#[async_trait]
impl VehicleRepository for PgVehicleRepository {
    async fn save(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        let id = Uuid::new_v4();
        let document = vehicle_document(vehicle)?;

        let row = sqlx::query_as::<_, VehicleRow>(
            r#"
            INSERT INTO vehicles (id, vehicle_type, document, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, document
            "#,
        )
        .bind(id)
        .bind(vehicle.vehicle_type().as_str())
        .bind(Json(document))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::storage("Failed to save vehicle", e))?;

        tracing::debug!("💾 Vehículo {} guardado ({})", row.id, vehicle.vehicle_type());
        row.into_vehicle()
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Vehicle>> {
        let Some(uuid) = Self::parse_id(id) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, VehicleRow>("SELECT id, document FROM vehicles WHERE id = $1")
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::storage("Failed to find vehicle", e))?;

        row.map(VehicleRow::into_vehicle).transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, VehicleRow>(
            "SELECT id, document FROM vehicles ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::storage("Failed to fetch vehicles", e))?;

        rows.into_iter().map(VehicleRow::into_vehicle).collect()
    }

    async fn find_by_type(&self, vehicle_type: VehicleType) -> AppResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, VehicleRow>(
            "SELECT id, document FROM vehicles WHERE vehicle_type = $1 ORDER BY created_at ASC",
        )
        .bind(vehicle_type.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::storage("Failed to fetch vehicles by type", e))?;

        rows.into_iter().map(VehicleRow::into_vehicle).collect()
    }

    async fn update(&self, id: &str, vehicle: &Vehicle) -> AppResult<Option<Vehicle>> {
        let Some(uuid) = Self::parse_id(id) else {
            return Ok(None);
        };
        let document = vehicle_document(vehicle)?;

        let row = sqlx::query_as::<_, VehicleRow>(
            r#"
            UPDATE vehicles
            SET vehicle_type = $2, document = $3, updated_at = $4
            WHERE id = $1
            RETURNING id, document
            "#,
        )
        .bind(uuid)
        .bind(vehicle.vehicle_type().as_str())
        .bind(Json(document))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::storage("Failed to update vehicle", e))?;

        row.map(VehicleRow::into_vehicle).transpose()
    }

    async fn update_location(
        &self,
        id: &str,
        latitude: f64,
        longitude: f64,
    ) -> AppResult<Option<Vehicle>> {
        let Some(uuid) = Self::parse_id(id) else {
            return Ok(None);
        };
        let location = json!({ "latitude": latitude, "longitude": longitude });

        let row = sqlx::query_as::<_, VehicleRow>(
            r#"
            UPDATE vehicles
            SET document = jsonb_set(document, '{location}', $2, true), updated_at = $3
            WHERE id = $1
            RETURNING id, document
            "#,
        )
        .bind(uuid)
        .bind(Json(location))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::storage("Failed to update vehicle location", e))?;

        row.map(VehicleRow::into_vehicle).transpose()
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let Some(uuid) = Self::parse_id(id) else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(uuid)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::storage("Failed to delete vehicle", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vehicles")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::storage("Failed to count vehicles", e))?;

        Ok(count.max(0) as u64)
    }

    async fn exists(&self, id: &str) -> AppResult<bool> {
        let Some(uuid) = Self::parse_id(id) else {
            return Ok(false);
        };

        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehicles WHERE id = $1)")
                .bind(uuid)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::storage("Failed to check vehicle existence", e))?;

        Ok(result.0)
    }
}
