//! Repositorio de vehículos en memoria
//!
//! Misma semántica que el almacén PostgreSQL: guarda documentos JSON y
//! reconstruye los vehículos en cada lectura. Ids secuenciales ("1", "2", ...).

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::models::vehicle::{Vehicle, VehicleType};
use crate::repositories::vehicle_repository::{
    vehicle_document, vehicle_from_document, VehicleRepository,
};
use crate::utils::errors::AppResult;

#[derive(Default)]
struct Store {
    next_id: u64,
    documents: BTreeMap<u64, Value>,
}

#[derive(Default)]
pub struct InMemoryVehicleRepository {
    store: RwLock<Store>,
}

impl InMemoryVehicleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sólo la forma canónica: "01" o "+1" no son el vehículo "1"
    fn parse_id(id: &str) -> Option<u64> {
        id.parse::<u64>().ok().filter(|key| key.to_string() == id)
    }
}

#[async_trait]
impl VehicleRepository for InMemoryVehicleRepository {
    async fn save(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        let document = vehicle_document(vehicle)?;

        let mut store = self.store.write().await;
        store.next_id += 1;
        let id = store.next_id;
        store.documents.insert(id, document.clone());

        vehicle_from_document(id.to_string(), document)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Vehicle>> {
        let Some(key) = Self::parse_id(id) else {
            return Ok(None);
        };

        let store = self.store.read().await;
        store
            .documents
            .get(&key)
            .cloned()
            .map(|document| vehicle_from_document(key.to_string(), document))
            .transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<Vehicle>> {
        let store = self.store.read().await;
        store
            .documents
            .iter()
            .map(|(key, document)| vehicle_from_document(key.to_string(), document.clone()))
            .collect()
    }

    async fn find_by_type(&self, vehicle_type: VehicleType) -> AppResult<Vec<Vehicle>> {
        let store = self.store.read().await;
        store
            .documents
            .iter()
            .filter(|(_, document)| document["type"] == vehicle_type.as_str())
            .map(|(key, document)| vehicle_from_document(key.to_string(), document.clone()))
            .collect()
    }

    async fn update(&self, id: &str, vehicle: &Vehicle) -> AppResult<Option<Vehicle>> {
        let Some(key) = Self::parse_id(id) else {
            return Ok(None);
        };
        let document = vehicle_document(vehicle)?;

        let mut store = self.store.write().await;
        match store.documents.get_mut(&key) {
            Some(slot) => {
                *slot = document.clone();
                vehicle_from_document(key.to_string(), document).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn update_location(
        &self,
        id: &str,
        latitude: f64,
        longitude: f64,
    ) -> AppResult<Option<Vehicle>> {
        let Some(key) = Self::parse_id(id) else {
            return Ok(None);
        };

        let mut store = self.store.write().await;
        match store.documents.get_mut(&key) {
            Some(document) => {
                document["location"] = json!({ "latitude": latitude, "longitude": longitude });
                vehicle_from_document(key.to_string(), document.clone()).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let Some(key) = Self::parse_id(id) else {
            return Ok(false);
        };

        let mut store = self.store.write().await;
        Ok(store.documents.remove(&key).is_some())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.store.read().await.documents.len() as u64)
    }

    async fn exists(&self, id: &str) -> AppResult<bool> {
        let Some(key) = Self::parse_id(id) else {
            return Ok(false);
        };
        Ok(self.store.read().await.documents.contains_key(&key))
    }
}
