//! Estadísticas agregadas de la flota

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::vehicle::{Vehicle, VehicleType};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleStatistics {
    pub total: usize,
    /// Sólo contiene los tipos presentes en la flota
    pub by_type: BTreeMap<VehicleType, usize>,
    #[serde(rename = "averageBHP")]
    pub average_bhp: f64,
    pub average_torque: f64,
}

impl VehicleStatistics {
    pub fn from_vehicles(vehicles: &[Vehicle]) -> Self {
        let mut by_type = BTreeMap::new();
        let mut total_bhp = 0.0;
        let mut total_torque = 0.0;

        for vehicle in vehicles {
            *by_type.entry(vehicle.vehicle_type()).or_insert(0) += 1;
            total_bhp += vehicle.details().bhp;
            total_torque += vehicle.details().torque;
        }

        let total = vehicles.len();
        let (average_bhp, average_torque) = if total > 0 {
            (total_bhp / total as f64, total_torque / total as f64)
        } else {
            (0.0, 0.0)
        };

        Self {
            total,
            by_type,
            average_bhp,
            average_torque,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_fleet_has_zero_averages() {
        let stats = VehicleStatistics::from_vehicles(&[]);
        assert_eq!(stats.total, 0);
        assert!(stats.by_type.is_empty());
        assert_eq!(stats.average_bhp, 0.0);
        assert_eq!(stats.average_torque, 0.0);
        assert!(!stats.average_bhp.is_nan());
    }

    #[test]
    fn test_serialized_shape() {
        let mut by_type = BTreeMap::new();
        by_type.insert(VehicleType::Electric, 2);
        let stats = VehicleStatistics {
            total: 2,
            by_type,
            average_bhp: 291.5,
            average_torque: 435.0,
        };

        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            json!({
                "total": 2,
                "byType": { "Electric": 2 },
                "averageBHP": 291.5,
                "averageTorque": 435.0
            })
        );
    }
}
