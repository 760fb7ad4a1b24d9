//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Causa original de un fallo de almacenamiento
pub type StorageCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    /// Coordenadas fuera de rango o datos con forma incorrecta
    #[error("{0}")]
    Validation(String),

    /// La validación previa de la factory rechazó los datos
    #[error("Invalid vehicle data")]
    InvalidData,

    /// Tipo de vehículo desconocido en un filtro
    #[error("Invalid vehicle type: {0}")]
    InvalidType(String),

    #[error("Vehicle with id {0} not found")]
    NotFound(String),

    /// La factory no reconoce el tag `type`
    #[error("Unknown vehicle type: {0}")]
    UnknownType(String),

    #[error("{context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: StorageCause,
    },

    /// Petición HTTP mal formada (JSON inválido, query incompleta)
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Clase de resultado visible para el cliente
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    BadInput,
    NotFound,
    Internal,
}

impl AppError {
    /// Envolver un fallo de almacenamiento con el contexto de la operación
    pub fn storage<E>(context: impl Into<String>, source: E) -> Self
    where
        E: Into<StorageCause>,
    {
        AppError::Storage {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            AppError::Validation(_)
            | AppError::InvalidData
            | AppError::InvalidType(_)
            | AppError::UnknownType(_)
            | AppError::BadRequest(_) => ErrorClass::BadInput,
            AppError::NotFound(_) => ErrorClass::NotFound,
            AppError::Storage { .. } => ErrorClass::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.class() {
            ErrorClass::BadInput => StatusCode::BAD_REQUEST,
            ErrorClass::NotFound => StatusCode::NOT_FOUND,
            ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationError> for AppError {
    fn from(error: validator::ValidationError) -> Self {
        let message = error
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("Invalid {}", error.code));
        AppError::Validation(message)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Invalid vehicle details: {}", errors))
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Storage { context, source } => {
                tracing::error!("❌ {}: {}", context, source);
            }
            other => {
                tracing::warn!("⚠️ Petición rechazada ({}): {}", status, other);
            }
        }

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(id: &str) -> AppError {
    AppError::NotFound(id.to_string())
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes_map_to_status_codes() {
        assert_eq!(AppError::InvalidData.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::InvalidType("Boat".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(not_found_error("42").status_code(), StatusCode::NOT_FOUND);

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let storage = AppError::storage("Failed to update vehicle", io);
        assert_eq!(storage.class(), ErrorClass::Internal);
        assert_eq!(storage.to_string(), "Failed to update vehicle: disk gone");
    }

    #[test]
    fn test_storage_error_keeps_cause() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::Other, "timeout");
        let err = AppError::storage("Failed to count vehicles", io);
        assert_eq!(err.source().map(|s| s.to_string()), Some("timeout".to_string()));
    }

    #[test]
    fn test_messages() {
        assert_eq!(not_found_error("999").to_string(), "Vehicle with id 999 not found");
        assert_eq!(
            AppError::InvalidType("InvalidType".to_string()).to_string(),
            "Invalid vehicle type: InvalidType"
        );
        assert_eq!(
            bad_request_error("missing minLat").to_string(),
            "Bad request: missing minLat"
        );
    }
}
