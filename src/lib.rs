//! API de telemetría de flota
//!
//! Alta, consulta y mantenimiento de vehículos eléctricos, de gasolina,
//! diésel e híbridos sobre un almacén de documentos.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod factories;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer, http::StatusCode, response::Json, routing::get, BoxError,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_layer;
use crate::state::AppState;

pub const SERVICE_NAME: &str = "Vehicle Telematics API";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Construir el router completo de la aplicación
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/", get(root_endpoint))
        .route("/health", get(health_check))
        .nest("/api/vehicles", routes::create_vehicle_router())
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(REQUEST_TIMEOUT),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": SERVICE_NAME
    }))
}

async fn root_endpoint() -> Json<Value> {
    Json(json!({
        "message": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "vehicles": "/api/vehicles",
            "health": "/health"
        }
    }))
}

async fn route_not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": "Route not found"
        })),
    )
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, Json<Value>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("⏱️ Petición cancelada por timeout");
        return (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "success": false, "error": "Request timed out" })),
        );
    }

    tracing::error!("❌ Error en middleware: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "error": "Internal server error" })),
    )
}
