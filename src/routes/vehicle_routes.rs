use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde_json::Value;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::{ApiResponse, AreaQuery, UpdateLocationRequest};
use crate::models::statistics::VehicleStatistics;
use crate::models::vehicle::VehicleRepresentation;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppError};

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/statistics", get(get_statistics))
        .route("/area", get(list_vehicles_in_area))
        .route("/type/:type", get(list_vehicles_by_type))
        .route(
            "/:id",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
        .route("/:id/location", patch(update_vehicle_location))
}

fn controller(state: &AppState) -> VehicleController {
    VehicleController::new(state.vehicle_service.clone())
}

/// Cuerpos JSON mal formados se responden con el envelope de error
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| bad_request_error(&rejection.body_text()))
}

async fn create_vehicle(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<VehicleRepresentation>>), AppError> {
    let data = json_body(payload)?;
    let response = controller(&state).create(data).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_vehicles(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<VehicleRepresentation>>>, AppError> {
    let response = controller(&state).list().await?;
    Ok(Json(response))
}

async fn get_statistics(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<VehicleStatistics>>, AppError> {
    let response = controller(&state).statistics().await?;
    Ok(Json(response))
}

async fn list_vehicles_in_area(
    State(state): State<AppState>,
    query: Result<Query<AreaQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<VehicleRepresentation>>>, AppError> {
    let Query(area) = query.map_err(|rejection| bad_request_error(&rejection.body_text()))?;
    let response = controller(&state).list_in_area(area).await?;
    Ok(Json(response))
}

async fn list_vehicles_by_type(
    State(state): State<AppState>,
    Path(vehicle_type): Path<String>,
) -> Result<Json<ApiResponse<Vec<VehicleRepresentation>>>, AppError> {
    let response = controller(&state).list_by_type(&vehicle_type).await?;
    Ok(Json(response))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<VehicleRepresentation>>, AppError> {
    let response = controller(&state).get_by_id(&id).await?;
    Ok(Json(response))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ApiResponse<VehicleRepresentation>>, AppError> {
    let data = json_body(payload)?;
    let response = controller(&state).update(&id, data).await?;
    Ok(Json(response))
}

async fn update_vehicle_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateLocationRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<VehicleRepresentation>>, AppError> {
    let request = json_body(payload)?;
    let response = controller(&state).update_location(&id, request).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let response = controller(&state).delete(&id).await?;
    Ok(Json(response))
}
