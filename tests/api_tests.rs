use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use fleet_telematics::config::EnvironmentConfig;
use fleet_telematics::create_app;
use fleet_telematics::repositories::InMemoryVehicleRepository;
use fleet_telematics::state::AppState;

// Función helper para crear la app de test
fn create_test_app() -> Router {
    let state = AppState::new(
        Arc::new(InMemoryVehicleRepository::new()),
        EnvironmentConfig::default(),
    );
    create_app(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn electric_payload() -> Value {
    json!({
        "type": "Electric",
        "location": { "latitude": 19.8762, "longitude": 75.3433 },
        "details": {
            "manufacturedDate": "2024-01-15",
            "model": "Tesla Model 3",
            "fuelType": "EV",
            "bhp": 283,
            "torque": 420
        },
        "engineDetails": {
            "motorType": "Permanent Magnet",
            "voltage": 400,
            "batteryCapacity": 75,
            "range": 500
        },
        "uniqueParts": []
    })
}

fn diesel_payload() -> Value {
    json!({
        "type": "Diesel",
        "location": { "latitude": 30.0, "longitude": 80.0 },
        "details": {
            "manufacturedDate": "2022-06-01T00:00:00.000Z",
            "model": "Mahindra XUV700",
            "fuelType": "Diesel",
            "bhp": 182,
            "torque": 450
        },
        "engineDetails": {
            "displacement": 2184,
            "cylinders": 4,
            "configuration": "Inline",
            "turboCharged": false,
            "compressionRatio": 16.5,
            "fuelSystemType": "Common Rail"
        }
    })
}

async fn create(app: &Router, payload: Value) -> String {
    let (status, body) = send(app, Method::POST, "/api/vehicles", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["service"], "Vehicle Telematics API");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_root_banner() {
    let app = create_test_app();
    let (status, body) = send(&app, Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endpoints"]["vehicles"], "/api/vehicles");
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = create_test_app();
    let (status, body) = send(&app, Method::GET, "/api/trucks", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "error": "Route not found" }));
}

#[tokio::test]
async fn test_create_vehicle() {
    let app = create_test_app();
    let (status, body) = send(&app, Method::POST, "/api/vehicles", Some(electric_payload())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);

    let data = &body["data"];
    assert_eq!(data["id"], "1");
    assert_eq!(data["type"], "Electric");
    assert_eq!(data["details"]["manufacturedDate"], "2024-01-15");
    assert_eq!(data["engineDetails"]["motorType"], "Permanent Magnet");
    assert_eq!(data["uniqueParts"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_create_vehicle_rejects_invalid_data() {
    let app = create_test_app();
    let mut payload = electric_payload();
    payload["type"] = json!("Spaceship");

    let (status, body) = send(&app, Method::POST, "/api/vehicles", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "error": "Invalid vehicle data" }));
}

#[tokio::test]
async fn test_create_vehicle_rejects_out_of_range_location() {
    let app = create_test_app();
    let mut payload = electric_payload();
    payload["location"]["latitude"] = json!(91.0);

    let (status, body) = send(&app, Method::POST, "/api/vehicles", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid latitude"));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = create_test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/vehicles")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Bad request"));
}

#[tokio::test]
async fn test_list_and_get_vehicles() {
    let app = create_test_app();
    let id = create(&app, electric_payload()).await;
    create(&app, diesel_payload()).await;

    let (status, body) = send(&app, Method::GET, "/api/vehicles", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = send(&app, Method::GET, &format!("/api/vehicles/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["details"]["model"], "Tesla Model 3");

    let (status, body) = send(&app, Method::GET, "/api/vehicles/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Vehicle with id 999 not found");
}

#[tokio::test]
async fn test_list_by_type() {
    let app = create_test_app();
    create(&app, electric_payload()).await;
    create(&app, diesel_payload()).await;

    let (status, body) = send(&app, Method::GET, "/api/vehicles/type/Diesel", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["type"], "Diesel");
    // turbo ausente: turbocompresor en mal estado
    let parts = body["data"][0]["uniqueParts"].as_array().unwrap();
    assert!(parts
        .iter()
        .any(|p| p["name"] == "Turbocharger" && p["condition"] == "Poor"));

    let (status, body) = send(&app, Method::GET, "/api/vehicles/type/Hybrid", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    let (status, body) = send(&app, Method::GET, "/api/vehicles/type/InvalidType", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid vehicle type: InvalidType");
}

#[tokio::test]
async fn test_update_vehicle() {
    let app = create_test_app();
    let id = create(&app, electric_payload()).await;

    let mut payload = electric_payload();
    payload["details"]["model"] = json!("Tesla Model 3 Highland");
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/vehicles/{}", id),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id.as_str());
    assert_eq!(body["data"]["details"]["model"], "Tesla Model 3 Highland");

    let (status, _) = send(&app, Method::PUT, "/api/vehicles/999", Some(payload)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/vehicles/{}", id),
        Some(json!({ "type": "Electric" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid vehicle data");
}

#[tokio::test]
async fn test_update_location() {
    let app = create_test_app();
    let id = create(&app, electric_payload()).await;
    let uri = format!("/api/vehicles/{}/location", id);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "latitude": 20.5937, "longitude": 78.9629 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["location"], json!({ "latitude": 20.5937, "longitude": 78.9629 }));
    // el resto del documento no cambia
    assert_eq!(body["data"]["details"]["model"], "Tesla Model 3");

    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "latitude": 100, "longitude": 75 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid latitude"));

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/vehicles/999/location",
        Some(json!({ "latitude": 20, "longitude": 75 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({ "latitude": 20 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_vehicle() {
    let app = create_test_app();
    let id = create(&app, electric_payload()).await;
    let uri = format!("/api/vehicles/{}", id);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": "Vehicle deleted successfully" }));

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_statistics() {
    let app = create_test_app();

    let (status, body) = send(&app, Method::GET, "/api/vehicles/statistics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 0);
    assert_eq!(body["data"]["averageBHP"], 0.0);

    create(&app, electric_payload()).await;
    let mut second = electric_payload();
    second["details"]["bhp"] = json!(300);
    second["details"]["torque"] = json!(450);
    create(&app, second).await;

    let (_, body) = send(&app, Method::GET, "/api/vehicles/statistics", None).await;
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["byType"], json!({ "Electric": 2 }));
    assert_eq!(body["data"]["averageBHP"], 291.5);
    assert_eq!(body["data"]["averageTorque"], 435.0);
}

#[tokio::test]
async fn test_vehicles_in_area() {
    let app = create_test_app();
    create(&app, electric_payload()).await;
    let mut inside = electric_payload();
    inside["location"] = json!({ "latitude": 20.0, "longitude": 76.0 });
    create(&app, inside).await;
    create(&app, diesel_payload()).await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/vehicles/area?minLat=19&maxLat=21&minLng=75&maxLng=77",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (status, body) = send(&app, Method::GET, "/api/vehicles/area?minLat=19", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/vehicles/area?minLat=abc&maxLat=21&minLng=75&maxLng=77",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_canonical_id_is_not_found() {
    let app = create_test_app();
    let id = create(&app, electric_payload()).await;
    assert_eq!(id, "1");

    let (status, body) = send(&app, Method::GET, "/api/vehicles/01", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Vehicle with id 01 not found");

    let (status, _) = send(&app, Method::DELETE, "/api/vehicles/+1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/api/vehicles/1", None).await;
    assert_eq!(status, StatusCode::OK);
}
