use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use board_scheduler::config::EnvironmentConfig;
use board_scheduler::models::auth::Role;
use board_scheduler::repositories::MemoryStore;
use board_scheduler::utils::jwt::{generate_token, JwtConfig};
use board_scheduler::{create_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "test-secret";

fn create_test_app() -> Router {
    let store = Arc::new(MemoryStore::new());
    create_router(AppState::new(store, EnvironmentConfig::for_tests(SECRET)))
}

fn token(user_id: Uuid, roles: &[Role]) -> String {
    let config = JwtConfig {
        secret: SECRET.to_string(),
        expiration: 3600,
    };
    generate_token(user_id, roles, &config).unwrap()
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Dos ubicaciones, un vehículo y una solicitud de `boards` tablas
async fn seed(app: &Router, admin: &str, driver: Uuid, boards: i32) -> (String, String) {
    let (_, start) = call(
        app,
        Method::POST,
        "/api/locations",
        Some(admin),
        Some(json!({ "name": "Aserradero Norte" })),
    )
    .await;
    let (_, end) = call(
        app,
        Method::POST,
        "/api/locations",
        Some(admin),
        Some(json!({ "name": "Obra Puerto", "lat": 53.54, "lng": 9.98 })),
    )
    .await;
    let (status, vehicle) = call(
        app,
        Method::POST,
        "/api/vehicles",
        Some(admin),
        Some(json!({ "plate": "hh-ab-100", "board_capacity": 8, "driver_id": driver })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, request) = call(
        app,
        Method::POST,
        "/api/requests",
        Some(admin),
        Some(json!({
            "title": "Tablas para encofrado",
            "boards": boards,
            "start_location_id": start["data"]["id"],
            "end_location_id": end["data"]["id"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    (
        request["data"]["id"].as_str().unwrap().to_string(),
        vehicle["data"]["id"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let (status, body) = call(&app, Method::GET, "/test", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_missing_or_invalid_token_is_unauthorized() {
    let app = create_test_app();

    let (status, body) = call(&app, Method::GET, "/api/requests", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = call(&app, Method::GET, "/api/requests", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_ability_is_forbidden() {
    let app = create_test_app();
    let user = token(Uuid::new_v4(), &[Role::User]);

    let (status, body) = call(&app, Method::GET, "/api/requests", Some(&user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/vehicles",
        Some(&user),
        Some(json!({ "plate": "HH-X-1", "board_capacity": 4, "driver_id": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(&app, Method::GET, "/api/vehicles", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_session_me_lists_abilities() {
    let app = create_test_app();
    let user_id = Uuid::new_v4();
    let user = token(user_id, &[Role::User]);

    let (status, body) = call(&app, Method::GET, "/api/session/me", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user_id"], user_id.to_string());
    let abilities = body["data"]["abilities"].as_array().unwrap();
    assert!(abilities.contains(&json!("read:my-tasks")));
    assert!(!abilities.contains(&json!("write:requests")));
}

#[tokio::test]
async fn test_assignment_flow_over_http() {
    let app = create_test_app();
    let admin = token(Uuid::new_v4(), &[Role::Admin]);
    let driver_id = Uuid::new_v4();
    let (request_id, vehicle_id) = seed(&app, &admin, driver_id, 10).await;

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/requests/{}/assignments", request_id),
        Some(&admin),
        Some(json!({
            "assignments": [{
                "vehicle_id": vehicle_id,
                "boards": 6,
                "scheduled_date": "2024-05-02",
                "scheduled_start_minute": 480,
                "scheduled_end_minute": 600,
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let task_id = body["data"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"][0]["status"], "assigned");

    let (_, body) = call(
        &app,
        Method::GET,
        &format!("/api/requests/{}", request_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(body["data"]["sum_assigned_boards"], 6);
    assert_eq!(body["data"]["request"]["status"], "partially_assigned");

    let (_, body) = call(&app, Method::GET, "/api/requests/pending", Some(&admin), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = call(
        &app,
        Method::GET,
        "/api/timeline/2024-05-02",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let events = body["data"]["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["task_id"], task_id);
    assert_eq!(events[0]["start"], 480);
    assert_eq!(events[0]["end"], 600);
    assert_eq!(body["data"]["tasks"][0]["request"]["title"], "Tablas para encofrado");

    // El conductor ve su tarea con solo una sesión de usuario
    let driver = token(driver_id, &[Role::User]);
    let (status, body) = call(
        &app,
        Method::GET,
        "/api/tasks/mine/enriched?date=2024-05-02",
        Some(&driver),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["task"]["id"], task_id);

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/tasks/{}/complete", task_id),
        Some(&driver),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "completed");

    let (status, body) = call(
        &app,
        Method::DELETE,
        &format!("/api/tasks/{}", task_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE");

    let (status, _) = call(
        &app,
        Method::DELETE,
        &format!("/api/requests/{}", request_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_assignment_errors_map_to_status_codes() {
    let app = create_test_app();
    let admin = token(Uuid::new_v4(), &[Role::Admin]);
    let (request_id, vehicle_id) = seed(&app, &admin, Uuid::new_v4(), 10).await;
    let uri = format!("/api/requests/{}/assignments", request_id);

    let (status, body) = call(
        &app,
        Method::POST,
        &uri,
        Some(&admin),
        Some(json!({ "assignments": [{ "vehicle_id": vehicle_id, "boards": 9 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "CAPACITY_EXCEEDED");

    let (status, body) = call(
        &app,
        Method::POST,
        &uri,
        Some(&admin),
        Some(json!({ "assignments": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = call(
        &app,
        Method::POST,
        &format!("/api/requests/{}/assignments", Uuid::new_v4()),
        Some(&admin),
        Some(json!({ "assignments": [{ "vehicle_id": vehicle_id, "boards": 2 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = call(
        &app,
        Method::GET,
        &format!("/api/requests/{}", request_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(body["data"]["sum_assigned_boards"], 0);
    assert_eq!(body["data"]["request"]["status"], "incoming");
}

#[tokio::test]
async fn test_invalid_date_is_bad_request() {
    let app = create_test_app();
    let admin = token(Uuid::new_v4(), &[Role::Admin]);

    let (status, _) = call(&app, Method::GET, "/api/timeline/02-05-2024", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        Method::GET,
        "/api/tasks/by-date/2024-13-40",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_vehicle_registration_is_idempotent() {
    let app = create_test_app();
    let admin = token(Uuid::new_v4(), &[Role::Admin]);
    let payload = json!({ "plate": "hh-ab-123", "board_capacity": 8, "driver_id": Uuid::new_v4() });

    let (_, first) = call(&app, Method::POST, "/api/vehicles", Some(&admin), Some(payload.clone())).await;
    let (_, second) = call(&app, Method::POST, "/api/vehicles", Some(&admin), Some(payload)).await;

    assert_eq!(first["data"]["id"], second["data"]["id"]);
    assert_eq!(first["data"]["plate"], "HH-AB-123");
    assert_eq!(second["message"], "Vehicle already registered");

    let (_, list) = call(&app, Method::GET, "/api/vehicles", Some(&admin), None).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
}
