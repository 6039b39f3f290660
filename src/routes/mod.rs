//! Routers HTTP
//!
//! Todo lo que cuelga de `/api` pasa por el middleware de sesión; `/test`
//! queda público como health check.

pub mod location_routes;
pub mod request_routes;
pub mod session_routes;
pub mod task_routes;
pub mod timeline_routes;
pub mod vehicle_routes;

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::{auth_middleware, cors_layer};
use crate::state::AppState;
use crate::utils::errors::{invalid_input, AppResult};
use crate::utils::validation::validate_date;

/// Fecha de un segmento de ruta en formato `YYYY-MM-DD`
pub fn parse_date_param(raw: &str) -> AppResult<NaiveDate> {
    validate_date(raw).map_err(|_| invalid_input("Invalid date, expected YYYY-MM-DD"))
}

pub fn create_api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/requests", request_routes::create_request_router())
        .nest("/tasks", task_routes::create_task_router())
        .nest("/timeline", timeline_routes::create_timeline_router())
        .nest("/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/locations", location_routes::create_location_router())
        .nest("/session", session_routes::create_session_router())
        .layer(from_fn_with_state(state, auth_middleware))
}

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/test", get(test_endpoint))
        .nest("/api", create_api_router(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
        .with_state(state)
}

async fn test_endpoint() -> Json<Value> {
    Json(json!({
        "message": "Board scheduler API running",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_param() {
        assert_eq!(
            parse_date_param("2024-05-02").unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
        );
        assert!(parse_date_param("02/05/2024").is_err());
        assert!(parse_date_param("2024-13-01").is_err());
    }
}
