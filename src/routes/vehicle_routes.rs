use axum::{extract::State, routing::get, Extension, Json, Router};

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::vehicle_dto::CreateVehicleRequest;
use crate::models::auth::{Action, Session, Subject};
use crate::models::Vehicle;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new().route("/", get(list_vehicles).post(create_vehicle))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    session.require(Action::Write, Subject::Vehicles)?;
    let controller = VehicleController::new(state.store.clone());
    Ok(Json(controller.create(request).await?))
}

async fn list_vehicles(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Json<ApiResponse<Vec<Vehicle>>>, AppError> {
    session.require(Action::Read, Subject::Vehicles)?;
    let controller = VehicleController::new(state.store.clone());
    Ok(Json(controller.list().await?))
}
