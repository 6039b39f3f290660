use axum::{extract::State, routing::get, Extension, Json, Router};

use crate::controllers::location_controller::LocationController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::location_dto::CreateLocationRequest;
use crate::models::auth::{Action, Session, Subject};
use crate::models::Location;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_location_router() -> Router<AppState> {
    Router::new().route("/", get(list_locations).post(create_location))
}

async fn list_locations(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Json<ApiResponse<Vec<Location>>>, AppError> {
    session.require(Action::Read, Subject::Locations)?;
    let controller = LocationController::new(state.store.clone());
    Ok(Json(controller.list().await?))
}

async fn create_location(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(request): Json<CreateLocationRequest>,
) -> Result<Json<ApiResponse<Location>>, AppError> {
    session.require(Action::Write, Subject::Locations)?;
    let controller = LocationController::new(state.store.clone());
    Ok(Json(controller.create(request).await?))
}
