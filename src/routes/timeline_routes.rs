use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::timeline_controller::TimelineController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::timeline_dto::TimelineResponse;
use crate::models::auth::{Action, Session, Subject};
use crate::routes::parse_date_param;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_timeline_router() -> Router<AppState> {
    Router::new().route("/:date", get(get_timeline))
}

async fn get_timeline(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(date): Path<String>,
) -> Result<Json<ApiResponse<TimelineResponse>>, AppError> {
    session.require(Action::Read, Subject::TaskAssignment)?;
    let date = parse_date_param(&date)?;
    let controller = TimelineController::new(state.store.clone(), state.config.timeline);
    Ok(Json(controller.day(date).await?))
}
