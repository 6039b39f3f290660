use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::request_controller::RequestController;
use crate::dto::common_dto::{ApiResponse, PageQuery, Paginated};
use crate::dto::request_dto::{
    AssignVehiclesRequest, AssignmentItem, CreateRequestRequest, PendingRequestsQuery,
    RequestListQuery, RequestSummary, UpdateRequestRequest,
};
use crate::models::auth::{Action, Session, Subject};
use crate::models::{Request, Task};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_request_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_requests).post(create_request))
        .route("/pending", get(list_pending))
        .route("/finished", get(list_finished))
        .route(
            "/:id",
            get(get_request).put(update_request).delete(delete_request),
        )
        .route("/:id/assignments", post(assign_vehicles))
        .route("/:id/tasks", post(create_task_for_request))
}

async fn list_requests(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<RequestListQuery>,
) -> Result<Json<ApiResponse<Vec<Request>>>, AppError> {
    session.require(Action::Read, Subject::Requests)?;
    let controller = RequestController::new(state.store.clone());
    Ok(Json(controller.list(query.status).await?))
}

async fn create_request(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(request): Json<CreateRequestRequest>,
) -> Result<Json<ApiResponse<Request>>, AppError> {
    session.require(Action::Write, Subject::Requests)?;
    let controller = RequestController::new(state.store.clone());
    Ok(Json(controller.create(session.user_id, request).await?))
}

async fn list_pending(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<PendingRequestsQuery>,
) -> Result<Json<ApiResponse<Vec<RequestSummary>>>, AppError> {
    session.require(Action::Read, Subject::Requests)?;
    let controller = RequestController::new(state.store.clone());
    Ok(Json(controller.pending(query.limit).await?))
}

async fn list_finished(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Paginated<RequestSummary>>>, AppError> {
    session.require(Action::Read, Subject::Requests)?;
    let controller = RequestController::new(state.store.clone());
    Ok(Json(controller.finished(query.to_page()).await?))
}

async fn get_request(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RequestSummary>>, AppError> {
    session.require(Action::Read, Subject::Requests)?;
    let controller = RequestController::new(state.store.clone());
    Ok(Json(controller.get(id).await?))
}

async fn update_request(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRequestRequest>,
) -> Result<Json<ApiResponse<Request>>, AppError> {
    session.require(Action::Write, Subject::Requests)?;
    let controller = RequestController::new(state.store.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_request(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Uuid>>, AppError> {
    session.require(Action::Write, Subject::Requests)?;
    let controller = RequestController::new(state.store.clone());
    Ok(Json(controller.delete(id).await?))
}

async fn assign_vehicles(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignVehiclesRequest>,
) -> Result<Json<ApiResponse<Vec<Task>>>, AppError> {
    session.require(Action::Write, Subject::TaskAssignment)?;
    let controller = RequestController::new(state.store.clone());
    Ok(Json(controller.assign_vehicles(id, request).await?))
}

async fn create_task_for_request(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(item): Json<AssignmentItem>,
) -> Result<Json<ApiResponse<Task>>, AppError> {
    session.require(Action::Write, Subject::TaskAssignment)?;
    let controller = RequestController::new(state.store.clone());
    Ok(Json(controller.create_task(id, item).await?))
}
