use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::controllers::task_controller::TaskController;
use crate::dto::common_dto::{ApiResponse, PageQuery, Paginated};
use crate::dto::task_dto::{
    AssignTaskRequest, CreateTaskRequest, DriverTasksQuery, EnrichedTask, ScheduleTaskRequest,
};
use crate::models::auth::{Action, Session, Subject};
use crate::models::Task;
use crate::routes::parse_date_param;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_task_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/mine", get(my_tasks))
        .route("/mine/enriched", get(my_tasks_enriched))
        .route("/by-date/:date", get(tasks_by_date))
        .route("/by-date/:date/enriched", get(tasks_by_date_enriched))
        .route("/by-vehicle/:id", get(tasks_by_vehicle))
        .route("/:id", delete(delete_task))
        .route("/:id/assign", post(assign_task))
        .route("/:id/schedule", put(schedule_task).delete(unschedule_task))
        .route("/:id/complete", post(complete_task))
}

/// Lista completa, o una página si llega `limit` u `offset`
#[derive(Serialize)]
#[serde(untagged)]
enum TaskListing {
    All(Vec<Task>),
    Page(Paginated<Task>),
}

async fn list_tasks(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<TaskListing>>, AppError> {
    session.require(Action::Read, Subject::TaskAssignment)?;
    let controller = TaskController::new(state.store.clone());

    let response = if query.limit.is_none() && query.offset.is_none() {
        let listed = controller.list().await?;
        ApiResponse {
            success: listed.success,
            message: listed.message,
            data: listed.data.map(TaskListing::All),
        }
    } else {
        let page = controller.paginate(query.to_page()).await?;
        ApiResponse {
            success: page.success,
            message: page.message,
            data: page.data.map(TaskListing::Page),
        }
    };
    Ok(Json(response))
}

async fn create_task(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(request): Json<CreateTaskRequest>,
) -> Result<Json<ApiResponse<Task>>, AppError> {
    session.require(Action::Write, Subject::TaskAssignment)?;
    let controller = TaskController::new(state.store.clone());
    Ok(Json(controller.create(request).await?))
}

async fn my_tasks(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<DriverTasksQuery>,
) -> Result<Json<ApiResponse<Vec<Task>>>, AppError> {
    session.require(Action::Read, Subject::MyTasks)?;
    let controller = TaskController::new(state.store.clone());
    Ok(Json(controller.mine(session.user_id, query.date).await?))
}

async fn my_tasks_enriched(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<DriverTasksQuery>,
) -> Result<Json<ApiResponse<Vec<EnrichedTask>>>, AppError> {
    session.require(Action::Read, Subject::MyTasks)?;
    let controller = TaskController::new(state.store.clone());
    Ok(Json(controller.mine_enriched(session.user_id, query.date).await?))
}

async fn tasks_by_date(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(date): Path<String>,
) -> Result<Json<ApiResponse<Vec<Task>>>, AppError> {
    session.require(Action::Read, Subject::TaskAssignment)?;
    let date = parse_date_param(&date)?;
    let controller = TaskController::new(state.store.clone());
    Ok(Json(controller.by_date(date).await?))
}

async fn tasks_by_date_enriched(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(date): Path<String>,
) -> Result<Json<ApiResponse<Vec<EnrichedTask>>>, AppError> {
    session.require(Action::Read, Subject::TaskAssignment)?;
    let date = parse_date_param(&date)?;
    let controller = TaskController::new(state.store.clone());
    Ok(Json(controller.by_date_enriched(date).await?))
}

async fn tasks_by_vehicle(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Query(query): Query<DriverTasksQuery>,
) -> Result<Json<ApiResponse<Vec<Task>>>, AppError> {
    session.require(Action::Read, Subject::TaskAssignment)?;
    let controller = TaskController::new(state.store.clone());
    Ok(Json(controller.by_vehicle(id, query.date).await?))
}

async fn delete_task(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Uuid>>, AppError> {
    session.require(Action::Write, Subject::TaskAssignment)?;
    let controller = TaskController::new(state.store.clone());
    Ok(Json(controller.delete(id).await?))
}

async fn assign_task(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignTaskRequest>,
) -> Result<Json<ApiResponse<Task>>, AppError> {
    session.require(Action::Write, Subject::TaskAssignment)?;
    let controller = TaskController::new(state.store.clone());
    Ok(Json(controller.assign(id, request.vehicle_id).await?))
}

async fn schedule_task(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(request): Json<ScheduleTaskRequest>,
) -> Result<Json<ApiResponse<Task>>, AppError> {
    session.require(Action::Write, Subject::TaskAssignment)?;
    let controller = TaskController::new(state.store.clone());
    Ok(Json(controller.schedule(id, request).await?))
}

async fn unschedule_task(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Task>>, AppError> {
    session.require(Action::Write, Subject::TaskAssignment)?;
    let controller = TaskController::new(state.store.clone());
    Ok(Json(controller.unschedule(id).await?))
}

// Solo requiere sesión
async fn complete_task(
    State(state): State<AppState>,
    Extension(_session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Task>>, AppError> {
    let controller = TaskController::new(state.store.clone());
    Ok(Json(controller.complete(id).await?))
}
