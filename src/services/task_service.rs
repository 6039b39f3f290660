//! Servicio de tareas
//!
//! Toda mutación de una tarea bloquea antes la fila de su solicitud y
//! termina recalculando los agregados de esa solicitud.

use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::request_dto::AssignmentItem;
use crate::dto::task_dto::{CreateTaskRequest, EnrichedTask, RequestHeader, ScheduleTaskRequest};
use crate::models::{Request, Task, TaskStatus, Vehicle};
use crate::repositories::{PageRequest, StoreTx};
use crate::services::aggregation_service::{self, sum_boards};
use crate::services::assignment_service::{
    self, ensure_schedule, ensure_vehicle_capacity, ensure_within_request,
};
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::ensure_positive_boards;

async fn load_task(tx: &mut dyn StoreTx, task_id: Uuid) -> AppResult<Task> {
    tx.get_task(task_id)
        .await?
        .ok_or_else(|| not_found_error("Task"))
}

async fn load_vehicle(tx: &mut dyn StoreTx, vehicle_id: Uuid) -> AppResult<Vehicle> {
    tx.get_vehicle(vehicle_id)
        .await?
        .ok_or_else(|| not_found_error("Vehicle"))
}

async fn lock_request(tx: &mut dyn StoreTx, request_id: Uuid) -> AppResult<Request> {
    tx.lock_request(request_id)
        .await?
        .ok_or_else(|| not_found_error("Request"))
}

/// Bloquea la solicitud de la tarea y devuelve la tarea leída bajo ese
/// bloqueo; la primera lectura solo sirve para saber qué solicitud bloquear
async fn lock_task(tx: &mut dyn StoreTx, task_id: Uuid) -> AppResult<Task> {
    let request_id = load_task(tx, task_id).await?.request_id;
    lock_request(tx, request_id).await?;
    load_task(tx, task_id).await
}

fn ensure_not_completed(task: &Task, action: &str) -> AppResult<()> {
    if task.is_completed() {
        return Err(AppError::InvalidState(format!(
            "Cannot {} a completed task",
            action
        )));
    }
    Ok(())
}

/// Crea una tarea suelta; `assigned` si llega con vehículo, `pending` si no
pub async fn create_task(tx: &mut dyn StoreTx, payload: CreateTaskRequest) -> AppResult<Task> {
    ensure_positive_boards(payload.boards)?;
    payload.validate()?;

    let request = lock_request(tx, payload.request_id).await?;

    if let Some(vehicle_id) = payload.assigned_vehicle_id {
        let vehicle = load_vehicle(tx, vehicle_id).await?;
        ensure_vehicle_capacity(&vehicle, payload.boards)?;
    }

    let existing = tx.tasks_by_request(request.id).await?;
    ensure_within_request(&request, sum_boards(&existing), i64::from(payload.boards))?;

    let now = Utc::now();
    let task = Task {
        id: Uuid::new_v4(),
        request_id: request.id,
        boards: payload.boards,
        assigned_vehicle_id: payload.assigned_vehicle_id,
        estimated_duration_minutes: payload.estimated_duration_minutes,
        status: if payload.assigned_vehicle_id.is_some() {
            TaskStatus::Assigned
        } else {
            TaskStatus::Pending
        },
        scheduled_date: None,
        scheduled_start_minute: None,
        scheduled_end_minute: None,
        scheduled_lane: None,
        created_at: now,
        updated_at: now,
    };

    tx.insert_task(&task).await?;
    aggregation_service::recompute(tx, request.id).await?;

    info!("📝 Tarea {} creada para la solicitud {}", task.id, request.id);
    Ok(task)
}

/// Crea una tarea asignada para una solicitud; mismas reglas que una asignación de un elemento
pub async fn create_task_for_request(
    tx: &mut dyn StoreTx,
    request_id: Uuid,
    item: AssignmentItem,
) -> AppResult<Task> {
    let mut created =
        assignment_service::assign_vehicles_to_request(tx, request_id, std::slice::from_ref(&item))
            .await?;
    created
        .pop()
        .ok_or_else(|| AppError::Internal("Assignment created no task".to_string()))
}

/// Reasigna una tarea a otro vehículo
pub async fn assign_task_to_vehicle(
    tx: &mut dyn StoreTx,
    task_id: Uuid,
    vehicle_id: Uuid,
) -> AppResult<Task> {
    let mut task = lock_task(tx, task_id).await?;
    ensure_not_completed(&task, "reassign")?;

    let vehicle = load_vehicle(tx, vehicle_id).await?;
    ensure_vehicle_capacity(&vehicle, task.boards)?;

    task.assigned_vehicle_id = Some(vehicle.id);
    task.status = TaskStatus::Assigned;
    task.updated_at = Utc::now();

    tx.update_task(&task).await?;
    aggregation_service::recompute(tx, task.request_id).await?;

    info!("🚚 Tarea {} asignada al vehículo {}", task.id, vehicle.plate);
    Ok(task)
}

/// Planifica una tarea en una fecha, franja y carril con un vehículo
pub async fn schedule_task(
    tx: &mut dyn StoreTx,
    task_id: Uuid,
    payload: ScheduleTaskRequest,
) -> AppResult<Task> {
    let schedule = payload.schedule();
    ensure_schedule(Some(&schedule))?;

    let mut task = lock_task(tx, task_id).await?;
    ensure_not_completed(&task, "reschedule")?;

    let vehicle = load_vehicle(tx, payload.vehicle_id).await?;
    ensure_vehicle_capacity(&vehicle, task.boards)?;

    task.assigned_vehicle_id = Some(vehicle.id);
    task.status = TaskStatus::Assigned;
    task.set_schedule(Some(schedule));
    task.updated_at = Utc::now();

    tx.update_task(&task).await?;
    aggregation_service::recompute(tx, task.request_id).await?;

    info!(
        "🗓️ Tarea {} planificada el {} de {} a {}",
        task.id, schedule.date, schedule.start_minute, schedule.end_minute
    );
    Ok(task)
}

/// Quita la franja de una tarea sin tocar su vehículo
pub async fn unschedule_task(tx: &mut dyn StoreTx, task_id: Uuid) -> AppResult<Task> {
    let mut task = lock_task(tx, task_id).await?;
    ensure_not_completed(&task, "unschedule")?;

    task.set_schedule(None);
    task.updated_at = Utc::now();

    tx.update_task(&task).await?;
    aggregation_service::recompute(tx, task.request_id).await?;

    Ok(task)
}

pub async fn delete_task(tx: &mut dyn StoreTx, task_id: Uuid) -> AppResult<()> {
    let task = lock_task(tx, task_id).await?;
    ensure_not_completed(&task, "delete")?;

    tx.delete_task(task.id).await?;
    aggregation_service::recompute(tx, task.request_id).await?;

    info!("🗑️ Tarea {} eliminada", task.id);
    Ok(())
}

/// Marca una tarea como completada; repetirlo no cambia nada
pub async fn complete_task(tx: &mut dyn StoreTx, task_id: Uuid) -> AppResult<Task> {
    let mut task = lock_task(tx, task_id).await?;

    if !task.is_completed() {
        task.status = TaskStatus::Completed;
        task.updated_at = Utc::now();
        tx.update_task(&task).await?;
    }

    let aggregates = aggregation_service::recompute(tx, task.request_id).await?;
    info!(
        "✅ Tarea {} completada ({} / solicitud {:?})",
        task.id, aggregates.completed_boards, aggregates.status
    );
    Ok(task)
}

pub async fn list_tasks(tx: &mut dyn StoreTx, page: Option<PageRequest>) -> AppResult<Vec<Task>> {
    tx.list_tasks(page).await
}

pub async fn tasks_by_vehicle(
    tx: &mut dyn StoreTx,
    vehicle_id: Uuid,
    date: Option<NaiveDate>,
) -> AppResult<Vec<Task>> {
    tx.tasks_by_vehicle(vehicle_id, date).await
}

pub async fn tasks_by_date(tx: &mut dyn StoreTx, date: NaiveDate) -> AppResult<Vec<Task>> {
    tx.tasks_by_date(date).await
}

/// Tareas de los vehículos de un conductor, opcionalmente de un día
pub async fn driver_tasks(
    tx: &mut dyn StoreTx,
    driver_id: Uuid,
    date: Option<NaiveDate>,
) -> AppResult<Vec<Task>> {
    let vehicles = tx.vehicles_by_driver(driver_id).await?;
    let mut tasks = Vec::new();
    for vehicle in vehicles {
        tasks.extend(tx.tasks_by_vehicle(vehicle.id, date).await?);
    }
    tasks.sort_by_key(|t| {
        (
            t.scheduled_date,
            t.scheduled_start_minute,
            t.created_at,
        )
    });
    Ok(tasks)
}

/// Adjunta la cabecera de su solicitud a cada tarea
///
/// Las tareas cuya solicitud ya no existe se omiten.
pub async fn enrich(tx: &mut dyn StoreTx, tasks: Vec<Task>) -> AppResult<Vec<EnrichedTask>> {
    let mut headers: HashMap<Uuid, Option<RequestHeader>> = HashMap::new();
    let mut enriched = Vec::with_capacity(tasks.len());

    for task in tasks {
        if !headers.contains_key(&task.request_id) {
            let header = tx
                .get_request(task.request_id)
                .await?
                .as_ref()
                .map(RequestHeader::from);
            headers.insert(task.request_id, header);
        }
        if let Some(Some(request)) = headers.get(&task.request_id) {
            enriched.push(EnrichedTask {
                request: request.clone(),
                task,
            });
        }
    }

    Ok(enriched)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_task_is_frozen() {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            request_id: Uuid::new_v4(),
            boards: 2,
            assigned_vehicle_id: None,
            estimated_duration_minutes: None,
            status: TaskStatus::Completed,
            scheduled_date: None,
            scheduled_start_minute: None,
            scheduled_end_minute: None,
            scheduled_lane: None,
            created_at: now,
            updated_at: now,
        };
        let err = ensure_not_completed(&task, "delete").unwrap_err();
        assert_eq!(err.to_string(), "Invalid state: Cannot delete a completed task");
    }
}
