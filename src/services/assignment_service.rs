//! Servicio de asignación
//!
//! Reparte las tablas de una solicitud entre vehículos. Todas las
//! comprobaciones (tablas > 0, vehículo existente, capacidad del vehículo y
//! conservación del total de la solicitud) se hacen antes de escribir nada:
//! un lote inválido no inserta ninguna tarea.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::request_dto::AssignmentItem;
use crate::models::{Request, Task, TaskSchedule, TaskStatus, Vehicle};
use crate::repositories::StoreTx;
use crate::services::aggregation_service::{self, sum_boards};
use crate::utils::errors::{invalid_input, not_found_error, AppError, AppResult};
use crate::utils::validation::{ensure_positive_boards, ensure_time_range};

/// Una tarea nunca lleva más tablas que la capacidad de su vehículo
pub fn ensure_vehicle_capacity(vehicle: &Vehicle, boards: i32) -> AppResult<()> {
    if !vehicle.can_carry(boards) {
        return Err(AppError::CapacityExceeded(format!(
            "Boards exceed vehicle capacity ({})",
            vehicle.plate
        )));
    }
    Ok(())
}

/// Las tablas de todas las tareas de una solicitud no superan su total
pub fn ensure_within_request(request: &Request, existing_boards: i64, new_boards: i64) -> AppResult<()> {
    let total = existing_boards.checked_add(new_boards);
    if total.map_or(true, |total| total > i64::from(request.boards)) {
        return Err(AppError::BoardsExceeded(
            "Total assigned boards would exceed request total".to_string(),
        ));
    }
    Ok(())
}

/// Valida la franja horaria opcional de una asignación
pub fn ensure_schedule(schedule: Option<&TaskSchedule>) -> AppResult<()> {
    if let Some(schedule) = schedule {
        ensure_time_range(schedule.start_minute, schedule.end_minute)?;
        if schedule.lane.is_some_and(|lane| lane < 0) {
            return Err(invalid_input("Lane must be >= 0"));
        }
    }
    Ok(())
}

/// Tarea recién asignada a partir de un elemento validado
fn build_task(
    request: &Request,
    item: &AssignmentItem,
    schedule: Option<TaskSchedule>,
    now: DateTime<Utc>,
) -> Task {
    let mut task = Task {
        id: Uuid::new_v4(),
        request_id: request.id,
        boards: item.boards,
        assigned_vehicle_id: Some(item.vehicle_id),
        estimated_duration_minutes: Some(
            item.estimated_duration_minutes
                .unwrap_or(request.estimated_task_duration_minutes),
        ),
        status: TaskStatus::Assigned,
        scheduled_date: None,
        scheduled_start_minute: None,
        scheduled_end_minute: None,
        scheduled_lane: None,
        created_at: now,
        updated_at: now,
    };
    task.set_schedule(schedule);
    task
}

/// Asigna un lote de vehículos a una solicitud creando una tarea por elemento
pub async fn assign_vehicles_to_request(
    tx: &mut dyn StoreTx,
    request_id: Uuid,
    assignments: &[AssignmentItem],
) -> AppResult<Vec<Task>> {
    let request = tx
        .lock_request(request_id)
        .await?
        .ok_or_else(|| not_found_error("Request"))?;

    if assignments.is_empty() {
        return Err(invalid_input("No assignments provided"));
    }

    let mut vehicles: HashMap<Uuid, Vehicle> = HashMap::new();
    let mut schedules = Vec::with_capacity(assignments.len());

    for item in assignments {
        ensure_positive_boards(item.boards)?;
        item.validate()?;
        let schedule = item.schedule()?;
        ensure_schedule(schedule.as_ref())?;
        schedules.push(schedule);

        if !vehicles.contains_key(&item.vehicle_id) {
            let vehicle = tx
                .get_vehicle(item.vehicle_id)
                .await?
                .ok_or_else(|| not_found_error("Vehicle"))?;
            vehicles.insert(vehicle.id, vehicle);
        }
        if let Some(vehicle) = vehicles.get(&item.vehicle_id) {
            ensure_vehicle_capacity(vehicle, item.boards)?;
        }
    }

    let existing = tx.tasks_by_request(request_id).await?;
    let existing_boards = sum_boards(&existing);
    let new_boards: i64 = assignments.iter().map(|a| i64::from(a.boards)).sum();

    if let Err(e) = ensure_within_request(&request, existing_boards, new_boards) {
        warn!(
            "⛔ Asignación rechazada para {}: {} nuevas > {} restantes de {}",
            request_id,
            new_boards,
            request.remaining_boards(),
            request.boards
        );
        return Err(e);
    }

    let now = Utc::now();
    let mut created = Vec::with_capacity(assignments.len());
    for (item, schedule) in assignments.iter().zip(schedules) {
        let task = build_task(&request, item, schedule, now);
        tx.insert_task(&task).await?;
        created.push(task);
    }

    aggregation_service::recompute(tx, request_id).await?;

    info!(
        "🚚 {} tareas asignadas a la solicitud {} ({} tablas)",
        created.len(),
        request_id,
        new_boards
    );

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RequestStatus;

    fn request(boards: i32) -> Request {
        let now = Utc::now();
        Request {
            id: Uuid::new_v4(),
            title: "Hamburgo → Bremen".to_string(),
            boards,
            estimated_task_duration_minutes: 90,
            sourcer_id: Uuid::new_v4(),
            start_location_id: Uuid::new_v4(),
            end_location_id: Uuid::new_v4(),
            notes: None,
            assigned_boards: 0,
            completed_boards: 0,
            status: RequestStatus::Incoming,
            created_at: now,
            updated_at: now,
        }
    }

    fn vehicle(capacity: i32) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            plate: "HH-AB-123".to_string(),
            board_capacity: capacity,
            driver_id: Uuid::new_v4(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_capacity_check() {
        let v = vehicle(8);
        assert!(ensure_vehicle_capacity(&v, 8).is_ok());
        let err = ensure_vehicle_capacity(&v, 9).unwrap_err();
        assert_eq!(err.to_string(), "Capacity exceeded: Boards exceed vehicle capacity (HH-AB-123)");
    }

    #[test]
    fn test_conservation_check() {
        let r = request(10);
        assert!(ensure_within_request(&r, 6, 4).is_ok());
        assert!(matches!(
            ensure_within_request(&r, 6, 9),
            Err(AppError::BoardsExceeded(_))
        ));
        assert!(matches!(
            ensure_within_request(&r, i64::MAX, 1),
            Err(AppError::BoardsExceeded(_))
        ));
    }

    #[test]
    fn test_build_task_defaults_duration_from_request() {
        let r = request(10);
        let item = AssignmentItem::new(Uuid::new_v4(), 4);
        let task = build_task(&r, &item, None, Utc::now());
        assert_eq!(task.estimated_duration_minutes, Some(90));
        assert_eq!(task.status, TaskStatus::Assigned);
        assert_eq!(task.assigned_vehicle_id, Some(item.vehicle_id));
        assert!(task.schedule().is_none());
    }

    #[test]
    fn test_ensure_schedule_rejects_negative_lane() {
        let schedule = TaskSchedule {
            date: chrono::NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            start_minute: 480,
            end_minute: 540,
            lane: Some(-1),
        };
        assert!(ensure_schedule(Some(&schedule)).is_err());
        assert!(ensure_schedule(None).is_ok());
    }
}
