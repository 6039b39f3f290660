//! Servicio de agregación
//!
//! Mantiene `assigned_boards`, `completed_boards` y `status` de cada
//! solicitud consistentes con sus tareas. Se invoca dentro de la misma
//! transacción que la mutación de tarea que lo dispara.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{RequestAggregates, RequestStatus, Task, TaskStatus};
use crate::repositories::StoreTx;
use crate::utils::errors::{not_found_error, AppResult};

/// Suma de tablas de todas las tareas, en `i64` para que no desborde
pub fn sum_boards(tasks: &[Task]) -> i64 {
    tasks.iter().map(|t| i64::from(t.boards)).sum()
}

/// Los contadores persistidos son `i32`; la conservación los mantiene
/// por debajo de `request.boards`
fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Deriva contadores y estado a partir de las tareas de una solicitud
///
/// - sin tareas → `incoming`
/// - completadas ≥ total → `finished`
/// - en otro caso → `partially_assigned`
pub fn compute_aggregates(request_boards: i32, tasks: &[Task]) -> RequestAggregates {
    let assigned_boards = sum_boards(tasks);
    let completed_boards: i64 = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .map(|t| i64::from(t.boards))
        .sum();

    let status = if tasks.is_empty() {
        RequestStatus::Incoming
    } else if completed_boards >= i64::from(request_boards) {
        RequestStatus::Finished
    } else {
        RequestStatus::PartiallyAssigned
    };

    RequestAggregates {
        assigned_boards: saturate(assigned_boards),
        completed_boards: saturate(completed_boards),
        status,
    }
}

/// Recalcula y persiste los agregados de la solicitud
pub async fn recompute(tx: &mut dyn StoreTx, request_id: Uuid) -> AppResult<RequestAggregates> {
    let request = tx
        .get_request(request_id)
        .await?
        .ok_or_else(|| not_found_error("Request"))?;

    let tasks = tx.tasks_by_request(request_id).await?;
    let previous = request.aggregates();
    let aggregates = compute_aggregates(request.boards, &tasks);

    tx.patch_request_aggregates(request_id, &aggregates, Utc::now())
        .await?;

    if previous.status != aggregates.status {
        info!(
            "📦 Solicitud {}: {:?} → {:?}",
            request_id, previous.status, aggregates.status
        );
    }

    debug!(
        "🔄 Agregados de {}: asignadas={} completadas={} estado={:?}",
        request_id, aggregates.assigned_boards, aggregates.completed_boards, aggregates.status
    );

    Ok(aggregates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(boards: i32, status: TaskStatus) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            request_id: Uuid::nil(),
            boards,
            assigned_vehicle_id: Some(Uuid::new_v4()),
            estimated_duration_minutes: None,
            status,
            scheduled_date: None,
            scheduled_start_minute: None,
            scheduled_end_minute: None,
            scheduled_lane: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_no_tasks_is_incoming() {
        let agg = compute_aggregates(10, &[]);
        assert_eq!(agg.status, RequestStatus::Incoming);
        assert_eq!(agg.assigned_boards, 0);
        assert_eq!(agg.completed_boards, 0);
    }

    #[test]
    fn test_partial_completion_stays_partially_assigned() {
        let tasks = vec![task(6, TaskStatus::Completed)];
        let agg = compute_aggregates(10, &tasks);
        assert_eq!(agg.assigned_boards, 6);
        assert_eq!(agg.completed_boards, 6);
        assert_eq!(agg.status, RequestStatus::PartiallyAssigned);
    }

    #[test]
    fn test_fully_assigned_but_not_completed() {
        let tasks = vec![task(6, TaskStatus::Completed), task(4, TaskStatus::Assigned)];
        let agg = compute_aggregates(10, &tasks);
        assert_eq!(agg.assigned_boards, 10);
        assert_eq!(agg.completed_boards, 6);
        assert_eq!(agg.status, RequestStatus::PartiallyAssigned);
    }

    #[test]
    fn test_completed_boards_reaching_total_finishes() {
        let tasks = vec![task(6, TaskStatus::Completed), task(4, TaskStatus::Completed)];
        let agg = compute_aggregates(10, &tasks);
        assert_eq!(agg.completed_boards, 10);
        assert_eq!(agg.status, RequestStatus::Finished);
    }

    #[test]
    fn test_sums_do_not_wrap() {
        let tasks = vec![task(i32::MAX, TaskStatus::Assigned), task(i32::MAX, TaskStatus::Assigned)];
        assert_eq!(sum_boards(&tasks), 2 * i64::from(i32::MAX));
        let agg = compute_aggregates(10, &tasks);
        assert_eq!(agg.assigned_boards, i32::MAX);
        assert_eq!(agg.status, RequestStatus::PartiallyAssigned);
    }

    #[test]
    fn test_pending_tasks_count_as_assigned() {
        let tasks = vec![task(3, TaskStatus::Pending), task(2, TaskStatus::Assigned)];
        let agg = compute_aggregates(10, &tasks);
        assert_eq!(agg.assigned_boards, 5);
        assert_eq!(agg.completed_boards, 0);
        assert_eq!(agg.status, RequestStatus::PartiallyAssigned);
    }
}
