//! Servicio de solicitudes
//!
//! Alta, edición y baja de solicitudes y los listados del tablero. Una
//! solicitud con tareas derivadas ya no se puede editar ni borrar.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::Paginated;
use crate::dto::request_dto::{CreateRequestRequest, RequestSummary, UpdateRequestRequest};
use crate::models::request::DEFAULT_TASK_DURATION_MINUTES;
use crate::models::{Request, RequestStatus};
use crate::repositories::{PageRequest, StoreTx};
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::{ensure_positive_boards, ensure_positive_duration};

/// Límite por defecto de la columna de pendientes
pub const DEFAULT_PENDING_LIMIT: i64 = 200;
pub const MAX_PENDING_LIMIT: i64 = 500;

async fn ensure_location(tx: &mut dyn StoreTx, location_id: Uuid) -> AppResult<()> {
    tx.get_location(location_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| not_found_error("Location"))
}

async fn ensure_no_tasks(tx: &mut dyn StoreTx, request_id: Uuid, action: &str) -> AppResult<()> {
    if !tx.tasks_by_request(request_id).await?.is_empty() {
        return Err(AppError::InvalidState(format!(
            "Cannot {} a request that has derived tasks",
            action
        )));
    }
    Ok(())
}

pub async fn list_requests(
    tx: &mut dyn StoreTx,
    status: Option<RequestStatus>,
) -> AppResult<Vec<Request>> {
    let requests = tx.list_requests().await?;
    Ok(match status {
        Some(status) => requests.into_iter().filter(|r| r.status == status).collect(),
        None => requests,
    })
}

pub async fn get_summary(tx: &mut dyn StoreTx, request_id: Uuid) -> AppResult<RequestSummary> {
    tx.get_request(request_id)
        .await?
        .map(RequestSummary::from)
        .ok_or_else(|| not_found_error("Request"))
}

/// Crea una solicitud `incoming` sin tablas asignadas
///
/// Sin `sourcer_id` explícito la solicitud queda a nombre de `session_user`.
pub async fn create_request(
    tx: &mut dyn StoreTx,
    session_user: Uuid,
    payload: CreateRequestRequest,
) -> AppResult<Request> {
    ensure_positive_boards(payload.boards)?;
    payload.validate()?;

    let duration = payload
        .estimated_task_duration_minutes
        .unwrap_or(DEFAULT_TASK_DURATION_MINUTES);
    ensure_positive_duration(duration)?;

    ensure_location(tx, payload.start_location_id).await?;
    ensure_location(tx, payload.end_location_id).await?;

    let now = Utc::now();
    let request = Request {
        id: Uuid::new_v4(),
        title: payload.title.trim().to_string(),
        boards: payload.boards,
        estimated_task_duration_minutes: duration,
        sourcer_id: payload.sourcer_id.unwrap_or(session_user),
        start_location_id: payload.start_location_id,
        end_location_id: payload.end_location_id,
        notes: payload.notes,
        assigned_boards: 0,
        completed_boards: 0,
        status: RequestStatus::Incoming,
        created_at: now,
        updated_at: now,
    };

    tx.insert_request(&request).await?;
    info!("📦 Solicitud {} creada ({} tablas)", request.id, request.boards);
    Ok(request)
}

pub async fn update_request(
    tx: &mut dyn StoreTx,
    request_id: Uuid,
    payload: UpdateRequestRequest,
) -> AppResult<Request> {
    payload.validate()?;

    let mut request = tx
        .lock_request(request_id)
        .await?
        .ok_or_else(|| not_found_error("Request"))?;
    ensure_no_tasks(tx, request_id, "modify").await?;

    if let Some(title) = payload.title {
        request.title = title.trim().to_string();
    }
    if let Some(boards) = payload.boards {
        ensure_positive_boards(boards)?;
        request.boards = boards;
    }
    if let Some(duration) = payload.estimated_task_duration_minutes {
        ensure_positive_duration(duration)?;
        request.estimated_task_duration_minutes = duration;
    }
    if let Some(sourcer_id) = payload.sourcer_id {
        request.sourcer_id = sourcer_id;
    }
    if let Some(location_id) = payload.start_location_id {
        ensure_location(tx, location_id).await?;
        request.start_location_id = location_id;
    }
    if let Some(location_id) = payload.end_location_id {
        ensure_location(tx, location_id).await?;
        request.end_location_id = location_id;
    }
    if payload.notes.is_some() {
        request.notes = payload.notes;
    }
    request.updated_at = Utc::now();

    tx.update_request(&request).await?;
    Ok(request)
}

pub async fn delete_request(tx: &mut dyn StoreTx, request_id: Uuid) -> AppResult<()> {
    tx.lock_request(request_id)
        .await?
        .ok_or_else(|| not_found_error("Request"))?;
    ensure_no_tasks(tx, request_id, "delete").await?;

    tx.delete_request(request_id).await?;
    info!("🗑️ Solicitud {} eliminada", request_id);
    Ok(())
}

/// Normaliza el límite de la columna de pendientes a [1, MAX_PENDING_LIMIT]
pub fn pending_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_PENDING_LIMIT)
        .clamp(1, MAX_PENDING_LIMIT)
}

/// Solicitudes `incoming` y `partially_assigned`, las más recientes primero
pub async fn list_pending_with_summary(
    tx: &mut dyn StoreTx,
    limit: Option<i64>,
) -> AppResult<Vec<RequestSummary>> {
    let cap = pending_limit(limit);
    let page = PageRequest {
        limit: cap,
        offset: 0,
    };

    let mut pending = tx
        .list_requests_by_status(RequestStatus::Incoming, page)
        .await?;
    pending.extend(
        tx.list_requests_by_status(RequestStatus::PartiallyAssigned, page)
            .await?,
    );

    pending.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    pending.truncate(cap as usize);

    Ok(pending.into_iter().map(RequestSummary::from).collect())
}

/// Página de solicitudes `finished`, las más recientes primero
pub async fn paginate_finished(
    tx: &mut dyn StoreTx,
    page: PageRequest,
) -> AppResult<Paginated<RequestSummary>> {
    let finished = tx
        .list_requests_by_status(RequestStatus::Finished, page)
        .await?;
    Ok(Paginated::new(
        finished.into_iter().map(RequestSummary::from).collect(),
        page,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_limit_clamp() {
        assert_eq!(pending_limit(None), 200);
        assert_eq!(pending_limit(Some(0)), 1);
        assert_eq!(pending_limit(Some(-4)), 1);
        assert_eq!(pending_limit(Some(50)), 50);
        assert_eq!(pending_limit(Some(10_000)), 500);
    }
}
