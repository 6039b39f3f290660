use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::models::{Request, RequestAggregates, RequestStatus};
use crate::repositories::PageRequest;
use crate::utils::errors::AppError;

pub struct RequestRepository;

impl RequestRepository {
    pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Request>, AppError> {
        let request = sqlx::query_as::<_, Request>("SELECT * FROM requests WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(request)
    }

    /// Bloquea la fila para serializar mutaciones concurrentes sobre la misma solicitud
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Request>, AppError> {
        let request = sqlx::query_as::<_, Request>("SELECT * FROM requests WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(request)
    }

    pub async fn find_all(conn: &mut PgConnection) -> Result<Vec<Request>, AppError> {
        let requests = sqlx::query_as::<_, Request>("SELECT * FROM requests ORDER BY created_at DESC")
            .fetch_all(conn)
            .await?;

        Ok(requests)
    }

    pub async fn find_by_status(
        conn: &mut PgConnection,
        status: RequestStatus,
        page: PageRequest,
    ) -> Result<Vec<Request>, AppError> {
        let requests = sqlx::query_as::<_, Request>(
            r#"
            SELECT * FROM requests
            WHERE status = $1
            ORDER BY updated_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(conn)
        .await?;

        Ok(requests)
    }

    pub async fn insert(conn: &mut PgConnection, request: &Request) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO requests (
                id, title, boards, estimated_task_duration_minutes, sourcer_id,
                start_location_id, end_location_id, notes, assigned_boards,
                completed_boards, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(request.id)
        .bind(&request.title)
        .bind(request.boards)
        .bind(request.estimated_task_duration_minutes)
        .bind(request.sourcer_id)
        .bind(request.start_location_id)
        .bind(request.end_location_id)
        .bind(&request.notes)
        .bind(request.assigned_boards)
        .bind(request.completed_boards)
        .bind(request.status)
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Actualiza los campos editables; los contadores derivados no se tocan aquí
    pub async fn update(conn: &mut PgConnection, request: &Request) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE requests
            SET title = $2, boards = $3, estimated_task_duration_minutes = $4,
                sourcer_id = $5, start_location_id = $6, end_location_id = $7,
                notes = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(request.id)
        .bind(&request.title)
        .bind(request.boards)
        .bind(request.estimated_task_duration_minutes)
        .bind(request.sourcer_id)
        .bind(request.start_location_id)
        .bind(request.end_location_id)
        .bind(&request.notes)
        .bind(request.updated_at)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Request not found".to_string()));
        }
        Ok(())
    }

    pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM requests WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(())
    }

    pub async fn patch_aggregates(
        conn: &mut PgConnection,
        id: Uuid,
        aggregates: &RequestAggregates,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE requests
            SET assigned_boards = $2, completed_boards = $3, status = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(aggregates.assigned_boards)
        .bind(aggregates.completed_boards)
        .bind(aggregates.status)
        .bind(updated_at)
        .execute(conn)
        .await?;

        Ok(())
    }
}
