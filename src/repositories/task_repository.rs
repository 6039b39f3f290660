use chrono::NaiveDate;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::models::Task;
use crate::repositories::PageRequest;
use crate::utils::errors::AppError;

pub struct TaskRepository;

impl TaskRepository {
    pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(task)
    }

    pub async fn find_all(
        conn: &mut PgConnection,
        page: Option<PageRequest>,
    ) -> Result<Vec<Task>, AppError> {
        let tasks = match page {
            Some(page) => {
                sqlx::query_as::<_, Task>(
                    "SELECT * FROM tasks ORDER BY created_at ASC LIMIT $1 OFFSET $2",
                )
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(conn)
                .await?
            }
            None => {
                sqlx::query_as::<_, Task>("SELECT * FROM tasks ORDER BY created_at ASC")
                    .fetch_all(conn)
                    .await?
            }
        };

        Ok(tasks)
    }

    pub async fn find_by_request(conn: &mut PgConnection, request_id: Uuid) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE request_id = $1 ORDER BY created_at ASC",
        )
        .bind(request_id)
        .fetch_all(conn)
        .await?;

        Ok(tasks)
    }

    pub async fn find_by_date(conn: &mut PgConnection, date: NaiveDate) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE scheduled_date = $1 ORDER BY scheduled_start_minute ASC",
        )
        .bind(date)
        .fetch_all(conn)
        .await?;

        Ok(tasks)
    }

    pub async fn find_by_vehicle(
        conn: &mut PgConnection,
        vehicle_id: Uuid,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT * FROM tasks
            WHERE assigned_vehicle_id = $1
              AND ($2::date IS NULL OR scheduled_date = $2)
            ORDER BY scheduled_date ASC NULLS LAST, scheduled_start_minute ASC NULLS LAST
            "#,
        )
        .bind(vehicle_id)
        .bind(date)
        .fetch_all(conn)
        .await?;

        Ok(tasks)
    }

    pub async fn insert(conn: &mut PgConnection, task: &Task) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO tasks (
                id, request_id, boards, assigned_vehicle_id, estimated_duration_minutes,
                status, scheduled_date, scheduled_start_minute, scheduled_end_minute,
                scheduled_lane, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(task.id)
        .bind(task.request_id)
        .bind(task.boards)
        .bind(task.assigned_vehicle_id)
        .bind(task.estimated_duration_minutes)
        .bind(task.status)
        .bind(task.scheduled_date)
        .bind(task.scheduled_start_minute)
        .bind(task.scheduled_end_minute)
        .bind(task.scheduled_lane)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn update(conn: &mut PgConnection, task: &Task) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET boards = $2, assigned_vehicle_id = $3, estimated_duration_minutes = $4,
                status = $5, scheduled_date = $6, scheduled_start_minute = $7,
                scheduled_end_minute = $8, scheduled_lane = $9, updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(task.id)
        .bind(task.boards)
        .bind(task.assigned_vehicle_id)
        .bind(task.estimated_duration_minutes)
        .bind(task.status)
        .bind(task.scheduled_date)
        .bind(task.scheduled_start_minute)
        .bind(task.scheduled_end_minute)
        .bind(task.scheduled_lane)
        .bind(task.updated_at)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Task not found".to_string()));
        }
        Ok(())
    }

    pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(())
    }
}
