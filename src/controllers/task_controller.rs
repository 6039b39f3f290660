use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use crate::dto::common_dto::{ApiResponse, Paginated};
use crate::dto::task_dto::{CreateTaskRequest, EnrichedTask, ScheduleTaskRequest};
use crate::models::Task;
use crate::repositories::{PageRequest, Store};
use crate::services::task_service;
use crate::utils::errors::AppError;

pub struct TaskController {
    store: Arc<dyn Store>,
}

impl TaskController {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<ApiResponse<Vec<Task>>, AppError> {
        let mut tx = self.store.begin().await?;
        let tasks = task_service::list_tasks(tx.as_mut(), None).await?;
        Ok(ApiResponse::success(tasks))
    }

    pub async fn paginate(&self, page: PageRequest) -> Result<ApiResponse<Paginated<Task>>, AppError> {
        let mut tx = self.store.begin().await?;
        let tasks = task_service::list_tasks(tx.as_mut(), Some(page)).await?;
        Ok(ApiResponse::success(Paginated::new(tasks, page)))
    }

    pub async fn by_vehicle(
        &self,
        vehicle_id: Uuid,
        date: Option<NaiveDate>,
    ) -> Result<ApiResponse<Vec<Task>>, AppError> {
        let mut tx = self.store.begin().await?;
        let tasks = task_service::tasks_by_vehicle(tx.as_mut(), vehicle_id, date).await?;
        Ok(ApiResponse::success(tasks))
    }

    pub async fn by_date(&self, date: NaiveDate) -> Result<ApiResponse<Vec<Task>>, AppError> {
        let mut tx = self.store.begin().await?;
        let tasks = task_service::tasks_by_date(tx.as_mut(), date).await?;
        Ok(ApiResponse::success(tasks))
    }

    pub async fn by_date_enriched(
        &self,
        date: NaiveDate,
    ) -> Result<ApiResponse<Vec<EnrichedTask>>, AppError> {
        let mut tx = self.store.begin().await?;
        let tasks = task_service::tasks_by_date(tx.as_mut(), date).await?;
        let enriched = task_service::enrich(tx.as_mut(), tasks).await?;
        Ok(ApiResponse::success(enriched))
    }

    /// Tareas de los vehículos del usuario de la sesión
    pub async fn mine(
        &self,
        driver_id: Uuid,
        date: Option<NaiveDate>,
    ) -> Result<ApiResponse<Vec<Task>>, AppError> {
        let mut tx = self.store.begin().await?;
        let tasks = task_service::driver_tasks(tx.as_mut(), driver_id, date).await?;
        Ok(ApiResponse::success(tasks))
    }

    pub async fn mine_enriched(
        &self,
        driver_id: Uuid,
        date: Option<NaiveDate>,
    ) -> Result<ApiResponse<Vec<EnrichedTask>>, AppError> {
        let mut tx = self.store.begin().await?;
        let tasks = task_service::driver_tasks(tx.as_mut(), driver_id, date).await?;
        let enriched = task_service::enrich(tx.as_mut(), tasks).await?;
        Ok(ApiResponse::success(enriched))
    }

    pub async fn create(&self, payload: CreateTaskRequest) -> Result<ApiResponse<Task>, AppError> {
        let mut tx = self.store.begin().await?;
        let task = task_service::create_task(tx.as_mut(), payload).await?;
        tx.commit().await?;
        Ok(ApiResponse::success_with_message(task, "Task created"))
    }

    pub async fn assign(&self, id: Uuid, vehicle_id: Uuid) -> Result<ApiResponse<Task>, AppError> {
        let mut tx = self.store.begin().await?;
        let task = task_service::assign_task_to_vehicle(tx.as_mut(), id, vehicle_id).await?;
        tx.commit().await?;
        Ok(ApiResponse::success_with_message(task, "Task assigned"))
    }

    pub async fn schedule(
        &self,
        id: Uuid,
        payload: ScheduleTaskRequest,
    ) -> Result<ApiResponse<Task>, AppError> {
        let mut tx = self.store.begin().await?;
        let task = task_service::schedule_task(tx.as_mut(), id, payload).await?;
        tx.commit().await?;
        Ok(ApiResponse::success_with_message(task, "Task scheduled"))
    }

    pub async fn unschedule(&self, id: Uuid) -> Result<ApiResponse<Task>, AppError> {
        let mut tx = self.store.begin().await?;
        let task = task_service::unschedule_task(tx.as_mut(), id).await?;
        tx.commit().await?;
        Ok(ApiResponse::success_with_message(task, "Task unscheduled"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<ApiResponse<Uuid>, AppError> {
        let mut tx = self.store.begin().await?;
        task_service::delete_task(tx.as_mut(), id).await?;
        tx.commit().await?;
        Ok(ApiResponse::success_with_message(id, "Task deleted"))
    }

    pub async fn complete(&self, id: Uuid) -> Result<ApiResponse<Task>, AppError> {
        let mut tx = self.store.begin().await?;
        let task = task_service::complete_task(tx.as_mut(), id).await?;
        tx.commit().await?;
        Ok(ApiResponse::success_with_message(task, "Task completed"))
    }
}
