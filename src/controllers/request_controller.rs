use std::sync::Arc;
use uuid::Uuid;

use crate::dto::common_dto::{ApiResponse, Paginated};
use crate::dto::request_dto::{
    AssignVehiclesRequest, AssignmentItem, CreateRequestRequest, RequestSummary,
    UpdateRequestRequest,
};
use crate::models::{Request, RequestStatus, Task};
use crate::repositories::{PageRequest, Store};
use crate::services::{assignment_service, request_service, task_service};
use crate::utils::errors::AppError;

pub struct RequestController {
    store: Arc<dyn Store>,
}

impl RequestController {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(
        &self,
        status: Option<RequestStatus>,
    ) -> Result<ApiResponse<Vec<Request>>, AppError> {
        let mut tx = self.store.begin().await?;
        let requests = request_service::list_requests(tx.as_mut(), status).await?;
        Ok(ApiResponse::success(requests))
    }

    pub async fn get(&self, id: Uuid) -> Result<ApiResponse<RequestSummary>, AppError> {
        let mut tx = self.store.begin().await?;
        let summary = request_service::get_summary(tx.as_mut(), id).await?;
        Ok(ApiResponse::success(summary))
    }

    pub async fn create(
        &self,
        session_user: Uuid,
        payload: CreateRequestRequest,
    ) -> Result<ApiResponse<Request>, AppError> {
        let mut tx = self.store.begin().await?;
        let request = request_service::create_request(tx.as_mut(), session_user, payload).await?;
        tx.commit().await?;
        Ok(ApiResponse::success_with_message(request, "Request created"))
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: UpdateRequestRequest,
    ) -> Result<ApiResponse<Request>, AppError> {
        let mut tx = self.store.begin().await?;
        let request = request_service::update_request(tx.as_mut(), id, payload).await?;
        tx.commit().await?;
        Ok(ApiResponse::success_with_message(request, "Request updated"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<ApiResponse<Uuid>, AppError> {
        let mut tx = self.store.begin().await?;
        request_service::delete_request(tx.as_mut(), id).await?;
        tx.commit().await?;
        Ok(ApiResponse::success_with_message(id, "Request deleted"))
    }

    pub async fn pending(
        &self,
        limit: Option<i64>,
    ) -> Result<ApiResponse<Vec<RequestSummary>>, AppError> {
        let mut tx = self.store.begin().await?;
        let pending = request_service::list_pending_with_summary(tx.as_mut(), limit).await?;
        Ok(ApiResponse::success(pending))
    }

    pub async fn finished(
        &self,
        page: PageRequest,
    ) -> Result<ApiResponse<Paginated<RequestSummary>>, AppError> {
        let mut tx = self.store.begin().await?;
        let finished = request_service::paginate_finished(tx.as_mut(), page).await?;
        Ok(ApiResponse::success(finished))
    }

    pub async fn assign_vehicles(
        &self,
        id: Uuid,
        payload: AssignVehiclesRequest,
    ) -> Result<ApiResponse<Vec<Task>>, AppError> {
        let mut tx = self.store.begin().await?;
        let tasks =
            assignment_service::assign_vehicles_to_request(tx.as_mut(), id, &payload.assignments)
                .await?;
        tx.commit().await?;
        let message = format!("{} tasks assigned", tasks.len());
        Ok(ApiResponse::success_with_message(tasks, message))
    }

    pub async fn create_task(
        &self,
        id: Uuid,
        item: AssignmentItem,
    ) -> Result<ApiResponse<Task>, AppError> {
        let mut tx = self.store.begin().await?;
        let task = task_service::create_task_for_request(tx.as_mut(), id, item).await?;
        tx.commit().await?;
        Ok(ApiResponse::success_with_message(task, "Task created"))
    }
}
