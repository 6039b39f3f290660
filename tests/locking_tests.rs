use std::sync::Arc;

use async_trait::async_trait;
use board_scheduler::dto::location_dto::CreateLocationRequest;
use board_scheduler::dto::request_dto::{AssignmentItem, CreateRequestRequest};
use board_scheduler::dto::vehicle_dto::CreateVehicleRequest;
use board_scheduler::models::{
    Location, Request, RequestAggregates, RequestStatus, Task, TaskStatus, Vehicle,
};
use board_scheduler::repositories::{MemoryStore, PageRequest, Store, StoreTx};
use board_scheduler::services::{
    assignment_service, location_service, request_service, task_service, vehicle_service,
};
use board_scheduler::utils::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Transacción que, al bloquear la solicitud, deja ver una tarea ya
/// completada por otra transacción confirmada justo antes del bloqueo
struct CompletedWhileWaiting {
    inner: Box<dyn StoreTx>,
    task_id: Option<Uuid>,
}

#[async_trait]
impl StoreTx for CompletedWhileWaiting {
    async fn get_request(&mut self, id: Uuid) -> AppResult<Option<Request>> {
        self.inner.get_request(id).await
    }

    async fn lock_request(&mut self, id: Uuid) -> AppResult<Option<Request>> {
        if let Some(task_id) = self.task_id.take() {
            if let Some(mut task) = self.inner.get_task(task_id).await? {
                task.status = TaskStatus::Completed;
                self.inner.update_task(&task).await?;
            }
        }
        self.inner.lock_request(id).await
    }

    async fn list_requests(&mut self) -> AppResult<Vec<Request>> {
        self.inner.list_requests().await
    }

    async fn list_requests_by_status(
        &mut self,
        status: RequestStatus,
        page: PageRequest,
    ) -> AppResult<Vec<Request>> {
        self.inner.list_requests_by_status(status, page).await
    }

    async fn insert_request(&mut self, request: &Request) -> AppResult<()> {
        self.inner.insert_request(request).await
    }

    async fn update_request(&mut self, request: &Request) -> AppResult<()> {
        self.inner.update_request(request).await
    }

    async fn delete_request(&mut self, id: Uuid) -> AppResult<()> {
        self.inner.delete_request(id).await
    }

    async fn patch_request_aggregates(
        &mut self,
        id: Uuid,
        aggregates: &RequestAggregates,
        updated_at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.inner
            .patch_request_aggregates(id, aggregates, updated_at)
            .await
    }

    async fn get_task(&mut self, id: Uuid) -> AppResult<Option<Task>> {
        self.inner.get_task(id).await
    }

    async fn list_tasks(&mut self, page: Option<PageRequest>) -> AppResult<Vec<Task>> {
        self.inner.list_tasks(page).await
    }

    async fn tasks_by_request(&mut self, request_id: Uuid) -> AppResult<Vec<Task>> {
        self.inner.tasks_by_request(request_id).await
    }

    async fn tasks_by_date(&mut self, date: NaiveDate) -> AppResult<Vec<Task>> {
        self.inner.tasks_by_date(date).await
    }

    async fn tasks_by_vehicle(
        &mut self,
        vehicle_id: Uuid,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<Task>> {
        self.inner.tasks_by_vehicle(vehicle_id, date).await
    }

    async fn insert_task(&mut self, task: &Task) -> AppResult<()> {
        self.inner.insert_task(task).await
    }

    async fn update_task(&mut self, task: &Task) -> AppResult<()> {
        self.inner.update_task(task).await
    }

    async fn delete_task(&mut self, id: Uuid) -> AppResult<()> {
        self.inner.delete_task(id).await
    }

    async fn get_vehicle(&mut self, id: Uuid) -> AppResult<Option<Vehicle>> {
        self.inner.get_vehicle(id).await
    }

    async fn find_vehicle_by_plate(&mut self, plate: &str) -> AppResult<Option<Vehicle>> {
        self.inner.find_vehicle_by_plate(plate).await
    }

    async fn vehicles_by_driver(&mut self, driver_id: Uuid) -> AppResult<Vec<Vehicle>> {
        self.inner.vehicles_by_driver(driver_id).await
    }

    async fn list_vehicles(&mut self) -> AppResult<Vec<Vehicle>> {
        self.inner.list_vehicles().await
    }

    async fn insert_vehicle(&mut self, vehicle: &Vehicle) -> AppResult<()> {
        self.inner.insert_vehicle(vehicle).await
    }

    async fn get_location(&mut self, id: Uuid) -> AppResult<Option<Location>> {
        self.inner.get_location(id).await
    }

    async fn list_locations(&mut self) -> AppResult<Vec<Location>> {
        self.inner.list_locations().await
    }

    async fn insert_location(&mut self, location: &Location) -> AppResult<()> {
        self.inner.insert_location(location).await
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.inner.commit().await
    }
}

/// Solicitud de 10 tablas con una tarea de 4 asignada; devuelve (tarea, vehículo)
async fn seed(store: &Arc<dyn Store>) -> (Task, Vehicle) {
    let mut tx = store.begin().await.unwrap();
    let start = location_service::create_location(
        tx.as_mut(),
        CreateLocationRequest {
            name: "Aserradero Norte".to_string(),
            address: None,
            lat: None,
            lng: None,
        },
    )
    .await
    .unwrap();
    let end = location_service::create_location(
        tx.as_mut(),
        CreateLocationRequest {
            name: "Obra Puerto".to_string(),
            address: None,
            lat: None,
            lng: None,
        },
    )
    .await
    .unwrap();
    let request = request_service::create_request(
        tx.as_mut(),
        Uuid::new_v4(),
        CreateRequestRequest {
            title: "Tablas para forjado".to_string(),
            boards: 10,
            estimated_task_duration_minutes: None,
            sourcer_id: None,
            start_location_id: start.id,
            end_location_id: end.id,
            notes: None,
        },
    )
    .await
    .unwrap();
    let (vehicle, _) = vehicle_service::create_vehicle(
        tx.as_mut(),
        CreateVehicleRequest {
            plate: "HH-LK-1".to_string(),
            board_capacity: 8,
            driver_id: Uuid::new_v4(),
            is_active: None,
        },
    )
    .await
    .unwrap();
    let mut tasks = assignment_service::assign_vehicles_to_request(
        tx.as_mut(),
        request.id,
        &[AssignmentItem::new(vehicle.id, 4)],
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();
    (tasks.remove(0), vehicle)
}

async fn racing_tx(store: &Arc<dyn Store>, task_id: Uuid) -> CompletedWhileWaiting {
    CompletedWhileWaiting {
        inner: store.begin().await.unwrap(),
        task_id: Some(task_id),
    }
}

#[tokio::test]
async fn test_mutations_see_completion_committed_before_lock() {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let (task, vehicle) = seed(&store).await;
    assert_eq!(task.status, TaskStatus::Assigned);

    // Cada transacción se suelta sin commit antes de abrir la siguiente
    {
        let mut tx = racing_tx(&store, task.id).await;
        let err = task_service::assign_task_to_vehicle(&mut tx, task.id, vehicle.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }
    {
        let mut tx = racing_tx(&store, task.id).await;
        let err = task_service::unschedule_task(&mut tx, task.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }
    {
        let mut tx = racing_tx(&store, task.id).await;
        let err = task_service::delete_task(&mut tx, task.id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
        assert_eq!(
            tx.get_task(task.id).await.unwrap().unwrap().status,
            TaskStatus::Completed
        );
    }
}

#[tokio::test]
async fn test_complete_returns_row_read_under_lock() {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let (task, _) = seed(&store).await;

    let mut tx = racing_tx(&store, task.id).await;
    let completed = task_service::complete_task(&mut tx, task.id).await.unwrap();
    assert_eq!(completed.status, TaskStatus::Completed);
    assert_eq!(completed.updated_at, task.updated_at);

    let request = tx.get_request(task.request_id).await.unwrap().unwrap();
    assert_eq!(request.completed_boards, 4);
}
