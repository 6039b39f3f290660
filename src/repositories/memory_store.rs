//! Store en memoria
//!
//! Las transacciones se serializan detrás de un único `Mutex`: `begin` toma
//! el candado y trabaja sobre una copia; `commit` la vuelca. Soltar la
//! transacción sin `commit` descarta todos sus cambios.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::models::{Location, Request, RequestAggregates, RequestStatus, Task, Vehicle};
use crate::repositories::{PageRequest, Store, StoreTx};
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
struct MemoryData {
    requests: HashMap<Uuid, Request>,
    tasks: HashMap<Uuid, Task>,
    vehicles: HashMap<Uuid, Vehicle>,
    locations: HashMap<Uuid, Location>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<MemoryData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTx>> {
        let guard = self.data.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTx { guard, working }))
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<MemoryData>,
    working: MemoryData,
}

fn paginate<T>(items: Vec<T>, page: PageRequest) -> Vec<T> {
    items
        .into_iter()
        .skip(page.offset.max(0) as usize)
        .take(page.limit.max(0) as usize)
        .collect()
}

fn sorted_tasks(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|a, b| {
        a.scheduled_date
            .is_none()
            .cmp(&b.scheduled_date.is_none())
            .then(a.scheduled_date.cmp(&b.scheduled_date))
            .then(a.scheduled_start_minute.cmp(&b.scheduled_start_minute))
            .then(a.created_at.cmp(&b.created_at))
    });
    tasks
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn get_request(&mut self, id: Uuid) -> AppResult<Option<Request>> {
        Ok(self.working.requests.get(&id).cloned())
    }

    async fn lock_request(&mut self, id: Uuid) -> AppResult<Option<Request>> {
        // El candado global ya serializa la transacción completa
        self.get_request(id).await
    }

    async fn list_requests(&mut self) -> AppResult<Vec<Request>> {
        let mut requests: Vec<Request> = self.working.requests.values().cloned().collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    async fn list_requests_by_status(
        &mut self,
        status: RequestStatus,
        page: PageRequest,
    ) -> AppResult<Vec<Request>> {
        let mut requests: Vec<Request> = self
            .working
            .requests
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(paginate(requests, page))
    }

    async fn insert_request(&mut self, request: &Request) -> AppResult<()> {
        self.working.requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn update_request(&mut self, request: &Request) -> AppResult<()> {
        let current = self
            .working
            .requests
            .get_mut(&request.id)
            .ok_or_else(|| AppError::NotFound("Request not found".to_string()))?;

        *current = Request {
            assigned_boards: current.assigned_boards,
            completed_boards: current.completed_boards,
            status: current.status,
            created_at: current.created_at,
            ..request.clone()
        };
        Ok(())
    }

    async fn delete_request(&mut self, id: Uuid) -> AppResult<()> {
        self.working.requests.remove(&id);
        Ok(())
    }

    async fn patch_request_aggregates(
        &mut self,
        id: Uuid,
        aggregates: &RequestAggregates,
        updated_at: DateTime<Utc>,
    ) -> AppResult<()> {
        if let Some(request) = self.working.requests.get_mut(&id) {
            request.assigned_boards = aggregates.assigned_boards;
            request.completed_boards = aggregates.completed_boards;
            request.status = aggregates.status;
            request.updated_at = updated_at;
        }
        Ok(())
    }

    async fn get_task(&mut self, id: Uuid) -> AppResult<Option<Task>> {
        Ok(self.working.tasks.get(&id).cloned())
    }

    async fn list_tasks(&mut self, page: Option<PageRequest>) -> AppResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self.working.tasks.values().cloned().collect();
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(match page {
            Some(page) => paginate(tasks, page),
            None => tasks,
        })
    }

    async fn tasks_by_request(&mut self, request_id: Uuid) -> AppResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .working
            .tasks
            .values()
            .filter(|t| t.request_id == request_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(tasks)
    }

    async fn tasks_by_date(&mut self, date: NaiveDate) -> AppResult<Vec<Task>> {
        let tasks = self
            .working
            .tasks
            .values()
            .filter(|t| t.scheduled_date == Some(date))
            .cloned()
            .collect();
        Ok(sorted_tasks(tasks))
    }

    async fn tasks_by_vehicle(
        &mut self,
        vehicle_id: Uuid,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<Task>> {
        let tasks = self
            .working
            .tasks
            .values()
            .filter(|t| t.assigned_vehicle_id == Some(vehicle_id))
            .filter(|t| date.is_none() || t.scheduled_date == date)
            .cloned()
            .collect();
        Ok(sorted_tasks(tasks))
    }

    async fn insert_task(&mut self, task: &Task) -> AppResult<()> {
        self.working.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn update_task(&mut self, task: &Task) -> AppResult<()> {
        match self.working.tasks.get_mut(&task.id) {
            Some(current) => {
                *current = Task {
                    created_at: current.created_at,
                    ..task.clone()
                };
                Ok(())
            }
            None => Err(AppError::NotFound("Task not found".to_string())),
        }
    }

    async fn delete_task(&mut self, id: Uuid) -> AppResult<()> {
        self.working.tasks.remove(&id);
        Ok(())
    }

    async fn get_vehicle(&mut self, id: Uuid) -> AppResult<Option<Vehicle>> {
        Ok(self.working.vehicles.get(&id).cloned())
    }

    async fn find_vehicle_by_plate(&mut self, plate: &str) -> AppResult<Option<Vehicle>> {
        Ok(self
            .working
            .vehicles
            .values()
            .find(|v| v.plate == plate)
            .cloned())
    }

    async fn vehicles_by_driver(&mut self, driver_id: Uuid) -> AppResult<Vec<Vehicle>> {
        let mut vehicles: Vec<Vehicle> = self
            .working
            .vehicles
            .values()
            .filter(|v| v.driver_id == driver_id)
            .cloned()
            .collect();
        vehicles.sort_by(|a, b| a.plate.cmp(&b.plate));
        Ok(vehicles)
    }

    async fn list_vehicles(&mut self) -> AppResult<Vec<Vehicle>> {
        let mut vehicles: Vec<Vehicle> = self.working.vehicles.values().cloned().collect();
        vehicles.sort_by(|a, b| a.plate.cmp(&b.plate));
        Ok(vehicles)
    }

    async fn insert_vehicle(&mut self, vehicle: &Vehicle) -> AppResult<()> {
        self.working.vehicles.insert(vehicle.id, vehicle.clone());
        Ok(())
    }

    async fn get_location(&mut self, id: Uuid) -> AppResult<Option<Location>> {
        Ok(self.working.locations.get(&id).cloned())
    }

    async fn list_locations(&mut self) -> AppResult<Vec<Location>> {
        let mut locations: Vec<Location> = self.working.locations.values().cloned().collect();
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(locations)
    }

    async fn insert_location(&mut self, location: &Location) -> AppResult<()> {
        self.working.locations.insert(location.id, location.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryTx { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}
