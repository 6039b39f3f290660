//! Store sobre PostgreSQL
//!
//! Cada `PgTx` envuelve una `sqlx::Transaction`; si no se llama a `commit`
//! la transacción hace rollback al soltarse.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::{Location, Request, RequestAggregates, RequestStatus, Task, Vehicle};
use crate::repositories::{
    location_repository::LocationRepository, request_repository::RequestRepository,
    task_repository::TaskRepository, vehicle_repository::VehicleRepository, PageRequest, Store,
    StoreTx,
};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTx>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTx { tx }))
    }
}

pub struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PgTx {
    async fn get_request(&mut self, id: Uuid) -> AppResult<Option<Request>> {
        RequestRepository::find_by_id(&mut self.tx, id).await
    }

    async fn lock_request(&mut self, id: Uuid) -> AppResult<Option<Request>> {
        RequestRepository::find_by_id_for_update(&mut self.tx, id).await
    }

    async fn list_requests(&mut self) -> AppResult<Vec<Request>> {
        RequestRepository::find_all(&mut self.tx).await
    }

    async fn list_requests_by_status(
        &mut self,
        status: RequestStatus,
        page: PageRequest,
    ) -> AppResult<Vec<Request>> {
        RequestRepository::find_by_status(&mut self.tx, status, page).await
    }

    async fn insert_request(&mut self, request: &Request) -> AppResult<()> {
        RequestRepository::insert(&mut self.tx, request).await
    }

    async fn update_request(&mut self, request: &Request) -> AppResult<()> {
        RequestRepository::update(&mut self.tx, request).await
    }

    async fn delete_request(&mut self, id: Uuid) -> AppResult<()> {
        RequestRepository::delete(&mut self.tx, id).await
    }

    async fn patch_request_aggregates(
        &mut self,
        id: Uuid,
        aggregates: &RequestAggregates,
        updated_at: DateTime<Utc>,
    ) -> AppResult<()> {
        RequestRepository::patch_aggregates(&mut self.tx, id, aggregates, updated_at).await
    }

    async fn get_task(&mut self, id: Uuid) -> AppResult<Option<Task>> {
        TaskRepository::find_by_id(&mut self.tx, id).await
    }

    async fn list_tasks(&mut self, page: Option<PageRequest>) -> AppResult<Vec<Task>> {
        TaskRepository::find_all(&mut self.tx, page).await
    }

    async fn tasks_by_request(&mut self, request_id: Uuid) -> AppResult<Vec<Task>> {
        TaskRepository::find_by_request(&mut self.tx, request_id).await
    }

    async fn tasks_by_date(&mut self, date: NaiveDate) -> AppResult<Vec<Task>> {
        TaskRepository::find_by_date(&mut self.tx, date).await
    }

    async fn tasks_by_vehicle(
        &mut self,
        vehicle_id: Uuid,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<Task>> {
        TaskRepository::find_by_vehicle(&mut self.tx, vehicle_id, date).await
    }

    async fn insert_task(&mut self, task: &Task) -> AppResult<()> {
        TaskRepository::insert(&mut self.tx, task).await
    }

    async fn update_task(&mut self, task: &Task) -> AppResult<()> {
        TaskRepository::update(&mut self.tx, task).await
    }

    async fn delete_task(&mut self, id: Uuid) -> AppResult<()> {
        TaskRepository::delete(&mut self.tx, id).await
    }

    async fn get_vehicle(&mut self, id: Uuid) -> AppResult<Option<Vehicle>> {
        VehicleRepository::find_by_id(&mut self.tx, id).await
    }

    async fn find_vehicle_by_plate(&mut self, plate: &str) -> AppResult<Option<Vehicle>> {
        VehicleRepository::find_by_plate(&mut self.tx, plate).await
    }

    async fn vehicles_by_driver(&mut self, driver_id: Uuid) -> AppResult<Vec<Vehicle>> {
        VehicleRepository::find_by_driver(&mut self.tx, driver_id).await
    }

    async fn list_vehicles(&mut self) -> AppResult<Vec<Vehicle>> {
        VehicleRepository::find_all(&mut self.tx).await
    }

    async fn insert_vehicle(&mut self, vehicle: &Vehicle) -> AppResult<()> {
        VehicleRepository::insert(&mut self.tx, vehicle).await
    }

    async fn get_location(&mut self, id: Uuid) -> AppResult<Option<Location>> {
        LocationRepository::find_by_id(&mut self.tx, id).await
    }

    async fn list_locations(&mut self) -> AppResult<Vec<Location>> {
        LocationRepository::find_all(&mut self.tx).await
    }

    async fn insert_location(&mut self, location: &Location) -> AppResult<()> {
        LocationRepository::insert(&mut self.tx, location).await
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
