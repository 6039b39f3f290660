//! Capa de persistencia
//!
//! `Store` abre transacciones; `StoreTx` es todo lo que los servicios
//! necesitan leer y escribir dentro de una. Cada mutación del dominio corre
//! en una única transacción: o se confirma entera con `commit`, o se
//! descarta al soltar la transacción.
//!
//! Implementaciones:
//! - [`pg_store::PgStore`]: PostgreSQL vía los repositorios por entidad
//! - [`memory_store::MemoryStore`]: en memoria, para tests y ejecución local

pub mod location_repository;
pub mod memory_store;
pub mod pg_store;
pub mod request_repository;
pub mod task_repository;
pub mod vehicle_repository;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{Location, Request, RequestAggregates, RequestStatus, Task, Vehicle};
use crate::utils::errors::AppResult;

pub use memory_store::MemoryStore;
pub use pg_store::PgStore;

/// Paginación simple por offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: i64,
    pub offset: i64,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> AppResult<Box<dyn StoreTx>>;
}

#[async_trait]
pub trait StoreTx: Send {
    // Requests
    async fn get_request(&mut self, id: Uuid) -> AppResult<Option<Request>>;
    /// Igual que `get_request` pero bloquea la fila hasta el fin de la transacción
    async fn lock_request(&mut self, id: Uuid) -> AppResult<Option<Request>>;
    async fn list_requests(&mut self) -> AppResult<Vec<Request>>;
    /// Ordenadas por `updated_at` descendente
    async fn list_requests_by_status(
        &mut self,
        status: RequestStatus,
        page: PageRequest,
    ) -> AppResult<Vec<Request>>;
    async fn insert_request(&mut self, request: &Request) -> AppResult<()>;
    async fn update_request(&mut self, request: &Request) -> AppResult<()>;
    async fn delete_request(&mut self, id: Uuid) -> AppResult<()>;
    async fn patch_request_aggregates(
        &mut self,
        id: Uuid,
        aggregates: &RequestAggregates,
        updated_at: DateTime<Utc>,
    ) -> AppResult<()>;

    // Tasks
    async fn get_task(&mut self, id: Uuid) -> AppResult<Option<Task>>;
    async fn list_tasks(&mut self, page: Option<PageRequest>) -> AppResult<Vec<Task>>;
    async fn tasks_by_request(&mut self, request_id: Uuid) -> AppResult<Vec<Task>>;
    async fn tasks_by_date(&mut self, date: NaiveDate) -> AppResult<Vec<Task>>;
    async fn tasks_by_vehicle(
        &mut self,
        vehicle_id: Uuid,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<Task>>;
    async fn insert_task(&mut self, task: &Task) -> AppResult<()>;
    async fn update_task(&mut self, task: &Task) -> AppResult<()>;
    async fn delete_task(&mut self, id: Uuid) -> AppResult<()>;

    // Vehicles
    async fn get_vehicle(&mut self, id: Uuid) -> AppResult<Option<Vehicle>>;
    async fn find_vehicle_by_plate(&mut self, plate: &str) -> AppResult<Option<Vehicle>>;
    async fn vehicles_by_driver(&mut self, driver_id: Uuid) -> AppResult<Vec<Vehicle>>;
    async fn list_vehicles(&mut self) -> AppResult<Vec<Vehicle>>;
    async fn insert_vehicle(&mut self, vehicle: &Vehicle) -> AppResult<()>;

    // Locations
    async fn get_location(&mut self, id: Uuid) -> AppResult<Option<Location>>;
    async fn list_locations(&mut self) -> AppResult<Vec<Location>>;
    async fn insert_location(&mut self, location: &Location) -> AppResult<()>;

    async fn commit(self: Box<Self>) -> AppResult<()>;
}
