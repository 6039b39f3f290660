//! Modelos de datos
//!
//! Este módulo contiene todos los structs que mapean a las tablas
//! de la base de datos y los tipos de autorización.

pub mod auth;
pub mod location;
pub mod request;
pub mod task;
pub mod vehicle;

pub use location::Location;
pub use request::{Request, RequestAggregates, RequestStatus};
pub use task::{Task, TaskSchedule, TaskStatus};
pub use vehicle::Vehicle;
