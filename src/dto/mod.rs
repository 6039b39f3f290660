//! Data Transfer Objects
//!
//! Cuerpos de petición y respuesta de la API.

pub mod common_dto;
pub mod location_dto;
pub mod request_dto;
pub mod session_dto;
pub mod task_dto;
pub mod timeline_dto;
pub mod vehicle_dto;

pub use common_dto::*;
