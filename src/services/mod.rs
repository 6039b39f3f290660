//! Services module
//!
//! Lógica de negocio del tablero. Cada servicio recibe la transacción
//! abierta por el controller; ninguno confirma ni abre transacciones.

pub mod aggregation_service;
pub mod assignment_service;
pub mod location_service;
pub mod request_service;
pub mod session_service;
pub mod task_service;
pub mod timeline_service;
pub mod vehicle_service;

pub use session_service::{JwtSessionProvider, SessionProvider};
