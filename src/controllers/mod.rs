//! Controllers
//!
//! Abren la transacción, llaman al servicio y la confirman si todo fue bien.
//! Un error deja la transacción sin confirmar y se descarta al soltarla.

pub mod location_controller;
pub mod request_controller;
pub mod task_controller;
pub mod timeline_controller;
pub mod vehicle_controller;
