//! Board scheduler
//!
//! Backend para gestionar solicitudes de transporte de tablas, repartirlas
//! entre vehículos como tareas y planificarlas en un timeline diario.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod timeline;
pub mod utils;

pub use routes::create_router;
pub use state::AppState;
