//! Configuración del proyecto
//!
//! Este módulo contiene la configuración de base de datos, variables de entorno
//! y los límites del timeline.

pub mod database;
pub mod environment;
pub mod timeline;

pub use database::DatabaseConfig;
pub use environment::{EnvironmentConfig, StoreBackend};
pub use timeline::TimelineConfig;
