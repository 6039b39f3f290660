//! Configuración de base de datos
//!
//! Solo se lee cuando `STORE_BACKEND=postgres`.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::config::environment::parse_env;
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl DatabaseConfig {
    pub fn from_env() -> AppResult<Self> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| AppError::Internal("DATABASE_URL must be set".to_string()))?;

        let max_connections: u32 = parse_env("DATABASE_MAX_CONNECTIONS", 20)?;
        let min_connections: u32 = parse_env("DATABASE_MIN_CONNECTIONS", 2)?;
        if min_connections > max_connections {
            return Err(AppError::Internal(
                "DATABASE_MIN_CONNECTIONS cannot exceed DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout: Duration::from_secs(parse_env("DATABASE_ACQUIRE_TIMEOUT_SECS", 30)?),
            idle_timeout: Duration::from_secs(parse_env("DATABASE_IDLE_TIMEOUT_SECS", 300)?),
        })
    }

    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .connect(&self.url)
            .await
    }
}
