//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Las tablas de una asignación superan la capacidad del vehículo
    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),

    /// Las tablas asignadas superarían el total de la solicitud
    #[error("Boards exceeded: {0}")]
    BoardsExceeded(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Operación no permitida en el estado actual del recurso
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str, message: String, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message,
            details: None,
            code: Some(code.to_string()),
        }
    }
}

impl AppError {
    /// Código estable que el cliente puede usar para distinguir errores
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DB_ERROR",
            AppError::Migration(_) => "MIGRATION_ERROR",
            AppError::Validation(_) | AppError::InvalidInput(_) => "VALIDATION_ERROR",
            AppError::CapacityExceeded(_) => "CAPACITY_EXCEEDED",
            AppError::BoardsExceeded(_) => "BOARDS_EXCEEDED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Jwt(_) => "JWT_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Migration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Validation(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::CapacityExceeded(_) | AppError::BoardsExceeded(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidState(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        let body = match self {
            AppError::Database(e) => {
                error!("❌ Database error: {}", e);
                ErrorResponse {
                    details: Some(json!({ "sql_error": e.to_string() })),
                    ..ErrorResponse::new(
                        "Database Error",
                        "An error occurred while accessing the database".to_string(),
                        code,
                    )
                }
            }

            AppError::Migration(e) => {
                error!("❌ Migration error: {}", e);
                ErrorResponse::new(
                    "Migration Error",
                    "The database schema could not be migrated".to_string(),
                    code,
                )
            }

            AppError::Validation(e) => {
                warn!("Validation error: {}", e);
                ErrorResponse {
                    details: Some(json!(e)),
                    ..ErrorResponse::new(
                        "Validation Error",
                        "The provided data is invalid".to_string(),
                        code,
                    )
                }
            }

            AppError::InvalidInput(msg) => {
                warn!("Invalid input: {}", msg);
                ErrorResponse::new("Validation Error", msg, code)
            }

            AppError::CapacityExceeded(msg) => {
                warn!("Capacity exceeded: {}", msg);
                ErrorResponse::new("Capacity Exceeded", msg, code)
            }

            AppError::BoardsExceeded(msg) => {
                warn!("Boards exceeded: {}", msg);
                ErrorResponse::new("Boards Exceeded", msg, code)
            }

            AppError::NotFound(msg) => {
                warn!("Resource not found: {}", msg);
                ErrorResponse::new("Not Found", msg, code)
            }

            AppError::InvalidState(msg) => {
                warn!("Invalid state: {}", msg);
                ErrorResponse::new("Invalid State", msg, code)
            }

            AppError::Unauthorized(msg) => {
                warn!("Unauthorized access: {}", msg);
                ErrorResponse::new("Unauthorized", msg, code)
            }

            AppError::Forbidden(msg) => {
                warn!("Forbidden access: {}", msg);
                ErrorResponse::new("Forbidden", msg, code)
            }

            AppError::Jwt(msg) => {
                warn!("JWT error: {}", msg);
                ErrorResponse::new("JWT Error", msg, code)
            }

            AppError::Internal(msg) => {
                error!("❌ Internal error: {}", msg);
                ErrorResponse {
                    details: Some(json!({ "internal_error": msg })),
                    ..ErrorResponse::new(
                        "Internal Server Error",
                        "An unexpected error occurred".to_string(),
                        code,
                    )
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str) -> AppError {
    AppError::NotFound(format!("{} not found", resource))
}

/// Función helper para crear errores de validación sencillos
pub fn invalid_input(message: &str) -> AppError {
    AppError::InvalidInput(message.to_string())
}
