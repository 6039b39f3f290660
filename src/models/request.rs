//! Modelo de Request
//!
//! Una solicitud de transporte de tablas. Los campos `assigned_boards`,
//! `completed_boards` y `status` son derivados de sus tareas y solo los
//! escribe el servicio de agregación.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Duración estimada por defecto de cada tarea de una solicitud
pub const DEFAULT_TASK_DURATION_MINUTES: i32 = 120;

/// Estado de la solicitud - mapea al ENUM request_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Incoming,
    PartiallyAssigned,
    Finished,
}

/// Request principal - mapea a la tabla requests
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Request {
    pub id: Uuid,
    pub title: String,
    pub boards: i32,
    pub estimated_task_duration_minutes: i32,
    pub sourcer_id: Uuid,
    pub start_location_id: Uuid,
    pub end_location_id: Uuid,
    pub notes: Option<String>,
    pub assigned_boards: i32,
    pub completed_boards: i32,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Contadores derivados de una solicitud
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct RequestAggregates {
    pub assigned_boards: i32,
    pub completed_boards: i32,
    pub status: RequestStatus,
}

impl Request {
    pub fn aggregates(&self) -> RequestAggregates {
        RequestAggregates {
            assigned_boards: self.assigned_boards,
            completed_boards: self.completed_boards,
            status: self.status,
        }
    }

    /// Tablas todavía sin tarea
    pub fn remaining_boards(&self) -> i32 {
        (self.boards - self.assigned_boards).max(0)
    }
}
