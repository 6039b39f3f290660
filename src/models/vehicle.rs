//! Modelo de Vehicle
//!
//! Mapea exactamente a la tabla vehicles. La capacidad en tablas limita
//! cada tarea asignada al vehículo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Vehicle {
    pub id: Uuid,
    pub plate: String,
    pub board_capacity: i32,
    pub driver_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn can_carry(&self, boards: i32) -> bool {
        boards <= self.board_capacity
    }
}
