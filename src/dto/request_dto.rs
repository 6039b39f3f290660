use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Request, RequestStatus, TaskSchedule};
use crate::utils::errors::{invalid_input, AppResult};
use crate::utils::validation::validate_not_empty;

// Request para crear una solicitud
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRequestRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_empty")]
    pub title: String,
    #[validate(range(min = 1))]
    pub boards: i32,
    #[validate(range(min = 1))]
    pub estimated_task_duration_minutes: Option<i32>,
    /// Si no se indica, el usuario de la sesión
    pub sourcer_id: Option<Uuid>,
    pub start_location_id: Uuid,
    pub end_location_id: Uuid,
    pub notes: Option<String>,
}

// Request para actualizar una solicitud sin tareas
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateRequestRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub boards: Option<i32>,
    pub estimated_task_duration_minutes: Option<i32>,
    pub sourcer_id: Option<Uuid>,
    pub start_location_id: Option<Uuid>,
    pub end_location_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RequestListQuery {
    pub status: Option<RequestStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PendingRequestsQuery {
    pub limit: Option<i64>,
}

// Solicitud junto con sus contadores
#[derive(Debug, Serialize, Deserialize)]
pub struct RequestSummary {
    pub request: Request,
    pub sum_assigned_boards: i32,
    pub completed_boards: i32,
}

impl From<Request> for RequestSummary {
    fn from(request: Request) -> Self {
        Self {
            sum_assigned_boards: request.assigned_boards,
            completed_boards: request.completed_boards,
            request,
        }
    }
}

// Un elemento de una asignación a vehículos
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssignmentItem {
    pub vehicle_id: Uuid,
    pub boards: i32,
    #[validate(range(min = 1))]
    pub estimated_duration_minutes: Option<i32>,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_start_minute: Option<i32>,
    pub scheduled_end_minute: Option<i32>,
    pub scheduled_lane: Option<i32>,
}

impl AssignmentItem {
    pub fn new(vehicle_id: Uuid, boards: i32) -> Self {
        Self {
            vehicle_id,
            boards,
            estimated_duration_minutes: None,
            scheduled_date: None,
            scheduled_start_minute: None,
            scheduled_end_minute: None,
            scheduled_lane: None,
        }
    }

    /// Fecha, inicio y fin van juntos: o están los tres o ninguno
    pub fn schedule(&self) -> AppResult<Option<TaskSchedule>> {
        match (
            self.scheduled_date,
            self.scheduled_start_minute,
            self.scheduled_end_minute,
        ) {
            (Some(date), Some(start_minute), Some(end_minute)) => Ok(Some(TaskSchedule {
                date,
                start_minute,
                end_minute,
                lane: self.scheduled_lane,
            })),
            (None, None, None) => Ok(None),
            _ => Err(invalid_input(
                "scheduled_date, scheduled_start_minute and scheduled_end_minute must be set together",
            )),
        }
    }
}

// Request para asignar vehículos a una solicitud
#[derive(Debug, Deserialize)]
pub struct AssignVehiclesRequest {
    pub assignments: Vec<AssignmentItem>,
}
