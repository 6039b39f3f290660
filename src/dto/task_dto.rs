use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Request, Task, TaskSchedule};

// Request para crear una tarea suelta
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    pub boards: i32,
    pub request_id: Uuid,
    pub assigned_vehicle_id: Option<Uuid>,
    #[validate(range(min = 1))]
    pub estimated_duration_minutes: Option<i32>,
}

// Request para asignar una tarea a un vehículo
#[derive(Debug, Deserialize)]
pub struct AssignTaskRequest {
    pub vehicle_id: Uuid,
}

// Request para planificar una tarea en el timeline
#[derive(Debug, Deserialize, Validate)]
pub struct ScheduleTaskRequest {
    pub vehicle_id: Uuid,
    pub date: NaiveDate,
    pub start_minute: i32,
    pub end_minute: i32,
    #[validate(range(min = 0))]
    pub lane: Option<i32>,
}

impl ScheduleTaskRequest {
    pub fn schedule(&self) -> TaskSchedule {
        TaskSchedule {
            date: self.date,
            start_minute: self.start_minute,
            end_minute: self.end_minute,
            lane: self.lane,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DriverTasksQuery {
    pub date: Option<NaiveDate>,
}

// Cabecera de la solicitud que acompaña a cada tarea en los listados enriquecidos
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestHeader {
    pub id: Uuid,
    pub title: String,
    pub start_location_id: Uuid,
    pub end_location_id: Uuid,
    pub estimated_task_duration_minutes: i32,
}

impl From<&Request> for RequestHeader {
    fn from(request: &Request) -> Self {
        Self {
            id: request.id,
            title: request.title.clone(),
            start_location_id: request.start_location_id,
            end_location_id: request.end_location_id,
            estimated_task_duration_minutes: request.estimated_task_duration_minutes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedTask {
    pub task: Task,
    pub request: RequestHeader,
}
