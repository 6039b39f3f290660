//! Modelo de Task
//!
//! Una tarea cubre parte de las tablas de una solicitud con un vehículo
//! concreto y, opcionalmente, una franja en el timeline de un día.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado de la tarea - mapea al ENUM task_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Assigned,
    Completed,
}

/// Task principal - mapea a la tabla tasks
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub request_id: Uuid,
    pub boards: i32,
    pub assigned_vehicle_id: Option<Uuid>,
    pub estimated_duration_minutes: Option<i32>,
    pub status: TaskStatus,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_start_minute: Option<i32>,
    pub scheduled_end_minute: Option<i32>,
    pub scheduled_lane: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Franja planificada de una tarea
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskSchedule {
    pub date: NaiveDate,
    pub start_minute: i32,
    pub end_minute: i32,
    pub lane: Option<i32>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// La planificación solo cuenta si fecha, inicio y fin están presentes
    pub fn schedule(&self) -> Option<TaskSchedule> {
        match (
            self.scheduled_date,
            self.scheduled_start_minute,
            self.scheduled_end_minute,
        ) {
            (Some(date), Some(start_minute), Some(end_minute)) => Some(TaskSchedule {
                date,
                start_minute,
                end_minute,
                lane: self.scheduled_lane,
            }),
            _ => None,
        }
    }

    pub fn set_schedule(&mut self, schedule: Option<TaskSchedule>) {
        self.scheduled_date = schedule.map(|s| s.date);
        self.scheduled_start_minute = schedule.map(|s| s.start_minute);
        self.scheduled_end_minute = schedule.map(|s| s.end_minute);
        self.scheduled_lane = schedule.and_then(|s| s.lane);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            request_id: Uuid::new_v4(),
            boards: 4,
            assigned_vehicle_id: None,
            estimated_duration_minutes: None,
            status: TaskStatus::Pending,
            scheduled_date: None,
            scheduled_start_minute: None,
            scheduled_end_minute: None,
            scheduled_lane: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_partial_schedule_is_not_a_schedule() {
        let mut t = task();
        t.scheduled_date = NaiveDate::from_ymd_opt(2024, 5, 2);
        t.scheduled_start_minute = Some(480);
        assert!(t.schedule().is_none());
    }

    #[test]
    fn test_set_and_clear_schedule() {
        let mut t = task();
        let schedule = TaskSchedule {
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            start_minute: 480,
            end_minute: 600,
            lane: Some(2),
        };
        t.set_schedule(Some(schedule));
        assert_eq!(t.schedule(), Some(schedule));

        t.set_schedule(None);
        assert_eq!(t.schedule(), None);
        assert_eq!(t.scheduled_lane, None);
    }
}
