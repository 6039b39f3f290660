use chrono::NaiveDate;
use serde::Serialize;

use crate::config::TimelineConfig;
use crate::dto::task_dto::EnrichedTask;
use crate::timeline::EventItem;

// Timeline de un día: límites, eventos y las tareas que los originan
#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub date: NaiveDate,
    pub bounds: TimelineConfig,
    pub events: Vec<EventItem>,
    pub tasks: Vec<EnrichedTask>,
}
