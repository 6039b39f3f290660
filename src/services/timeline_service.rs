use chrono::NaiveDate;

use crate::config::TimelineConfig;
use crate::dto::timeline_dto::TimelineResponse;
use crate::repositories::StoreTx;
use crate::services::task_service;
use crate::timeline::events_from_tasks;
use crate::utils::errors::AppResult;

/// Eventos del día proyectados desde las tareas planificadas
pub async fn timeline_for_date(
    tx: &mut dyn StoreTx,
    date: NaiveDate,
    config: &TimelineConfig,
) -> AppResult<TimelineResponse> {
    let tasks = tx.tasks_by_date(date).await?;
    let events = events_from_tasks(&tasks, date, config.lanes);
    let tasks = task_service::enrich(tx, tasks).await?;

    Ok(TimelineResponse {
        date,
        bounds: *config,
        events,
        tasks,
    })
}
