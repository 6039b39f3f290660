//! Proyección de tareas planificadas a eventos del timeline
//!
//! Las tareas con carril guardado lo conservan (recortado al número de
//! carriles). Las que no lo tienen ocupan el primer carril libre a su hora;
//! si todos están ocupados van al que quede libre antes.

use chrono::NaiveDate;

use crate::models::Task;
use crate::timeline::store::EventItem;

pub fn events_from_tasks(tasks: &[Task], date: NaiveDate, lanes: u32) -> Vec<EventItem> {
    let last_lane = lanes.max(1) - 1;

    let mut scheduled: Vec<(&Task, i32, i32, Option<i32>)> = tasks
        .iter()
        .filter_map(|task| {
            let schedule = task.schedule()?;
            (schedule.date == date).then_some((
                task,
                schedule.start_minute,
                schedule.end_minute,
                schedule.lane,
            ))
        })
        .collect();
    scheduled.sort_by_key(|(task, start, _, _)| (*start, task.created_at, task.id));

    let mut events: Vec<EventItem> = Vec::with_capacity(scheduled.len());

    for (task, start, end, lane) in scheduled.iter().filter(|s| s.3.is_some()) {
        let lane = lane.map(|l| (l.max(0) as u32).min(last_lane)).unwrap_or(0);
        events.push(event(task, *start, *end, lane));
    }

    for (task, start, end, _) in scheduled.iter().filter(|s| s.3.is_none()) {
        let lane = free_lane(&events, *start, *end, last_lane);
        events.push(event(task, *start, *end, lane));
    }

    events.sort_by_key(|e| (e.start, e.lane, e.id));
    events
}

fn event(task: &Task, start: i32, end: i32, lane: u32) -> EventItem {
    EventItem {
        id: task.id,
        request_id: task.request_id,
        task_id: Some(task.id),
        start,
        end,
        lane,
    }
}

fn free_lane(events: &[EventItem], start: i32, end: i32, last_lane: u32) -> u32 {
    let busy_until = |lane: u32| {
        events
            .iter()
            .filter(|e| e.lane == lane && e.start < end && start < e.end)
            .map(|e| e.end)
            .max()
    };

    let mut earliest: Option<(i32, u32)> = None;
    for lane in 0..=last_lane {
        match busy_until(lane) {
            None => return lane,
            Some(until) => {
                if earliest.map_or(true, |(best, _)| until < best) {
                    earliest = Some((until, lane));
                }
            }
        }
    }
    earliest.map(|(_, lane)| lane).unwrap_or(0)
}
