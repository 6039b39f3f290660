//! Estado del timeline
//!
//! `TimelineState` es un valor: cada acción produce un estado nuevo a través
//! de [`reduce`], que no toca nada fuera de sus argumentos. `TimelineStore`
//! es el dueño explícito del estado actual y cuenta las escrituras, que es
//! lo que la UI usaría para decidir si repintar.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

use crate::config::TimelineConfig;
use crate::models::{Request, Task};
use crate::timeline::coords::clamp;

/// Duración cuando ni la tarea ni la solicitud la indican
pub const FALLBACK_DURATION_MINUTES: i32 = 60;
/// Longitud mínima de un evento al redimensionarlo
pub const MIN_EVENT_MINUTES: i32 = 15;

/// Origen de un arrastre: una solicitud y, si ya existe, una de sus tareas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DragSource {
    pub request_id: Uuid,
    pub task_id: Option<Uuid>,
}

impl DragSource {
    pub fn request(request_id: Uuid) -> Self {
        Self {
            request_id,
            task_id: None,
        }
    }

    pub fn task(request_id: Uuid, task_id: Uuid) -> Self {
        Self {
            request_id,
            task_id: Some(task_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventItem {
    pub id: Uuid,
    pub request_id: Uuid,
    pub task_id: Option<Uuid>,
    pub start: i32,
    pub end: i32,
    pub lane: u32,
}

impl EventItem {
    pub fn duration(&self) -> i32 {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &EventItem) -> bool {
        self.lane == other.lane && self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DraggingState {
    pub event_id: Uuid,
    pub start: i32,
    pub end: i32,
    pub lane: u32,
}

/// Hueco propuesto durante un arrastre; `minute` es el inicio ya ajustado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PreviewState {
    pub source: DragSource,
    pub minute: i32,
    pub lane: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: i32,
    pub end: i32,
}

#[derive(Debug, Clone)]
pub enum TimelineAction {
    /// Mueve el evento de la tarea o lo crea; sin tarea no hace nada
    UpsertEvent {
        source: DragSource,
        minute: i32,
        lane: Option<u32>,
    },
    /// Siempre crea un evento nuevo con el id dado
    InsertEvent {
        id: Uuid,
        request_id: Uuid,
        minute: i32,
        lane: Option<u32>,
    },
    MoveEvent {
        event_id: Uuid,
        minute: i32,
        lane: Option<u32>,
    },
    ResizeLeft {
        event_id: Uuid,
        start: i32,
    },
    ResizeRight {
        event_id: Uuid,
        end: i32,
    },
    DeleteEvent {
        event_id: Uuid,
    },
    ResetEvents,
    ReplaceEvents(Vec<EventItem>),
    SetPxPerMinute(f64),
    SetLanes(u32),
    SetTasks(Vec<Task>),
    SetRequests(Vec<Request>),
    UpdateDragging(DraggingState),
    EndDragging,
    SetPreview(Option<PreviewState>),
}

#[derive(Debug, Clone)]
pub struct TimelineState {
    pub bounds: TimeRange,
    pub events: BTreeMap<Uuid, EventItem>,
    pub task_to_event: HashMap<Uuid, Uuid>,
    pub px_per_minute: f64,
    pub lanes: u32,
    pub dragging: Option<DraggingState>,
    pub preview: Option<PreviewState>,
    pub tasks: Vec<Task>,
    pub requests: Vec<Request>,
}

impl TimelineState {
    pub fn new(config: &TimelineConfig) -> Self {
        Self {
            bounds: TimeRange {
                start: config.start_minute,
                end: config.end_minute,
            },
            events: BTreeMap::new(),
            task_to_event: HashMap::new(),
            px_per_minute: config.px_per_minute,
            lanes: config.lanes.max(1),
            dragging: None,
            preview: None,
            tasks: Vec::new(),
            requests: Vec::new(),
        }
    }

    pub fn resolve_task(&self, task_id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn resolve_request(&self, request_id: Uuid) -> Option<&Request> {
        self.requests.iter().find(|r| r.id == request_id)
    }

    pub fn resolve_request_label(&self, request_id: Uuid) -> String {
        self.resolve_request(request_id)
            .map(|r| r.title.clone())
            .unwrap_or_else(|| "Unknown request".to_string())
    }

    /// Duración de la tarea, si no la de su solicitud, si no la de reserva
    pub fn duration_for_source(&self, source: &DragSource) -> i32 {
        source
            .task_id
            .and_then(|id| self.resolve_task(id))
            .and_then(|t| t.estimated_duration_minutes)
            .or_else(|| {
                self.resolve_request(source.request_id)
                    .map(|r| r.estimated_task_duration_minutes)
            })
            .filter(|minutes| *minutes > 0)
            .unwrap_or(FALLBACK_DURATION_MINUTES)
    }

    pub fn event_for_task(&self, task_id: Uuid) -> Option<&EventItem> {
        self.task_to_event
            .get(&task_id)
            .and_then(|event_id| self.events.get(event_id))
    }

    /// Intersecciones del evento con los demás eventos de su carril
    pub fn detect_overlaps(&self, event_id: Uuid) -> Vec<TimeRange> {
        let Some(event) = self.events.get(&event_id) else {
            return Vec::new();
        };
        self.events
            .values()
            .filter(|other| other.id != event.id && event.overlaps(other))
            .map(|other| TimeRange {
                start: event.start.max(other.start),
                end: event.end.min(other.end),
            })
            .collect()
    }

    fn last_lane(&self) -> u32 {
        self.lanes.saturating_sub(1)
    }

    /// Inicio ajustado para que `[start, start + duration]` quepa en los límites
    fn fit_start(&self, minute: i32, duration: i32) -> i32 {
        clamp(minute, self.bounds.start, self.bounds.end - duration)
    }

    fn place(&mut self, mut event: EventItem) {
        let duration = event.duration();
        event.start = self.fit_start(event.start, duration);
        event.end = event.start + duration;
        event.lane = event.lane.min(self.last_lane());
        if let Some(task_id) = event.task_id {
            self.task_to_event.insert(task_id, event.id);
        }
        self.events.insert(event.id, event);
    }

    fn remove(&mut self, event_id: Uuid) {
        if let Some(event) = self.events.remove(&event_id) {
            if let Some(task_id) = event.task_id {
                self.task_to_event.remove(&task_id);
            }
        }
    }
}

/// Aplica una acción sobre una copia del estado
pub fn reduce(state: &TimelineState, action: TimelineAction) -> TimelineState {
    let mut next = state.clone();

    match action {
        TimelineAction::UpsertEvent {
            source,
            minute,
            lane,
        } => {
            if let Some(task_id) = source.task_id {
                let duration = next.duration_for_source(&source);
                let event = match next.event_for_task(task_id).cloned() {
                    Some(current) => EventItem {
                        start: minute,
                        end: minute + duration,
                        lane: lane.unwrap_or(current.lane),
                        ..current
                    },
                    None => EventItem {
                        id: task_id,
                        request_id: source.request_id,
                        task_id: Some(task_id),
                        start: minute,
                        end: minute + duration,
                        lane: lane.unwrap_or(0),
                    },
                };
                next.place(event);
            }
        }

        TimelineAction::InsertEvent {
            id,
            request_id,
            minute,
            lane,
        } => {
            let duration = next.duration_for_source(&DragSource::request(request_id));
            next.place(EventItem {
                id,
                request_id,
                task_id: None,
                start: minute,
                end: minute + duration,
                lane: lane.unwrap_or(0),
            });
        }

        TimelineAction::MoveEvent {
            event_id,
            minute,
            lane,
        } => {
            if let Some(current) = next.events.get(&event_id).cloned() {
                let duration = current.duration();
                next.place(EventItem {
                    start: minute,
                    end: minute + duration,
                    lane: lane.unwrap_or(current.lane),
                    ..current
                });
            }
        }

        TimelineAction::ResizeLeft { event_id, start } => {
            let lower = next.bounds.start;
            if let Some(event) = next.events.get_mut(&event_id) {
                event.start = clamp(start, lower, event.end - MIN_EVENT_MINUTES);
            }
        }

        TimelineAction::ResizeRight { event_id, end } => {
            let upper = next.bounds.end;
            if let Some(event) = next.events.get_mut(&event_id) {
                event.end = clamp(end, event.start + MIN_EVENT_MINUTES, upper);
            }
        }

        TimelineAction::DeleteEvent { event_id } => next.remove(event_id),

        TimelineAction::ResetEvents => {
            next.events.clear();
            next.task_to_event.clear();
        }

        TimelineAction::ReplaceEvents(items) => {
            next.events.clear();
            next.task_to_event.clear();
            for item in items {
                next.place(item);
            }
        }

        TimelineAction::SetPxPerMinute(value) => {
            if value.is_finite() && value > 0.0 {
                next.px_per_minute = value;
            }
        }

        TimelineAction::SetLanes(value) => {
            next.lanes = value.max(1);
            let last = next.last_lane();
            for event in next.events.values_mut() {
                event.lane = event.lane.min(last);
            }
        }

        TimelineAction::SetTasks(tasks) => next.tasks = tasks,
        TimelineAction::SetRequests(requests) => next.requests = requests,
        TimelineAction::UpdateDragging(dragging) => next.dragging = Some(dragging),
        TimelineAction::EndDragging => next.dragging = None,
        TimelineAction::SetPreview(preview) => next.preview = preview,
    }

    next
}

/// Dueño del estado actual del timeline
#[derive(Debug, Clone)]
pub struct TimelineStore {
    state: TimelineState,
    writes: usize,
}

impl TimelineStore {
    pub fn new(config: &TimelineConfig) -> Self {
        Self {
            state: TimelineState::new(config),
            writes: 0,
        }
    }

    pub fn state(&self) -> &TimelineState {
        &self.state
    }

    /// Escrituras aplicadas desde la creación
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn dispatch(&mut self, action: TimelineAction) {
        self.state = reduce(&self.state, action);
        self.writes += 1;
    }
}
