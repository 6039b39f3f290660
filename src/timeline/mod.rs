//! Timeline de planificación
//!
//! Código síncrono y sin E/S que comparten el servidor (proyección de
//! eventos) y cualquier cliente que pinte el timeline: escala, estado,
//! arrastre.

pub mod coords;
pub mod drag;
pub mod projection;
pub mod store;

pub use coords::{format_minute, TimelineScale};
pub use drag::{DragController, OverlayView, Rect};
pub use projection::events_from_tasks;
pub use store::{
    reduce, DragSource, EventItem, PreviewState, TimeRange, TimelineAction, TimelineState,
    TimelineStore,
};
