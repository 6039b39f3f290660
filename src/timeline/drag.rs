//! Controlador de arrastre
//!
//! Traduce posiciones del puntero a un hueco (inicio, carril) del timeline
//! mientras dura un gesto y lo confirma al soltar. Mientras no se registre
//! el conversor píxel → minuto, `preview` y `commit` no hacen nada. Un
//! gesto fuera de la zona de drop limpia la previsualización pero no se
//! aborta.

use serde::Serialize;
use uuid::Uuid;

use crate::config::TimelineConfig;
use crate::timeline::coords::{clamp, format_minute, TimelineScale};
use crate::timeline::store::{DragSource, PreviewState, TimelineAction, TimelineStore};

/// Rectángulo en coordenadas de pantalla
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

/// Tarjeta flotante que sigue al puntero
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOverlay {
    pub source: DragSource,
    pub client_x: f64,
    pub client_y: f64,
    pub anchor_px: Option<f64>,
    pub anchor_py: Option<f64>,
}

/// Lo que hay que pintar para la tarjeta flotante
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayView {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub label: String,
    pub duration: i32,
    /// `HH:MM`, solo sobre el timeline
    pub start: Option<String>,
    pub end: Option<String>,
}

type PointToMinute = Box<dyn Fn(f64) -> f64 + Send + Sync>;

pub struct DragController {
    config: TimelineConfig,
    read_only: bool,
    dropzone: Option<Rect>,
    point_to_minute: Option<PointToMinute>,
    last_preview: Option<PreviewState>,
    overlay: Option<DragOverlay>,
}

impl DragController {
    pub fn new(config: TimelineConfig) -> Self {
        Self {
            config,
            read_only: false,
            dropzone: None,
            point_to_minute: None,
            last_preview: None,
            overlay: None,
        }
    }

    /// Controlador que ignora todos los gestos
    pub fn read_only(config: TimelineConfig) -> Self {
        Self {
            read_only: true,
            ..Self::new(config)
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn register_point_to_minute<F>(&mut self, f: F)
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.point_to_minute = Some(Box::new(f));
    }

    pub fn set_dropzone(&mut self, rect: Rect) {
        self.dropzone = Some(rect);
    }

    pub fn overlay(&self) -> Option<&DragOverlay> {
        self.overlay.as_ref()
    }

    pub fn point_to_minute(&self, client_x: f64) -> Option<f64> {
        self.point_to_minute.as_ref().map(|f| f(client_x))
    }

    pub fn is_point_over_dropzone(&self, x: f64, y: f64) -> bool {
        self.dropzone.is_some_and(|zone| zone.contains(x, y))
    }

    /// Una tarjeta cuenta como dentro por su borde izquierdo y su centro vertical
    pub fn is_over_dropzone(&self, chip: &Rect) -> bool {
        self.is_point_over_dropzone(chip.left, chip.top + chip.height / 2.0)
    }

    fn scale(&self, store: &TimelineStore) -> TimelineScale {
        TimelineScale::new(&self.config).with_px_per_minute(store.state().px_per_minute)
    }

    fn lane_at(&self, store: &TimelineStore, client_y: f64) -> u32 {
        let top = self.dropzone.map(|zone| zone.top).unwrap_or(0.0);
        self.scale(store)
            .lane_from_offset(client_y - top, store.state().lanes)
    }

    fn start_for(&self, center_minute: f64, anchor_minutes: f64, duration: i32) -> i32 {
        clamp(
            (center_minute - anchor_minutes).round() as i32,
            self.config.start_minute,
            self.config.end_minute - duration,
        )
    }

    /// Hueco bajo el puntero; `None` sin conversor o fuera de la zona
    fn slot(&self, store: &TimelineStore, source: &DragSource, x: f64, y: f64) -> Option<(i32, u32)> {
        let minute = self.point_to_minute(x)?;
        if !self.is_point_over_dropzone(x, y) {
            return None;
        }
        let duration = store.state().duration_for_source(source);
        let start = self.start_for(minute, duration as f64 / 2.0, duration);
        Some((start, self.lane_at(store, y)))
    }

    pub fn preview(&mut self, store: &mut TimelineStore, source: DragSource, x: f64, y: f64) {
        if self.read_only || self.point_to_minute.is_none() {
            return;
        }

        let Some((minute, lane)) = self.slot(store, &source, x, y) else {
            self.clear_preview(store);
            return;
        };

        let (anchor_px, anchor_py) = match self.overlay {
            Some(current) if current.source == source => (current.anchor_px, current.anchor_py),
            _ => (None, None),
        };
        self.overlay = Some(DragOverlay {
            source,
            client_x: x,
            client_y: y,
            anchor_px,
            anchor_py,
        });

        let next = PreviewState {
            source,
            minute,
            lane,
        };
        if self.last_preview == Some(next) {
            return;
        }
        self.last_preview = Some(next);
        store.dispatch(TimelineAction::SetPreview(Some(next)));
    }

    /// Confirma el gesto y devuelve el id del evento escrito
    ///
    /// Una tarea mueve su único evento; una solicitud sin tarea siempre crea
    /// uno nuevo.
    pub fn commit(
        &mut self,
        store: &mut TimelineStore,
        source: DragSource,
        x: f64,
        y: f64,
    ) -> Option<Uuid> {
        if self.read_only || self.point_to_minute.is_none() {
            return None;
        }

        let slot = self.slot(store, &source, x, y);
        let event_id = slot.map(|(minute, lane)| match source.task_id {
            Some(task_id) => {
                store.dispatch(TimelineAction::UpsertEvent {
                    source,
                    minute,
                    lane: Some(lane),
                });
                store
                    .state()
                    .event_for_task(task_id)
                    .map(|e| e.id)
                    .unwrap_or(task_id)
            }
            None => {
                let id = Uuid::new_v4();
                store.dispatch(TimelineAction::InsertEvent {
                    id,
                    request_id: source.request_id,
                    minute,
                    lane: Some(lane),
                });
                id
            }
        });

        self.clear(store);
        event_id
    }

    pub fn clear_preview(&mut self, store: &mut TimelineStore) {
        self.last_preview = None;
        if store.state().preview.is_some() {
            store.dispatch(TimelineAction::SetPreview(None));
        }
    }

    /// Descarta la previsualización y oculta la tarjeta
    pub fn clear(&mut self, store: &mut TimelineStore) {
        self.clear_preview(store);
        self.overlay = None;
    }

    pub fn update_overlay(
        &mut self,
        source: DragSource,
        client_x: f64,
        client_y: f64,
        anchor_px: Option<f64>,
        anchor_py: Option<f64>,
    ) {
        if self.read_only {
            return;
        }
        self.overlay = Some(DragOverlay {
            source,
            client_x,
            client_y,
            anchor_px,
            anchor_py,
        });
    }

    pub fn clear_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn overlay_view(&self, store: &TimelineStore) -> Option<OverlayView> {
        let overlay = self.overlay?;
        let state = store.state();
        let duration = state.duration_for_source(&overlay.source);
        let px_per_minute = state.px_per_minute;
        let width = duration as f64 * px_per_minute;
        let translate_x = overlay.anchor_px.unwrap_or(width / 2.0);
        let translate_y = overlay.anchor_py.unwrap_or(self.config.lane_height / 2.0);

        let over_timeline = self.is_point_over_dropzone(overlay.client_x, overlay.client_y);
        let start = self
            .point_to_minute(overlay.client_x)
            .filter(|_| over_timeline)
            .map(|center| self.start_for(center, translate_x / px_per_minute, duration));

        Some(OverlayView {
            left: overlay.client_x,
            top: overlay.client_y,
            width,
            translate_x,
            translate_y,
            label: state.resolve_request_label(overlay.source.request_id),
            duration,
            start: start.map(format_minute),
            end: start.map(|s| format_minute(s + duration)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Request, RequestStatus};
    use chrono::Utc;

    const ZONE_LEFT: f64 = 100.0;
    const ZONE_TOP: f64 = 50.0;

    fn request(duration: i32) -> Request {
        let now = Utc::now();
        Request {
            id: Uuid::new_v4(),
            title: "Werk Süd".to_string(),
            boards: 10,
            estimated_task_duration_minutes: duration,
            sourcer_id: Uuid::new_v4(),
            start_location_id: Uuid::new_v4(),
            end_location_id: Uuid::new_v4(),
            notes: None,
            assigned_boards: 0,
            completed_boards: 0,
            status: RequestStatus::Incoming,
            created_at: now,
            updated_at: now,
        }
    }

    /// Zona de drop de 6 carriles con el conversor de la escala por defecto
    fn setup(request: &Request) -> (DragController, TimelineStore) {
        let config = TimelineConfig::default();
        let scale = TimelineScale::new(&config);
        let mut store = TimelineStore::new(&config);
        store.dispatch(TimelineAction::SetRequests(vec![request.clone()]));

        let mut controller = DragController::new(config);
        controller.set_dropzone(Rect::new(ZONE_LEFT, ZONE_TOP, scale.total_width(), 6.0 * 64.0));
        controller.register_point_to_minute(move |x| scale.px_to_minute(x - ZONE_LEFT));
        (controller, store)
    }

    /// x de pantalla para un minuto del día
    fn x_for(minute: f64) -> f64 {
        ZONE_LEFT + (minute - 360.0) * 2.0
    }

    #[test]
    fn test_preview_without_converter_is_noop() {
        let r = request(60);
        let mut store = TimelineStore::new(&TimelineConfig::default());
        let mut controller = DragController::new(TimelineConfig::default());
        controller.set_dropzone(Rect::new(0.0, 0.0, 1000.0, 400.0));

        controller.preview(&mut store, DragSource::request(r.id), 10.0, 10.0);
        assert_eq!(controller.commit(&mut store, DragSource::request(r.id), 10.0, 10.0), None);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_identical_previews_write_once() {
        let r = request(60);
        let (mut controller, mut store) = setup(&r);
        let before = store.writes();
        let source = DragSource::request(r.id);

        controller.preview(&mut store, source, x_for(600.0), ZONE_TOP + 70.0);
        controller.preview(&mut store, source, x_for(600.0), ZONE_TOP + 80.0);
        assert_eq!(store.writes(), before + 1);

        let preview = store.state().preview.unwrap();
        assert_eq!(preview.minute, 570);
        assert_eq!(preview.lane, 1);

        controller.preview(&mut store, source, x_for(615.0), ZONE_TOP + 80.0);
        assert_eq!(store.writes(), before + 2);
    }

    #[test]
    fn test_preview_start_clamped_to_bounds() {
        let r = request(120);
        let (mut controller, mut store) = setup(&r);
        let source = DragSource::request(r.id);

        controller.preview(&mut store, source, x_for(1310.0), ZONE_TOP + 5.0);
        assert_eq!(store.state().preview.unwrap().minute, 1200);

        controller.preview(&mut store, source, x_for(365.0), ZONE_TOP + 5.0);
        assert_eq!(store.state().preview.unwrap().minute, 360);
    }

    #[test]
    fn test_leaving_dropzone_clears_preview() {
        let r = request(60);
        let (mut controller, mut store) = setup(&r);
        let source = DragSource::request(r.id);

        controller.preview(&mut store, source, x_for(600.0), ZONE_TOP + 10.0);
        assert!(store.state().preview.is_some());

        controller.preview(&mut store, source, x_for(600.0), ZONE_TOP - 10.0);
        assert!(store.state().preview.is_none());
        assert!(controller.commit(&mut store, source, x_for(600.0), ZONE_TOP - 10.0).is_none());
        assert!(store.state().events.is_empty());
    }

    #[test]
    fn test_request_commit_is_multi_instance() {
        let r = request(60);
        let (mut controller, mut store) = setup(&r);
        let source = DragSource::request(r.id);

        let first = controller.commit(&mut store, source, x_for(600.0), ZONE_TOP + 10.0);
        let second = controller.commit(&mut store, source, x_for(700.0), ZONE_TOP + 10.0);
        assert!(first.is_some() && second.is_some());
        assert_ne!(first, second);
        assert_eq!(store.state().events.len(), 2);
        assert!(store.state().preview.is_none());
        assert!(controller.overlay().is_none());
    }

    #[test]
    fn test_task_commit_moves_single_event() {
        let r = request(60);
        let (mut controller, mut store) = setup(&r);
        let task_id = Uuid::new_v4();
        let source = DragSource::task(r.id, task_id);

        controller.commit(&mut store, source, x_for(600.0), ZONE_TOP + 10.0);
        let id = controller.commit(&mut store, source, x_for(800.0), ZONE_TOP + 200.0);

        assert_eq!(id, Some(task_id));
        assert_eq!(store.state().events.len(), 1);
        let event = store.state().event_for_task(task_id).unwrap();
        assert_eq!((event.start, event.end, event.lane), (770, 830, 3));
    }

    #[test]
    fn test_read_only_ignores_gestures() {
        let r = request(60);
        let (_, mut store) = setup(&r);
        let mut controller = DragController::read_only(TimelineConfig::default());
        controller.set_dropzone(Rect::new(0.0, 0.0, 2000.0, 400.0));
        controller.register_point_to_minute(|x| 360.0 + x / 2.0);
        let before = store.writes();

        controller.preview(&mut store, DragSource::request(r.id), 400.0, 10.0);
        controller.update_overlay(DragSource::request(r.id), 400.0, 10.0, None, None);
        assert!(controller.commit(&mut store, DragSource::request(r.id), 400.0, 10.0).is_none());
        assert_eq!(store.writes(), before);
        assert!(controller.overlay().is_none());
    }

    #[test]
    fn test_overlay_view() {
        let r = request(90);
        let (mut controller, store) = setup(&r);
        let source = DragSource::request(r.id);

        controller.update_overlay(source, x_for(600.0), ZONE_TOP + 10.0, None, None);
        let view = controller.overlay_view(&store).unwrap();
        assert_eq!(view.width, 180.0);
        assert_eq!(view.translate_x, 90.0);
        assert_eq!(view.translate_y, 32.0);
        assert_eq!(view.label, "Werk Süd");
        assert_eq!(view.start.as_deref(), Some("09:15"));
        assert_eq!(view.end.as_deref(), Some("10:45"));

        controller.update_overlay(source, x_for(600.0), ZONE_TOP + 10.0, Some(20.0), Some(5.0));
        let view = controller.overlay_view(&store).unwrap();
        assert_eq!(view.translate_y, 5.0);
        assert_eq!(view.start.as_deref(), Some("09:50"));

        controller.update_overlay(source, x_for(600.0), ZONE_TOP - 40.0, None, None);
        assert_eq!(controller.overlay_view(&store).unwrap().start, None);
    }

    #[test]
    fn test_hit_testing() {
        let r = request(60);
        let (controller, _) = setup(&r);
        assert!(controller.is_point_over_dropzone(ZONE_LEFT, ZONE_TOP));
        assert!(!controller.is_point_over_dropzone(ZONE_LEFT - 1.0, ZONE_TOP + 1.0));

        let chip = Rect::new(ZONE_LEFT + 5.0, ZONE_TOP - 20.0, 120.0, 64.0);
        assert!(controller.is_over_dropzone(&chip));
        let outside = Rect::new(ZONE_LEFT - 10.0, ZONE_TOP, 120.0, 64.0);
        assert!(!controller.is_over_dropzone(&outside));
    }
}
