//! Conversión entre minutos del día, píxeles horizontales y carriles
//!
//! Los minutos fuera de `[start_minute, end_minute]` se recortan a los
//! límites; nunca producen offsets negativos ni anchos negativos.

use crate::config::TimelineConfig;

/// `clamp` tolerante: si `max < min` gana `min`
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    let upper = if value > max { max } else { value };
    if upper < min {
        min
    } else {
        upper
    }
}

/// Minuto del día como `HH:MM`
pub fn format_minute(minute: i32) -> String {
    let minute = minute.rem_euclid(24 * 60);
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineScale {
    pub start_minute: i32,
    pub end_minute: i32,
    pub px_per_minute: f64,
    pub lane_height: f64,
}

impl TimelineScale {
    pub fn new(config: &TimelineConfig) -> Self {
        Self {
            start_minute: config.start_minute,
            end_minute: config.end_minute,
            px_per_minute: config.px_per_minute,
            lane_height: config.lane_height,
        }
    }

    pub fn with_px_per_minute(self, px_per_minute: f64) -> Self {
        Self {
            px_per_minute,
            ..self
        }
    }

    pub fn clamp_minute(&self, minute: f64) -> f64 {
        clamp(minute, self.start_minute as f64, self.end_minute as f64)
    }

    pub fn minute_to_px(&self, minute: f64) -> f64 {
        (self.clamp_minute(minute) - self.start_minute as f64) * self.px_per_minute
    }

    pub fn px_to_minute(&self, px: f64) -> f64 {
        self.clamp_minute(self.start_minute as f64 + px / self.px_per_minute)
    }

    /// Carril bajo un offset vertical relativo a la zona de drop
    pub fn lane_from_offset(&self, offset_y: f64, lanes: u32) -> u32 {
        let last = lanes.saturating_sub(1) as f64;
        clamp((offset_y / self.lane_height).floor(), 0.0, last) as u32
    }

    /// Offset vertical del borde superior de un carril
    pub fn lane_to_offset(&self, lane: u32) -> f64 {
        lane as f64 * self.lane_height
    }

    pub fn width_for(&self, start: f64, end: f64) -> f64 {
        (self.clamp_minute(end) - self.clamp_minute(start)).max(0.0) * self.px_per_minute
    }

    pub fn total_width(&self) -> f64 {
        self.width_for(self.start_minute as f64, self.end_minute as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale() -> TimelineScale {
        TimelineScale::new(&TimelineConfig::default())
    }

    #[test]
    fn test_px_minute_round_trip() {
        let s = scale();
        let mut x = 0.0;
        while x <= s.total_width() {
            let back = s.minute_to_px(s.px_to_minute(x));
            assert!((back - x).abs() < 1e-9, "x={} back={}", x, back);
            x += 7.3;
        }
    }

    #[test]
    fn test_monotonic_inside_bounds() {
        let s = scale().with_px_per_minute(1.5);
        let mut prev = s.minute_to_px(s.start_minute as f64);
        for minute in (s.start_minute + 1)..=s.end_minute {
            let px = s.minute_to_px(minute as f64);
            assert!(px > prev);
            prev = px;
        }
    }

    #[test]
    fn test_out_of_range_minutes_clamp() {
        let s = scale();
        assert_eq!(s.minute_to_px(0.0), 0.0);
        assert_eq!(s.minute_to_px(2000.0), s.total_width());
        assert_eq!(s.px_to_minute(-50.0), 360.0);
        assert_eq!(s.width_for(1400.0, 1300.0), 0.0);
        assert_eq!(s.width_for(300.0, 420.0), 120.0);
    }

    #[test]
    fn test_lanes() {
        let s = scale();
        assert_eq!(s.lane_from_offset(-10.0, 6), 0);
        assert_eq!(s.lane_from_offset(63.9, 6), 0);
        assert_eq!(s.lane_from_offset(64.0, 6), 1);
        assert_eq!(s.lane_from_offset(10_000.0, 6), 5);
        assert_eq!(s.lane_to_offset(3), 192.0);
        assert_eq!(s.lane_from_offset(s.lane_to_offset(4), 6), 4);
    }

    #[test]
    fn test_format_minute() {
        assert_eq!(format_minute(0), "00:00");
        assert_eq!(format_minute(545), "09:05");
        assert_eq!(format_minute(1320), "22:00");
    }

    #[test]
    fn test_clamp_prefers_min_when_inverted() {
        assert_eq!(clamp(5, 10, 3), 10);
        assert_eq!(clamp(7, 0, 10), 7);
    }
}
