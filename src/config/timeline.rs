//! Límites y escala del timeline diario

use serde::{Deserialize, Serialize};

use crate::config::environment::parse_env;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::MINUTES_PER_DAY;

pub const DEFAULT_START_MINUTE: i32 = 6 * 60;
pub const DEFAULT_END_MINUTE: i32 = 22 * 60;
pub const DEFAULT_LANE_HEIGHT: f64 = 64.0;
pub const DEFAULT_PX_PER_MINUTE: f64 = 2.0;
pub const DEFAULT_LANES: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    pub start_minute: i32,
    pub end_minute: i32,
    pub lane_height: f64,
    pub px_per_minute: f64,
    pub lanes: u32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            start_minute: DEFAULT_START_MINUTE,
            end_minute: DEFAULT_END_MINUTE,
            lane_height: DEFAULT_LANE_HEIGHT,
            px_per_minute: DEFAULT_PX_PER_MINUTE,
            lanes: DEFAULT_LANES,
        }
    }
}

impl TimelineConfig {
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            start_minute: parse_env("TIMELINE_START_MINUTE", DEFAULT_START_MINUTE)?,
            end_minute: parse_env("TIMELINE_END_MINUTE", DEFAULT_END_MINUTE)?,
            lane_height: parse_env("TIMELINE_LANE_HEIGHT", DEFAULT_LANE_HEIGHT)?,
            px_per_minute: parse_env("TIMELINE_PX_PER_MINUTE", DEFAULT_PX_PER_MINUTE)?,
            lanes: parse_env("TIMELINE_LANES", DEFAULT_LANES)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.start_minute < 0
            || self.end_minute > MINUTES_PER_DAY
            || self.end_minute <= self.start_minute
        {
            return Err(AppError::Internal(format!(
                "Timeline bounds {}..{} are not a valid range within the day",
                self.start_minute, self.end_minute
            )));
        }
        if self.lane_height <= 0.0 || self.px_per_minute <= 0.0 || self.lanes == 0 {
            return Err(AppError::Internal(
                "Timeline lane height, scale and lane count must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Minutos visibles
    pub fn span(&self) -> i32 {
        self.end_minute - self.start_minute
    }
}
