use chrono::NaiveDate;
use std::sync::Arc;

use crate::config::TimelineConfig;
use crate::dto::common_dto::ApiResponse;
use crate::dto::timeline_dto::TimelineResponse;
use crate::repositories::Store;
use crate::services::timeline_service;
use crate::utils::errors::AppError;

pub struct TimelineController {
    store: Arc<dyn Store>,
    config: TimelineConfig,
}

impl TimelineController {
    pub fn new(store: Arc<dyn Store>, config: TimelineConfig) -> Self {
        Self { store, config }
    }

    pub async fn day(&self, date: NaiveDate) -> Result<ApiResponse<TimelineResponse>, AppError> {
        let mut tx = self.store.begin().await?;
        let timeline = timeline_service::timeline_for_date(tx.as_mut(), date, &self.config).await?;
        Ok(ApiResponse::success(timeline))
    }
}
