use std::sync::Arc;

use crate::dto::common_dto::ApiResponse;
use crate::dto::location_dto::CreateLocationRequest;
use crate::models::Location;
use crate::repositories::Store;
use crate::services::location_service;
use crate::utils::errors::AppError;

pub struct LocationController {
    store: Arc<dyn Store>,
}

impl LocationController {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<ApiResponse<Vec<Location>>, AppError> {
        let mut tx = self.store.begin().await?;
        let locations = location_service::list_locations(tx.as_mut()).await?;
        Ok(ApiResponse::success(locations))
    }

    pub async fn create(
        &self,
        request: CreateLocationRequest,
    ) -> Result<ApiResponse<Location>, AppError> {
        let mut tx = self.store.begin().await?;
        let location = location_service::create_location(tx.as_mut(), request).await?;
        tx.commit().await?;
        Ok(ApiResponse::success_with_message(location, "Location created"))
    }
}
