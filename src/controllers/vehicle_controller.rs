use std::sync::Arc;

use crate::dto::common_dto::ApiResponse;
use crate::dto::vehicle_dto::CreateVehicleRequest;
use crate::models::Vehicle;
use crate::repositories::Store;
use crate::services::vehicle_service;
use crate::utils::errors::AppError;

pub struct VehicleController {
    store: Arc<dyn Store>,
}

impl VehicleController {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<ApiResponse<Vec<Vehicle>>, AppError> {
        let mut tx = self.store.begin().await?;
        let vehicles = vehicle_service::list_vehicles(tx.as_mut()).await?;
        Ok(ApiResponse::success(vehicles))
    }

    /// Devuelve el vehículo existente si la matrícula ya está registrada
    pub async fn create(
        &self,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<Vehicle>, AppError> {
        let mut tx = self.store.begin().await?;
        let (vehicle, created) = vehicle_service::create_vehicle(tx.as_mut(), request).await?;
        tx.commit().await?;

        let message = if created {
            "Vehicle created"
        } else {
            "Vehicle already registered"
        };
        Ok(ApiResponse::success_with_message(vehicle, message))
    }
}
