use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::validate_license_plate;

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(custom = "validate_license_plate")]
    pub plate: String,
    #[validate(range(min = 1))]
    pub board_capacity: i32,
    pub driver_id: Uuid,
    pub is_active: Option<bool>,
}
