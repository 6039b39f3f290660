use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::validate_not_empty;

// Request para crear una ubicación
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLocationRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_empty")]
    pub name: String,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: Option<f64>,
}
