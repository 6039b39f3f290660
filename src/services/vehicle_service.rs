use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::CreateVehicleRequest;
use crate::models::Vehicle;
use crate::repositories::StoreTx;
use crate::utils::errors::AppResult;

/// Matrícula normalizada: sin espacios en los extremos y en mayúsculas
pub fn normalize_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}

pub async fn list_vehicles(tx: &mut dyn StoreTx) -> AppResult<Vec<Vehicle>> {
    tx.list_vehicles().await
}

/// Alta idempotente por matrícula
///
/// Si ya existe un vehículo con esa matrícula se devuelve tal cual, sin
/// modificar su capacidad ni su conductor. El booleano indica si se creó.
pub async fn create_vehicle(
    tx: &mut dyn StoreTx,
    payload: CreateVehicleRequest,
) -> AppResult<(Vehicle, bool)> {
    payload.validate()?;
    let plate = normalize_plate(&payload.plate);

    if let Some(existing) = tx.find_vehicle_by_plate(&plate).await? {
        return Ok((existing, false));
    }

    let vehicle = Vehicle {
        id: Uuid::new_v4(),
        plate,
        board_capacity: payload.board_capacity,
        driver_id: payload.driver_id,
        is_active: payload.is_active.unwrap_or(true),
        created_at: Utc::now(),
    };

    tx.insert_vehicle(&vehicle).await?;
    info!("🚛 Vehículo {} creado (capacidad {})", vehicle.plate, vehicle.board_capacity);
    Ok((vehicle, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate("  hh-ab-123 "), "HH-AB-123");
    }
}
