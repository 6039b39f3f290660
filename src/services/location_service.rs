use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::location_dto::CreateLocationRequest;
use crate::models::Location;
use crate::repositories::StoreTx;
use crate::utils::errors::AppResult;

pub async fn list_locations(tx: &mut dyn StoreTx) -> AppResult<Vec<Location>> {
    tx.list_locations().await
}

pub async fn create_location(
    tx: &mut dyn StoreTx,
    payload: CreateLocationRequest,
) -> AppResult<Location> {
    payload.validate()?;

    let location = Location {
        id: Uuid::new_v4(),
        name: payload.name.trim().to_string(),
        address: payload.address,
        lat: payload.lat,
        lng: payload.lng,
        created_at: Utc::now(),
    };

    tx.insert_location(&location).await?;
    Ok(location)
}
