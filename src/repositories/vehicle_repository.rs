use sqlx::PgConnection;
use uuid::Uuid;

use crate::models::Vehicle;
use crate::utils::errors::AppError;

pub struct VehicleRepository;

impl VehicleRepository {
    pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(vehicle)
    }

    pub async fn find_by_plate(conn: &mut PgConnection, plate: &str) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE plate = $1")
            .bind(plate)
            .fetch_optional(conn)
            .await?;

        Ok(vehicle)
    }

    pub async fn find_by_driver(conn: &mut PgConnection, driver_id: Uuid) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE driver_id = $1 ORDER BY plate ASC",
        )
        .bind(driver_id)
        .fetch_all(conn)
        .await?;

        Ok(vehicles)
    }

    pub async fn find_all(conn: &mut PgConnection) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY plate ASC")
            .fetch_all(conn)
            .await?;

        Ok(vehicles)
    }

    pub async fn insert(conn: &mut PgConnection, vehicle: &Vehicle) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO vehicles (id, plate, board_capacity, driver_id, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(vehicle.id)
        .bind(&vehicle.plate)
        .bind(vehicle.board_capacity)
        .bind(vehicle.driver_id)
        .bind(vehicle.is_active)
        .bind(vehicle.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }
}
