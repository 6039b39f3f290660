use sqlx::PgConnection;
use uuid::Uuid;

use crate::models::Location;
use crate::utils::errors::AppError;

pub struct LocationRepository;

impl LocationRepository {
    pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Location>, AppError> {
        let location = sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(location)
    }

    pub async fn find_all(conn: &mut PgConnection) -> Result<Vec<Location>, AppError> {
        let locations = sqlx::query_as::<_, Location>("SELECT * FROM locations ORDER BY name ASC")
            .fetch_all(conn)
            .await?;

        Ok(locations)
    }

    pub async fn insert(conn: &mut PgConnection, location: &Location) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO locations (id, name, address, lat, lng, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(location.id)
        .bind(&location.name)
        .bind(&location.address)
        .bind(location.lat)
        .bind(location.lng)
        .bind(location.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }
}
