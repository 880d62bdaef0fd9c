use crate::data::storage_error;
use crate::domain::error::DomainError;
use crate::domain::location::{Location, NewLocation};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn create(&self, location: NewLocation) -> Result<Location, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Location>, DomainError>;
    async fn list(&self) -> Result<Vec<Location>, DomainError>;
    async fn set_published(
        &self,
        id: i64,
        is_published: bool,
    ) -> Result<Option<Location>, DomainError>;
    /// Posts at the location keep existing with no location.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
}

#[derive(Clone)]
pub struct PostgresLocationRepository {
    pool: PgPool,
}

impl PostgresLocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn create(&self, location: NewLocation) -> Result<Location, DomainError> {
        let created = sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (name, is_published)
            VALUES ($1, $2)
            RETURNING id, name, is_published, created_at
            "#,
        )
        .bind(&location.name)
        .bind(location.is_published)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error("failed to create location"))?;

        info!(location_id = created.id, name = %created.name, "location created");
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Location>, DomainError> {
        sqlx::query_as::<_, Location>(
            "SELECT id, name, is_published, created_at FROM locations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("failed to find location"))
    }

    async fn list(&self) -> Result<Vec<Location>, DomainError> {
        sqlx::query_as::<_, Location>(
            "SELECT id, name, is_published, created_at FROM locations ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error("failed to list locations"))
    }

    async fn set_published(
        &self,
        id: i64,
        is_published: bool,
    ) -> Result<Option<Location>, DomainError> {
        let location = sqlx::query_as::<_, Location>(
            r#"
            UPDATE locations SET is_published = $1 WHERE id = $2
            RETURNING id, name, is_published, created_at
            "#,
        )
        .bind(is_published)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("failed to update location"))?;

        if location.is_some() {
            info!(location_id = id, is_published, "location publication changed");
        }
        Ok(location)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error("failed to delete location"))?;

        if deleted.rows_affected() > 0 {
            info!(location_id = id, "location deleted");
        }
        Ok(deleted.rows_affected() > 0)
    }
}
