use crate::data::{storage_error, violates};
use crate::domain::category::{Category, NewCategory};
use crate::domain::error::DomainError;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};

const CATEGORY_COLUMNS: &str = "id, title, description, slug, is_published, created_at";

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, category: NewCategory) -> Result<Category, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, DomainError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError>;
    async fn list(&self) -> Result<Vec<Category>, DomainError>;
    async fn set_published(
        &self,
        slug: &str,
        is_published: bool,
    ) -> Result<Option<Category>, DomainError>;
    /// Posts in the category keep existing with no category.
    async fn delete(&self, slug: &str) -> Result<bool, DomainError>;
}

#[derive(Clone)]
pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn create(&self, category: NewCategory) -> Result<Category, DomainError> {
        let created = sqlx::query_as::<_, Category>(&format!(
            r#"
            INSERT INTO categories (title, description, slug, is_published)
            VALUES ($1, $2, $3, $4)
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(&category.title)
        .bind(&category.description)
        .bind(&category.slug)
        .bind(category.is_published)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if violates(&e, "categories_slug_key") {
                DomainError::CategoryAlreadyExists(category.slug.clone())
            } else {
                error!("failed to create category: {}", e);
                DomainError::Internal(format!("database error: {}", e))
            }
        })?;

        info!(category_id = created.id, slug = %created.slug, "category created");
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, DomainError> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("failed to find category"))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("failed to find category"))
    }

    async fn list(&self) -> Result<Vec<Category>, DomainError> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY title, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error("failed to list categories"))
    }

    async fn set_published(
        &self,
        slug: &str,
        is_published: bool,
    ) -> Result<Option<Category>, DomainError> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "UPDATE categories SET is_published = $1 WHERE slug = $2 RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(is_published)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("failed to update category"))?;

        if category.is_some() {
            info!(slug, is_published, "category publication changed");
        }
        Ok(category)
    }

    async fn delete(&self, slug: &str) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM categories WHERE slug = $1")
            .bind(slug)
            .execute(&self.pool)
            .await
            .map_err(storage_error("failed to delete category"))?;

        if deleted.rows_affected() > 0 {
            info!(slug, "category deleted");
        }
        Ok(deleted.rows_affected() > 0)
    }
}
