use std::sync::Arc;

use tracing::instrument;

use crate::data::category_repository::CategoryRepository;
use crate::data::location_repository::LocationRepository;
use crate::domain::category::{Category, NewCategory};
use crate::domain::error::DomainError;
use crate::domain::location::{Location, NewLocation};

/// Category and location administration.
#[derive(Clone)]
pub struct TaxonomyService {
    categories: Arc<dyn CategoryRepository>,
    locations: Arc<dyn LocationRepository>,
}

impl TaxonomyService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        locations: Arc<dyn LocationRepository>,
    ) -> Self {
        Self {
            categories,
            locations,
        }
    }

    #[instrument(skip(self))]
    pub async fn create_category(&self, category: NewCategory) -> Result<Category, DomainError> {
        category.validate()?;
        self.categories.create(category).await
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        self.categories.list().await
    }

    #[instrument(skip(self))]
    pub async fn set_category_published(
        &self,
        slug: &str,
        is_published: bool,
    ) -> Result<Category, DomainError> {
        self.categories
            .set_published(slug, is_published)
            .await?
            .ok_or_else(|| DomainError::CategoryNotFound(slug.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn delete_category(&self, slug: &str) -> Result<(), DomainError> {
        if self.categories.delete(slug).await? {
            Ok(())
        } else {
            Err(DomainError::CategoryNotFound(slug.to_string()))
        }
    }

    #[instrument(skip(self))]
    pub async fn create_location(&self, location: NewLocation) -> Result<Location, DomainError> {
        location.validate()?;
        self.locations.create(location).await
    }

    pub async fn list_locations(&self) -> Result<Vec<Location>, DomainError> {
        self.locations.list().await
    }

    #[instrument(skip(self))]
    pub async fn set_location_published(
        &self,
        id: i64,
        is_published: bool,
    ) -> Result<Location, DomainError> {
        self.locations
            .set_published(id, is_published)
            .await?
            .ok_or(DomainError::LocationNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_location(&self, id: i64) -> Result<(), DomainError> {
        if self.locations.delete(id).await? {
            Ok(())
        } else {
            Err(DomainError::LocationNotFound(id))
        }
    }
}
