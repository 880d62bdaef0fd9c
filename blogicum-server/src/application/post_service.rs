use std::sync::Arc;

use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::data::category_repository::CategoryRepository;
use crate::data::location_repository::LocationRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::category::Category;
use crate::domain::error::DomainError;
use crate::domain::location::Location;
use crate::domain::post::{Post, PostDraft, PostView};
use crate::domain::validation::FieldErrors;

const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    locations: Arc<dyn LocationRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        locations: Arc<dyn LocationRepository>,
    ) -> Self {
        Self {
            posts,
            categories,
            locations,
        }
    }

    /// A post as `viewer` may see it. Hidden posts are reported as missing.
    pub async fn get_visible(
        &self,
        id: i64,
        viewer: Option<Uuid>,
    ) -> Result<PostView, DomainError> {
        let now = Utc::now();
        self.posts
            .find_view(id)
            .await?
            .filter(|view| view.is_visible_to(viewer, now))
            .ok_or(DomainError::PostNotFound(id))
    }

    pub async fn get_post(&self, id: i64) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    /// Everything a post form may point at.
    pub async fn choices(&self) -> Result<(Vec<Category>, Vec<Location>), DomainError> {
        Ok((self.categories.list().await?, self.locations.list().await?))
    }

    #[instrument(skip(self, draft))]
    pub async fn create_post(&self, author_id: Uuid, draft: PostDraft) -> Result<Post, DomainError> {
        self.check_relations(&draft).await?;
        self.posts.create(author_id, draft).await
    }

    #[instrument(skip(self, draft))]
    pub async fn update_post(&self, id: i64, draft: PostDraft) -> Result<Post, DomainError> {
        self.check_relations(&draft).await?;
        self.posts
            .update(id, draft)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: i64) -> Result<(), DomainError> {
        if self.posts.delete(id).await? {
            Ok(())
        } else {
            Err(DomainError::PostNotFound(id))
        }
    }

    async fn check_relations(&self, draft: &PostDraft) -> Result<(), DomainError> {
        let mut errors = FieldErrors::default();
        if let Some(id) = draft.category_id {
            if self.categories.find_by_id(id).await?.is_none() {
                errors.add("category", INVALID_CHOICE);
            }
        }
        if let Some(id) = draft.location_id {
            if self.locations.find_by_id(id).await?.is_none() {
                errors.add("location", INVALID_CHOICE);
            }
        }
        errors.into_result()
    }
}
