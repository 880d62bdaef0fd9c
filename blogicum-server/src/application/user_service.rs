use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::{ProfileUpdate, User};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_by_username(&self, username: &str) -> Result<User, DomainError> {
        self.repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<User, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(id.to_string()))
    }

    #[instrument(skip(self, update))]
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<User, DomainError> {
        let mut user = self.get_by_id(user_id).await?;
        update.apply(&mut user);
        self.repo.update_profile(&user).await
    }

    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.repo.list().await
    }

    #[instrument(skip(self))]
    pub async fn delete_by_username(&self, username: &str) -> Result<(), DomainError> {
        let user = self.get_by_username(username).await?;
        self.repo.delete(user.id).await?;
        Ok(())
    }
}
