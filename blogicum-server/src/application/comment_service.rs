use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::comment::{Comment, CommentView};
use crate::domain::error::DomainError;

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { comments, posts }
    }

    pub async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentView>, DomainError> {
        self.comments.list_for_post(post_id).await
    }

    /// Any existing post accepts comments; visibility is not re-checked here.
    #[instrument(skip(self, text))]
    pub async fn create_comment(
        &self,
        post_id: i64,
        author_id: Uuid,
        text: String,
    ) -> Result<Comment, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?;
        self.comments.create(post_id, author_id, text).await
    }

    /// The comment, provided it hangs under `post_id`.
    pub async fn get_for_post(&self, post_id: i64, comment_id: i64) -> Result<Comment, DomainError> {
        self.comments
            .find_by_id(comment_id)
            .await?
            .filter(|c| c.post_id == post_id)
            .ok_or(DomainError::CommentNotFound(comment_id))
    }

    #[instrument(skip(self, text))]
    pub async fn update_comment(&self, id: i64, text: String) -> Result<Comment, DomainError> {
        self.comments
            .update_text(id, text)
            .await?
            .ok_or(DomainError::CommentNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(&self, id: i64) -> Result<(), DomainError> {
        if self.comments.delete(id).await? {
            Ok(())
        } else {
            Err(DomainError::CommentNotFound(id))
        }
    }
}
