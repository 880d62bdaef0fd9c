use crate::data::storage_error;
use crate::domain::comment::{Comment, CommentView};
use crate::domain::error::DomainError;
use crate::domain::user::Author;
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};
use tracing::info;
use uuid::Uuid;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, post_id: i64, author_id: Uuid, text: String)
    -> Result<Comment, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, DomainError>;
    /// Oldest first.
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentView>, DomainError>;
    async fn update_text(&self, id: i64, text: String) -> Result<Option<Comment>, DomainError>;
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
}

#[derive(Clone)]
pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl<'r> FromRow<'r, PgRow> for CommentView {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let comment = Comment::from_row(row)?;
        Ok(CommentView {
            author: Author {
                id: comment.author_id,
                username: row.try_get("author_username")?,
            },
            comment,
        })
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(
        &self,
        post_id: i64,
        author_id: Uuid,
        text: String,
    ) -> Result<Comment, DomainError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (text, author_id, post_id)
            VALUES ($1, $2, $3)
            RETURNING id, text, created_at, author_id, post_id
            "#,
        )
        .bind(text)
        .bind(author_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error("failed to create comment"))?;

        info!(comment_id = comment.id, post_id, author_id = %author_id, "comment created");
        Ok(comment)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, DomainError> {
        sqlx::query_as::<_, Comment>(
            "SELECT id, text, created_at, author_id, post_id FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("failed to find comment"))
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentView>, DomainError> {
        sqlx::query_as::<_, CommentView>(
            r#"
            SELECT cm.id, cm.text, cm.created_at, cm.author_id, cm.post_id,
                   u.username AS author_username
            FROM comments cm
            JOIN users u ON u.id = cm.author_id
            WHERE cm.post_id = $1
            ORDER BY cm.created_at ASC, cm.id ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error("failed to list comments"))
    }

    async fn update_text(&self, id: i64, text: String) -> Result<Option<Comment>, DomainError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments SET text = $1 WHERE id = $2
            RETURNING id, text, created_at, author_id, post_id
            "#,
        )
        .bind(text)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("failed to update comment"))?;

        if comment.is_some() {
            info!(comment_id = id, "comment updated");
        }
        Ok(comment)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error("failed to delete comment"))?;

        if deleted.rows_affected() > 0 {
            info!(comment_id = id, "comment deleted");
        }
        Ok(deleted.rows_affected() > 0)
    }
}
