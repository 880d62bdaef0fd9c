pub mod category_repository;
pub mod comment_repository;
pub mod location_repository;
pub mod memory;
pub mod post_repository;
pub mod user_repository;

use std::sync::Arc;

use sqlx::PgPool;
use tracing::error;

use crate::data::category_repository::{CategoryRepository, PostgresCategoryRepository};
use crate::data::comment_repository::{CommentRepository, PostgresCommentRepository};
use crate::data::location_repository::{LocationRepository, PostgresLocationRepository};
use crate::data::memory::InMemoryStore;
use crate::data::post_repository::{PostRepository, PostgresPostRepository};
use crate::data::user_repository::{PostgresUserRepository, UserRepository};
use crate::domain::error::DomainError;

/// One handle per table, all backed by the same store.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            posts: Arc::new(PostgresPostRepository::new(pool.clone())),
            comments: Arc::new(PostgresCommentRepository::new(pool.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(pool.clone())),
            locations: Arc::new(PostgresLocationRepository::new(pool)),
        }
    }

    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            users: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            categories: store.clone(),
            locations: store,
        }
    }
}

pub(crate) fn storage_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| {
        error!("{}: {}", context, e);
        DomainError::Internal(format!("database error: {}", e))
    }
}

pub(crate) fn violates(e: &sqlx::Error, constraint: &str) -> bool {
    e.as_database_error()
        .and_then(|db| db.constraint())
        .map(|c| c == constraint)
        == Some(true)
}
