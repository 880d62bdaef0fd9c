use crate::data::storage_error;
use crate::domain::category::Category;
use crate::domain::error::DomainError;
use crate::domain::location::Location;
use crate::domain::post::{Post, PostDraft, PostView};
use crate::domain::query::{PostFilter, PostOrder, PostQuery, PostSlice};
use crate::domain::user::Author;
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Row};
use tracing::info;

const POST_COLUMNS: &str =
    "id, title, text, pub_date, is_published, created_at, author_id, category_id, location_id, image";

/// Post columns keep their own names; joined columns are prefixed.
const VIEW_SELECT: &str = r#"
    SELECT p.id, p.title, p.text, p.pub_date, p.is_published, p.created_at,
           p.author_id, p.category_id, p.location_id, p.image,
           u.username AS author_username,
           c.title AS category_title, c.description AS category_description,
           c.slug AS category_slug, c.is_published AS category_is_published,
           c.created_at AS category_created_at,
           l.name AS location_name, l.is_published AS location_is_published,
           l.created_at AS location_created_at,
           (SELECT COUNT(*) FROM comments cm WHERE cm.post_id = p.id) AS comment_count
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN categories c ON c.id = p.category_id
    LEFT JOIN locations l ON l.id = p.location_id
"#;

const COUNT_SELECT: &str = r#"
    SELECT COUNT(*)
    FROM posts p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, author_id: uuid::Uuid, draft: PostDraft) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn find_view(&self, id: i64) -> Result<Option<PostView>, DomainError>;
    async fn find_posts(&self, query: &PostQuery) -> Result<PostSlice, DomainError>;
    async fn update(&self, id: i64, draft: PostDraft) -> Result<Option<Post>, DomainError>;
    /// Removes the post and its comments.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl<'r> FromRow<'r, PgRow> for PostView {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let post = Post::from_row(row)?;
        let author = Author {
            id: post.author_id,
            username: row.try_get("author_username")?,
        };
        let category = match post.category_id {
            Some(id) => Some(Category {
                id,
                title: row.try_get("category_title")?,
                description: row.try_get("category_description")?,
                slug: row.try_get("category_slug")?,
                is_published: row.try_get("category_is_published")?,
                created_at: row.try_get("category_created_at")?,
            }),
            None => None,
        };
        let location = match post.location_id {
            Some(id) => Some(Location {
                id,
                name: row.try_get("location_name")?,
                is_published: row.try_get("location_is_published")?,
                created_at: row.try_get("location_created_at")?,
            }),
            None => None,
        };
        Ok(PostView {
            post,
            author,
            category,
            location,
            comment_count: row.try_get("comment_count")?,
        })
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &PostQuery) {
    for (i, filter) in query.filters().iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        match *filter {
            PostFilter::Author(author_id) => {
                builder.push("p.author_id = ").push_bind(author_id);
            }
            PostFilter::Category(category_id) => {
                builder.push("p.category_id = ").push_bind(category_id);
            }
            PostFilter::PubliclyVisible { now } => {
                builder
                    .push("p.is_published AND COALESCE(c.is_published, FALSE) AND p.pub_date <= ")
                    .push_bind(now);
            }
        }
    }
}

fn push_order(builder: &mut QueryBuilder<'_, Postgres>, order: PostOrder) {
    match order {
        PostOrder::NewestFirst => builder.push(" ORDER BY p.pub_date DESC, p.id DESC"),
    };
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, author_id: uuid::Uuid, draft: PostDraft) -> Result<Post, DomainError> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts (title, text, pub_date, is_published, author_id, category_id, location_id, image)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(&draft.title)
        .bind(&draft.text)
        .bind(draft.pub_date)
        .bind(draft.is_published)
        .bind(author_id)
        .bind(draft.category_id)
        .bind(draft.location_id)
        .bind(&draft.image)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error("failed to create post"))?;

        info!(post_id = post.id, author_id = %post.author_id, "post created");
        Ok(post)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, Post>(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("failed to find post"))
    }

    async fn find_view(&self, id: i64) -> Result<Option<PostView>, DomainError> {
        sqlx::query_as::<_, PostView>(&format!("{VIEW_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("failed to load post"))
    }

    async fn find_posts(&self, query: &PostQuery) -> Result<PostSlice, DomainError> {
        let mut count = QueryBuilder::<Postgres>::new(COUNT_SELECT);
        push_filters(&mut count, query);
        let total: i64 = count
            .build()
            .fetch_one(&self.pool)
            .await
            .and_then(|row| row.try_get(0usize))
            .map_err(storage_error("failed to count posts"))?;

        let mut select = QueryBuilder::<Postgres>::new(VIEW_SELECT);
        push_filters(&mut select, query);
        push_order(&mut select, query.order());
        if let Some(page) = query.page() {
            select
                .push(" LIMIT ")
                .push_bind(page.limit() as i64)
                .push(" OFFSET ")
                .push_bind(page.offset() as i64);
        }
        let items = select
            .build_query_as::<PostView>()
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("failed to list posts"))?;

        Ok(PostSlice {
            items,
            total: total.max(0) as u64,
        })
    }

    async fn update(&self, id: i64, draft: PostDraft) -> Result<Option<Post>, DomainError> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts
            SET title = $1, text = $2, pub_date = $3, is_published = $4,
                category_id = $5, location_id = $6, image = $7
            WHERE id = $8
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(&draft.title)
        .bind(&draft.text)
        .bind(draft.pub_date)
        .bind(draft.is_published)
        .bind(draft.category_id)
        .bind(draft.location_id)
        .bind(&draft.image)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("failed to update post"))?;

        if post.is_some() {
            info!(post_id = id, "post updated");
        }
        Ok(post)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error("failed to delete post"))?;

        if deleted.rows_affected() > 0 {
            info!(post_id = id, "post deleted");
        }
        Ok(deleted.rows_affected() > 0)
    }
}
