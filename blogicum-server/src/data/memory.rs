//! In-memory store implementing every repository trait.
//!
//! Used when no database is configured and by the test suite. Mirrors the
//! relational rules of the schema: unique usernames and slugs, cascading
//! deletes from users and posts, and `SET NULL` from categories and locations.
//! Data is lost on process restart.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::data::category_repository::CategoryRepository;
use crate::data::comment_repository::CommentRepository;
use crate::data::location_repository::LocationRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::category::{Category, NewCategory};
use crate::domain::comment::{Comment, CommentView};
use crate::domain::error::DomainError;
use crate::domain::location::{Location, NewLocation};
use crate::domain::post::{Post, PostDraft, PostView};
use crate::domain::query::{PostQuery, PostSlice};
use crate::domain::user::{Author, User};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    categories: BTreeMap<i64, Category>,
    locations: BTreeMap<i64, Location>,
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
    last_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn username_taken(&self, username: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && Some(u.id) != except)
    }

    fn view(&self, post: &Post) -> Option<PostView> {
        let author = self.users.get(&post.author_id)?;
        Some(PostView {
            post: post.clone(),
            author: Author::from(author),
            category: post
                .category_id
                .and_then(|id| self.categories.get(&id).cloned()),
            location: post
                .location_id
                .and_then(|id| self.locations.get(&id).cloned()),
            comment_count: self
                .comments
                .values()
                .filter(|c| c.post_id == post.id)
                .count() as i64,
        })
    }

    fn delete_post(&mut self, id: i64) -> bool {
        let removed = self.posts.remove(&id).is_some();
        if removed {
            self.comments.retain(|_, c| c.post_id != id);
        }
        removed
    }
}

pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;
        if tables.username_taken(&user.username, None) {
            return Err(DomainError::UserAlreadyExists(user.username));
        }
        tables.users.insert(user.id, user.clone());
        info!(user_id = %user.id, username = %user.username, "user created");
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn update_profile(&self, user: &User) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;
        if tables.username_taken(&user.username, Some(user.id)) {
            return Err(DomainError::UserAlreadyExists(user.username.clone()));
        }
        let stored = tables
            .users
            .get_mut(&user.id)
            .ok_or_else(|| DomainError::UserNotFound(user.id.to_string()))?;
        stored.username = user.username.clone();
        stored.email = user.email.clone();
        stored.first_name = user.first_name.clone();
        stored.last_name = user.last_name.clone();
        Ok(stored.clone())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        let owned: Vec<i64> = tables
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            tables.delete_post(post_id);
        }
        tables.comments.retain(|_, c| c.author_id != id);
        info!(user_id = %id, "user deleted");
        Ok(true)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, author_id: Uuid, draft: PostDraft) -> Result<Post, DomainError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let post = draft.into_post(id, author_id, Utc::now());
        tables.posts.insert(id, post.clone());
        info!(post_id = id, author_id = %author_id, "post created");
        Ok(post)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn find_view(&self, id: i64) -> Result<Option<PostView>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.get(&id).and_then(|p| tables.view(p)))
    }

    async fn find_posts(&self, query: &PostQuery) -> Result<PostSlice, DomainError> {
        let tables = self.tables.read().await;
        let mut views: Vec<PostView> = tables
            .posts
            .values()
            .filter_map(|p| tables.view(p))
            .filter(|v| query.matches(v))
            .collect();
        views.sort_by(|a, b| query.order().compare(a, b));

        let total = views.len() as u64;
        let items = match query.page() {
            Some(page) => views
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.limit() as usize)
                .collect(),
            None => views,
        };
        Ok(PostSlice { items, total })
    }

    async fn update(&self, id: i64, draft: PostDraft) -> Result<Option<Post>, DomainError> {
        let mut tables = self.tables.write().await;
        Ok(tables.posts.get_mut(&id).map(|post| {
            draft.apply_to(post);
            post.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        Ok(self.tables.write().await.delete_post(id))
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create(
        &self,
        post_id: i64,
        author_id: Uuid,
        text: String,
    ) -> Result<Comment, DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&post_id) {
            return Err(DomainError::PostNotFound(post_id));
        }
        let id = tables.next_id();
        let comment = Comment {
            id,
            text,
            created_at: Utc::now(),
            author_id,
            post_id,
        };
        tables.comments.insert(id, comment.clone());
        Ok(comment)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, DomainError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentView>, DomainError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<CommentView> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .filter_map(|c| {
                let author = tables.users.get(&c.author_id)?;
                Some(CommentView {
                    comment: c.clone(),
                    author: Author::from(author),
                })
            })
            .collect();
        comments.sort_by(|a, b| {
            a.comment
                .created_at
                .cmp(&b.comment.created_at)
                .then_with(|| a.comment.id.cmp(&b.comment.id))
        });
        Ok(comments)
    }

    async fn update_text(&self, id: i64, text: String) -> Result<Option<Comment>, DomainError> {
        let mut tables = self.tables.write().await;
        Ok(tables.comments.get_mut(&id).map(|comment| {
            comment.text = text;
            comment.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        Ok(self.tables.write().await.comments.remove(&id).is_some())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn create(&self, category: NewCategory) -> Result<Category, DomainError> {
        let mut tables = self.tables.write().await;
        if tables.categories.values().any(|c| c.slug == category.slug) {
            return Err(DomainError::CategoryAlreadyExists(category.slug));
        }
        let id = tables.next_id();
        let created = Category {
            id,
            title: category.title,
            description: category.description,
            slug: category.slug,
            is_published: category.is_published,
            created_at: Utc::now(),
        };
        tables.categories.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, DomainError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn list(&self) -> Result<Vec<Category>, DomainError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn set_published(
        &self,
        slug: &str,
        is_published: bool,
    ) -> Result<Option<Category>, DomainError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .categories
            .values_mut()
            .find(|c| c.slug == slug)
            .map(|c| {
                c.is_published = is_published;
                c.clone()
            }))
    }

    async fn delete(&self, slug: &str) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        let Some(id) = tables
            .categories
            .values()
            .find(|c| c.slug == slug)
            .map(|c| c.id)
        else {
            return Ok(false);
        };
        tables.categories.remove(&id);
        for post in tables.posts.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl LocationRepository for InMemoryStore {
    async fn create(&self, location: NewLocation) -> Result<Location, DomainError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let created = Location {
            id,
            name: location.name,
            is_published: location.is_published,
            created_at: Utc::now(),
        };
        tables.locations.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Location>, DomainError> {
        Ok(self.tables.read().await.locations.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Location>, DomainError> {
        let tables = self.tables.read().await;
        let mut locations: Vec<Location> = tables.locations.values().cloned().collect();
        locations.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(locations)
    }

    async fn set_published(
        &self,
        id: i64,
        is_published: bool,
    ) -> Result<Option<Location>, DomainError> {
        let mut tables = self.tables.write().await;
        Ok(tables.locations.get_mut(&id).map(|l| {
            l.is_published = is_published;
            l.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        if tables.locations.remove(&id).is_none() {
            return Ok(false);
        }
        for post in tables.posts.values_mut() {
            if post.location_id == Some(id) {
                post.location_id = None;
            }
        }
        Ok(true)
    }
}
