use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::category::Category;
use crate::domain::location::Location;
use crate::domain::user::Author;
use crate::domain::visibility;

pub const TITLE_MAX_CHARS: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
    pub image: Option<String>,
}

/// Every author-editable field of a post. Creation and editing both submit a
/// whole draft, the way a model form does.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
    pub image: Option<String>,
}

impl PostDraft {
    pub fn into_post(self, id: i64, author_id: Uuid, created_at: DateTime<Utc>) -> Post {
        Post {
            id,
            title: self.title,
            text: self.text,
            pub_date: self.pub_date,
            is_published: self.is_published,
            created_at,
            author_id,
            category_id: self.category_id,
            location_id: self.location_id,
            image: self.image,
        }
    }

    pub fn apply_to(self, post: &mut Post) {
        post.title = self.title;
        post.text = self.text;
        post.pub_date = self.pub_date;
        post.is_published = self.is_published;
        post.category_id = self.category_id;
        post.location_id = self.location_id;
        post.image = self.image;
    }
}

impl From<&Post> for PostDraft {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            text: post.text.clone(),
            pub_date: post.pub_date,
            is_published: post.is_published,
            category_id: post.category_id,
            location_id: post.location_id,
            image: post.image.clone(),
        }
    }
}

/// A post with its relations joined in and the number of comments attached,
/// ready to render without further lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub author: Author,
    pub category: Option<Category>,
    pub location: Option<Location>,
    pub comment_count: i64,
}

impl PostView {
    pub fn is_visible_to(&self, viewer: Option<Uuid>, now: DateTime<Utc>) -> bool {
        visibility::is_visible(&self.post, self.category.as_ref(), viewer, now)
    }
}
