//! Listing queries for the post feeds.
//!
//! A [`PostQuery`] is a plain description of which posts to list, in what order
//! and which page of them. Storage backends evaluate it in one pass; the feed
//! builders at the bottom of this module assemble the query for each surface.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::post::PostView;
use crate::domain::visibility;

pub const PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    Author(Uuid),
    Category(i64),
    /// Published, in a published category, and `pub_date <= now`.
    PubliclyVisible { now: DateTime<Utc> },
}

impl PostFilter {
    pub fn matches(&self, view: &PostView) -> bool {
        match self {
            PostFilter::Author(id) => view.post.author_id == *id,
            PostFilter::Category(id) => view.post.category_id == Some(*id),
            PostFilter::PubliclyVisible { now } => {
                visibility::is_publicly_visible(&view.post, view.category.as_ref(), *now)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostOrder {
    /// `pub_date` descending, ties broken by id descending.
    #[default]
    NewestFirst,
}

impl PostOrder {
    pub fn compare(&self, a: &PostView, b: &PostView) -> Ordering {
        match self {
            PostOrder::NewestFirst => b
                .post
                .pub_date
                .cmp(&a.post.pub_date)
                .then_with(|| b.post.id.cmp(&a.post.id)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(number: u32) -> Self {
        Self {
            number: number.max(1),
            size: PAGE_SIZE,
        }
    }

    /// Parses the `?page=` value; absent means the first page.
    pub fn parse(raw: Option<&str>) -> Result<Self, DomainError> {
        match raw {
            None => Ok(Self::new(1)),
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(number) if number >= 1 => Ok(Self::new(number)),
                _ => Err(DomainError::InvalidPage(raw.to_string())),
            },
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostQuery {
    filters: Vec<PostFilter>,
    order: PostOrder,
    page: Option<PageRequest>,
}

impl PostQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_author(mut self, author_id: Uuid) -> Self {
        self.filters.push(PostFilter::Author(author_id));
        self
    }

    pub fn in_category(mut self, category_id: i64) -> Self {
        self.filters.push(PostFilter::Category(category_id));
        self
    }

    pub fn publicly_visible(mut self, now: DateTime<Utc>) -> Self {
        self.filters.push(PostFilter::PubliclyVisible { now });
        self
    }

    pub fn newest_first(mut self) -> Self {
        self.order = PostOrder::NewestFirst;
        self
    }

    pub fn paginate(mut self, page: PageRequest) -> Self {
        self.page = Some(page);
        self
    }

    pub fn filters(&self) -> &[PostFilter] {
        &self.filters
    }

    pub fn order(&self) -> PostOrder {
        self.order
    }

    pub fn page(&self) -> Option<PageRequest> {
        self.page
    }

    pub fn matches(&self, view: &PostView) -> bool {
        self.filters.iter().all(|f| f.matches(view))
    }
}

/// What a backend hands back for a query: the requested page of posts and
/// the number of posts matching the filters overall.
#[derive(Debug, Clone, Default)]
pub struct PostSlice {
    pub items: Vec<PostView>,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u32,
    pub page_size: u32,
    pub total: u64,
    pub num_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    /// Fails with `InvalidPage` when `request` lies past the last page. The
    /// first page always exists, even when empty.
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Result<Self, DomainError> {
        let num_pages = total.div_ceil(u64::from(request.size)).max(1);
        let num_pages = u32::try_from(num_pages).unwrap_or(u32::MAX);
        if request.number > num_pages {
            return Err(DomainError::InvalidPage(request.number.to_string()));
        }
        Ok(Self {
            items,
            number: request.number,
            page_size: request.size,
            total,
            num_pages,
            has_next: request.number < num_pages,
            has_previous: request.number > 1,
        })
    }
}

pub fn home_feed(now: DateTime<Utc>, page: PageRequest) -> PostQuery {
    PostQuery::new()
        .publicly_visible(now)
        .newest_first()
        .paginate(page)
}

/// The owner browsing their own profile also gets drafts and scheduled posts.
pub fn profile_feed(
    author_id: Uuid,
    viewer: Option<Uuid>,
    now: DateTime<Utc>,
    page: PageRequest,
) -> PostQuery {
    let query = PostQuery::new().by_author(author_id);
    let query = if viewer == Some(author_id) {
        query
    } else {
        query.publicly_visible(now)
    };
    query.newest_first().paginate(page)
}

pub fn category_feed(category_id: i64, now: DateTime<Utc>, page: PageRequest) -> PostQuery {
    PostQuery::new()
        .in_category(category_id)
        .publicly_visible(now)
        .newest_first()
        .paginate(page)
}
