use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::data::category_repository::CategoryRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::category::Category;
use crate::domain::error::DomainError;
use crate::domain::post::PostView;
use crate::domain::query::{self, Page, PageRequest, PostQuery};
use crate::domain::user::User;

/// Runs the listing surfaces: home, profile and category feeds.
#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    users: Arc<dyn UserRepository>,
}

impl FeedService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            posts,
            categories,
            users,
        }
    }

    pub async fn home(&self, page: PageRequest) -> Result<Page<PostView>, DomainError> {
        self.home_at(Utc::now(), page).await
    }

    pub async fn home_at(
        &self,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Page<PostView>, DomainError> {
        self.run(query::home_feed(now, page)).await
    }

    pub async fn profile(
        &self,
        username: &str,
        viewer: Option<Uuid>,
        page: PageRequest,
    ) -> Result<(User, Page<PostView>), DomainError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))?;
        let posts = self
            .run(query::profile_feed(user.id, viewer, Utc::now(), page))
            .await?;
        Ok((user, posts))
    }

    /// Unpublished categories are reported exactly like missing ones.
    pub async fn category(
        &self,
        slug: &str,
        page: PageRequest,
    ) -> Result<(Category, Page<PostView>), DomainError> {
        let category = self
            .categories
            .find_by_slug(slug)
            .await?
            .filter(|c| c.is_published)
            .ok_or_else(|| DomainError::CategoryNotFound(slug.to_string()))?;
        let posts = self
            .run(query::category_feed(category.id, Utc::now(), page))
            .await?;
        Ok((category, posts))
    }

    async fn run(&self, query: PostQuery) -> Result<Page<PostView>, DomainError> {
        let request = query.page().unwrap_or_else(|| PageRequest::new(1));
        let slice = self.posts.find_posts(&query).await?;
        Page::new(slice.items, request, slice.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Repositories;
    use crate::data::memory::InMemoryStore;
    use crate::domain::category::NewCategory;
    use crate::domain::post::PostDraft;
    use chrono::Duration;

    struct Fixture {
        repos: Repositories,
        feeds: FeedService,
    }

    fn fixture() -> Fixture {
        let repos = Repositories::in_memory(Arc::new(InMemoryStore::new()));
        let feeds = FeedService::new(
            repos.posts.clone(),
            repos.categories.clone(),
            repos.users.clone(),
        );
        Fixture { repos, feeds }
    }

    impl Fixture {
        async fn user(&self, username: &str) -> User {
            self.repos
                .users
                .create(User::new(username.into(), String::new(), "hash".into()))
                .await
                .unwrap()
        }

        async fn category(&self, slug: &str, is_published: bool) -> Category {
            self.repos
                .categories
                .create(NewCategory {
                    title: slug.into(),
                    description: "d".into(),
                    slug: slug.into(),
                    is_published,
                })
                .await
                .unwrap()
        }

        async fn post(
            &self,
            author: &User,
            category: &Category,
            is_published: bool,
            pub_date: DateTime<Utc>,
        ) -> i64 {
            self.repos
                .posts
                .create(
                    author.id,
                    PostDraft {
                        title: "t".into(),
                        text: "x".into(),
                        pub_date,
                        is_published,
                        category_id: Some(category.id),
                        location_id: None,
                        image: None,
                    },
                )
                .await
                .unwrap()
                .id
        }
    }

    fn ids(page: &Page<PostView>) -> Vec<i64> {
        page.items.iter().map(|v| v.post.id).collect()
    }

    #[tokio::test]
    async fn scheduled_post_joins_home_feed_when_due() {
        let f = fixture();
        let ann = f.user("ann").await;
        let travel = f.category("travel", true).await;
        let now = Utc::now();
        let due = now + Duration::days(365);
        let scheduled = f.post(&ann, &travel, true, due).await;

        let today = f.feeds.home_at(now, PageRequest::new(1)).await.unwrap();
        assert!(!ids(&today).contains(&scheduled));

        let next_year = f.feeds.home_at(due, PageRequest::new(1)).await.unwrap();
        assert!(ids(&next_year).contains(&scheduled));
    }

    #[tokio::test]
    async fn home_feed_skips_unpublished_categories() {
        let f = fixture();
        let ann = f.user("ann").await;
        let open = f.category("open", true).await;
        let closed = f.category("closed", false).await;
        let past = Utc::now() - Duration::hours(1);
        let visible = f.post(&ann, &open, true, past).await;
        f.post(&ann, &closed, true, past).await;

        let feed = f.feeds.home(PageRequest::new(1)).await.unwrap();
        assert_eq!(ids(&feed), vec![visible]);
    }

    #[tokio::test]
    async fn profile_owner_sees_drafts() {
        let f = fixture();
        let ann = f.user("ann").await;
        let bob = f.user("bob").await;
        let travel = f.category("travel", true).await;
        let past = Utc::now() - Duration::hours(1);
        let public = f.post(&ann, &travel, true, past).await;
        let draft = f.post(&ann, &travel, false, past).await;

        let (_, own) = f
            .feeds
            .profile("ann", Some(ann.id), PageRequest::new(1))
            .await
            .unwrap();
        let (_, seen_by_bob) = f
            .feeds
            .profile("ann", Some(bob.id), PageRequest::new(1))
            .await
            .unwrap();

        assert_eq!(own.total, 2);
        assert!(ids(&own).contains(&draft));
        assert_eq!(ids(&seen_by_bob), vec![public]);
    }

    #[tokio::test]
    async fn unknown_profile_is_not_found() {
        let f = fixture();
        assert!(matches!(
            f.feeds.profile("ghost", None, PageRequest::new(1)).await,
            Err(DomainError::UserNotFound(_))
        ));
    }

    #[tokio::test]
    async fn unpublished_category_is_not_found() {
        let f = fixture();
        f.category("closed", false).await;

        assert!(matches!(
            f.feeds.category("closed", PageRequest::new(1)).await,
            Err(DomainError::CategoryNotFound(_))
        ));
        assert!(matches!(
            f.feeds.category("missing", PageRequest::new(1)).await,
            Err(DomainError::CategoryNotFound(_))
        ));
    }

    #[tokio::test]
    async fn pages_past_the_end_are_not_found() {
        let f = fixture();
        assert!(f.feeds.home(PageRequest::new(1)).await.is_ok());
        assert!(matches!(
            f.feeds.home(PageRequest::new(2)).await,
            Err(DomainError::InvalidPage(_))
        ));
    }
}
