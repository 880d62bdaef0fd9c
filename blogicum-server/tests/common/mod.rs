#![allow(dead_code)]

use std::sync::Arc;

use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use blogicum_server::application::Services;
use blogicum_server::data::Repositories;
use blogicum_server::data::memory::InMemoryStore;
use blogicum_server::domain::category::{Category, NewCategory};
use blogicum_server::domain::location::{Location, NewLocation};
use blogicum_server::domain::post::{Post, PostDraft};
use blogicum_server::domain::user::User;
use blogicum_server::infrastructure::security::JwtKeys;
use chrono::{Duration, Utc};

pub struct TestContext {
    pub repos: Repositories,
    pub services: Services,
}

/// A user with a ready-to-send bearer token.
pub struct Member {
    pub user: User,
    pub token: String,
}

impl Member {
    pub fn auth(&self) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {}", self.token))
    }
}

impl TestContext {
    pub fn new() -> Self {
        let repos = Repositories::in_memory(Arc::new(InMemoryStore::new()));
        let keys = JwtKeys::new("integration-secret".into(), 24);
        let services = Services::new(repos.clone(), keys);
        Self { repos, services }
    }

    pub async fn member(&self, username: &str) -> Member {
        let user = self
            .repos
            .users
            .create(User::new(username.into(), String::new(), "unused".into()))
            .await
            .unwrap();
        let token = self.services.auth.issue_token(&user).unwrap();
        Member { user, token }
    }

    pub async fn category(&self, slug: &str, is_published: bool) -> Category {
        self.repos
            .categories
            .create(NewCategory {
                title: format!("Category {slug}"),
                description: "about".into(),
                slug: slug.into(),
                is_published,
            })
            .await
            .unwrap()
    }

    pub async fn location(&self, name: &str) -> Location {
        self.repos
            .locations
            .create(NewLocation {
                name: name.into(),
                is_published: true,
            })
            .await
            .unwrap()
    }

    /// A published post dated an hour ago; `edit` adjusts the draft first.
    pub async fn post(
        &self,
        author: &Member,
        category: &Category,
        edit: impl FnOnce(&mut PostDraft),
    ) -> Post {
        let mut draft = PostDraft {
            title: "A post".into(),
            text: "Body".into(),
            pub_date: Utc::now() - Duration::hours(1),
            is_published: true,
            category_id: Some(category.id),
            location_id: None,
            image: None,
        };
        edit(&mut draft);
        self.repos.posts.create(author.user.id, draft).await.unwrap()
    }
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
