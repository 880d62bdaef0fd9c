pub mod auth_service;
pub mod comment_service;
pub mod feed_service;
pub mod post_service;
pub mod taxonomy_service;
pub mod user_service;

use crate::application::auth_service::AuthService;
use crate::application::comment_service::CommentService;
use crate::application::feed_service::FeedService;
use crate::application::post_service::PostService;
use crate::application::taxonomy_service::TaxonomyService;
use crate::application::user_service::UserService;
use crate::data::Repositories;
use crate::infrastructure::security::JwtKeys;

#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub users: UserService,
    pub feeds: FeedService,
    pub posts: PostService,
    pub comments: CommentService,
    pub taxonomy: TaxonomyService,
}

impl Services {
    pub fn new(repos: Repositories, keys: JwtKeys) -> Self {
        Self {
            auth: AuthService::new(repos.users.clone(), keys),
            users: UserService::new(repos.users.clone()),
            feeds: FeedService::new(
                repos.posts.clone(),
                repos.categories.clone(),
                repos.users.clone(),
            ),
            posts: PostService::new(
                repos.posts.clone(),
                repos.categories.clone(),
                repos.locations.clone(),
            ),
            comments: CommentService::new(repos.comments.clone(), repos.posts.clone()),
            taxonomy: TaxonomyService::new(repos.categories, repos.locations),
        }
    }
}
