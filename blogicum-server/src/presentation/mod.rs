pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod utils;

use actix_web::web;

use crate::application::Services;
use crate::domain::error::DomainError;
use crate::domain::validation::FieldErrors;
use crate::presentation::handlers::{auth, comment, feed, pages, post, profile};

/// Registers services, body limits and every route of the site.
pub fn configure(services: &Services, cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::Data::new(services.auth.clone()))
        .app_data(web::Data::new(services.users.clone()))
        .app_data(web::Data::new(services.feeds.clone()))
        .app_data(web::Data::new(services.posts.clone()))
        .app_data(web::Data::new(services.comments.clone()))
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            DomainError::Validation(FieldErrors::non_field(err.to_string())).into()
        }))
        .service(feed::index)
        .service(feed::category_posts)
        .service(feed::profile)
        .service(post::create_post_form)
        .service(post::create_post)
        .service(post::post_detail)
        .service(post::edit_post_form)
        .service(post::update_post)
        .service(post::delete_post)
        .service(comment::add_comment)
        .service(comment::edit_comment_form)
        .service(comment::update_comment)
        .service(comment::delete_comment)
        .service(profile::edit_profile_form)
        .service(profile::edit_profile)
        .service(auth::scope())
        .service(pages::scope())
        .service(pages::health)
        .default_service(web::to(pages::not_found));
}
