use crate::application::feed_service::FeedService;
use crate::domain::error::DomainError;
use crate::domain::query::PageRequest;
use crate::presentation::dto::{CategoryFeedResponse, PageQuery, Profile, ProfileResponse};
use crate::presentation::utils::{Viewer, request_id};
use actix_web::{HttpRequest, HttpResponse, get, web};
use tracing::debug;

#[get("/")]
pub async fn index(
    req: HttpRequest,
    feeds: web::Data<FeedService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, DomainError> {
    let page = PageRequest::parse(query.page.as_deref())?;
    let posts = feeds.home(page).await?;

    debug!(
        request_id = %request_id(&req),
        page = posts.number,
        total = posts.total,
        "home feed served"
    );

    Ok(HttpResponse::Ok().json(posts))
}

#[get("/category/{slug}/")]
pub async fn category_posts(
    req: HttpRequest,
    feeds: web::Data<FeedService>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, DomainError> {
    let slug = path.into_inner();
    let page = PageRequest::parse(query.page.as_deref())?;
    let (category, posts) = feeds.category(&slug, page).await?;

    debug!(
        request_id = %request_id(&req),
        slug = %slug,
        page = posts.number,
        "category feed served"
    );

    Ok(HttpResponse::Ok().json(CategoryFeedResponse { category, posts }))
}

/// The owner sees every post of their own; everybody else gets the public feed.
#[get("/profile/{username}/")]
pub async fn profile(
    req: HttpRequest,
    viewer: Viewer,
    feeds: web::Data<FeedService>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, DomainError> {
    let username = path.into_inner();
    let page = PageRequest::parse(query.page.as_deref())?;
    let (user, posts) = feeds.profile(&username, viewer.id(), page).await?;

    debug!(
        request_id = %request_id(&req),
        username = %username,
        own = viewer.id() == Some(user.id),
        "profile feed served"
    );

    Ok(HttpResponse::Ok().json(ProfileResponse {
        profile: Profile::from(&user),
        posts,
    }))
}
