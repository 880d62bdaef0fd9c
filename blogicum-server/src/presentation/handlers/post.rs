use crate::application::comment_service::CommentService;
use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{PostDetailResponse, PostForm, PostFormResponse};
use crate::presentation::routes::Route;
use crate::presentation::utils::{AuthenticatedUser, Viewer, ensure_owner, redirect, request_id};
use actix_web::{Error, HttpRequest, HttpResponse, get, post, web};
use chrono::Utc;
use tracing::info;

#[get(r"/posts/{post_id:\d+}/")]
pub async fn post_detail(
    viewer: Viewer,
    posts: web::Data<PostService>,
    comments: web::Data<CommentService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let post = posts.get_visible(post_id, viewer.id()).await?;
    let comments = comments.list_for_post(post_id).await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse { post, comments }))
}

#[get("/posts/create/")]
pub async fn create_post_form(
    _user: AuthenticatedUser,
    posts: web::Data<PostService>,
) -> Result<HttpResponse, DomainError> {
    let (categories, locations) = posts.choices().await?;
    Ok(HttpResponse::Ok().json(PostFormResponse {
        form: None,
        categories,
        locations,
    }))
}

#[post("/posts/create/")]
pub async fn create_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    payload: web::Json<PostForm>,
) -> Result<HttpResponse, DomainError> {
    let draft = payload.into_inner().validate(Utc::now())?;
    let post = posts.create_post(user.id, draft).await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id = post.id,
        "post created"
    );

    Ok(redirect(Route::Profile(user.username)))
}

#[get(r"/posts/{post_id:\d+}/edit/")]
pub async fn edit_post_form(
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let post = posts.get_post(path.into_inner()).await?;
    if let Err(denied) = ensure_owner(&post, &user) {
        return Ok(denied);
    }

    let (categories, locations) = posts.choices().await?;
    Ok(HttpResponse::Ok().json(PostFormResponse {
        form: Some(PostForm::from(&post)),
        categories,
        locations,
    }))
}

#[post(r"/posts/{post_id:\d+}/edit/")]
pub async fn update_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<i64>,
    payload: Result<web::Json<PostForm>, Error>,
) -> Result<HttpResponse, Error> {
    let post = posts.get_post(path.into_inner()).await?;
    if let Err(denied) = ensure_owner(&post, &user) {
        return Ok(denied);
    }

    let draft = payload?.into_inner().validate(Utc::now())?;
    let post = posts.update_post(post.id, draft).await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id = post.id,
        "post updated"
    );

    Ok(redirect(Route::PostDetail(post.id)))
}

#[post(r"/posts/{post_id:\d+}/delete/")]
pub async fn delete_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let post = posts.get_post(path.into_inner()).await?;
    if let Err(denied) = ensure_owner(&post, &user) {
        return Ok(denied);
    }

    posts.delete_post(post.id).await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id = post.id,
        "post deleted"
    );

    Ok(redirect(Route::Profile(user.username)))
}
