use crate::application::comment_service::CommentService;
use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use crate::presentation::dto::CommentForm;
use crate::presentation::routes::Route;
use crate::presentation::utils::{AuthenticatedUser, ensure_owner, redirect, request_id};
use actix_web::{Error, HttpRequest, HttpResponse, get, post, web};
use tracing::info;

#[post(r"/posts/{post_id:\d+}/comment/")]
pub async fn add_comment(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    comments: web::Data<CommentService>,
    path: web::Path<i64>,
    payload: Result<web::Json<CommentForm>, Error>,
) -> Result<HttpResponse, Error> {
    let post_id = path.into_inner();
    posts.get_post(post_id).await?;
    let text = payload?.into_inner().validate()?;
    let comment = comments.create_comment(post_id, user.id, text).await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id,
        comment_id = comment.id,
        "comment added"
    );

    Ok(redirect(Route::PostDetail(post_id)))
}

#[get(r"/posts/{post_id:\d+}/edit_comment/{comment_id:\d+}/")]
pub async fn edit_comment_form(
    user: AuthenticatedUser,
    comments: web::Data<CommentService>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, DomainError> {
    let (post_id, comment_id) = path.into_inner();
    let comment = comments.get_for_post(post_id, comment_id).await?;
    if let Err(denied) = ensure_owner(&comment, &user) {
        return Ok(denied);
    }

    Ok(HttpResponse::Ok().json(CommentForm {
        text: Some(comment.text),
    }))
}

#[post(r"/posts/{post_id:\d+}/edit_comment/{comment_id:\d+}/")]
pub async fn update_comment(
    req: HttpRequest,
    user: AuthenticatedUser,
    comments: web::Data<CommentService>,
    path: web::Path<(i64, i64)>,
    payload: Result<web::Json<CommentForm>, Error>,
) -> Result<HttpResponse, Error> {
    let (post_id, comment_id) = path.into_inner();
    let comment = comments.get_for_post(post_id, comment_id).await?;
    if let Err(denied) = ensure_owner(&comment, &user) {
        return Ok(denied);
    }

    let text = payload?.into_inner().validate()?;
    comments.update_comment(comment.id, text).await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id,
        comment_id,
        "comment updated"
    );

    Ok(redirect(Route::PostDetail(post_id)))
}

#[post(r"/posts/{post_id:\d+}/delete_comment/{comment_id:\d+}/")]
pub async fn delete_comment(
    req: HttpRequest,
    user: AuthenticatedUser,
    comments: web::Data<CommentService>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, DomainError> {
    let (post_id, comment_id) = path.into_inner();
    let comment = comments.get_for_post(post_id, comment_id).await?;
    if let Err(denied) = ensure_owner(&comment, &user) {
        return Ok(denied);
    }

    comments.delete_comment(comment.id).await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id,
        comment_id,
        "comment deleted"
    );

    Ok(redirect(Route::Index))
}
