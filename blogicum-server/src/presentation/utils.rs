use actix_web::dev::Payload;
use actix_web::http::{StatusCode, header};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError};
use futures_util::future::{Ready, ready};
use tracing::info;
use uuid::Uuid;

use crate::domain::comment::Comment;
use crate::domain::ownership::{Access, Owned, authorize_mutation};
use crate::domain::post::Post;
use crate::domain::user::User;
use crate::presentation::middleware::RequestId;
use crate::presentation::routes::Route;

/// A signed-in user. Extracting it on an anonymous request redirects to login.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Answers an anonymous request for a members-only route with a redirect to
/// the login page, carrying the original path and query as `next`.
#[derive(Debug, thiserror::Error)]
#[error("authentication required")]
pub struct LoginRequired {
    pub next: String,
}

impl ResponseError for LoginRequired {
    fn status_code(&self) -> StatusCode {
        StatusCode::FOUND
    }

    fn error_response(&self) -> HttpResponse {
        redirect(Route::Login {
            next: self.next.clone(),
        })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = LoginRequired;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(LoginRequired {
                next: full_path(req),
            })),
        }
    }
}

/// Whoever is asking, signed in or not.
#[derive(Debug, Clone, Default)]
pub struct Viewer(pub Option<AuthenticatedUser>);

impl Viewer {
    pub fn id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|user| user.id)
    }
}

impl FromRequest for Viewer {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(Viewer(req.extensions().get::<AuthenticatedUser>().cloned())))
    }
}

/// Where a refused mutation sends the actor.
pub trait OnDenied {
    fn on_denied(&self) -> Route;
}

impl OnDenied for Post {
    fn on_denied(&self) -> Route {
        Route::PostDetail(self.id)
    }
}

impl OnDenied for Comment {
    fn on_denied(&self) -> Route {
        Route::Index
    }
}

/// `Err` carries the redirect to answer with instead of mutating.
pub fn ensure_owner<E>(entity: &E, user: &AuthenticatedUser) -> Result<(), HttpResponse>
where
    E: Owned + OnDenied,
{
    match authorize_mutation(entity, user.id) {
        Access::Allow => Ok(()),
        Access::Deny => {
            let target = entity.on_denied();
            info!(username = %user.username, redirect = %target, "mutation denied");
            Err(redirect(target))
        }
    }
}

pub fn redirect(route: Route) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, route.path()))
        .finish()
}

pub fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}

fn full_path(req: &HttpRequest) -> String {
    req.uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.path().to_string())
}
