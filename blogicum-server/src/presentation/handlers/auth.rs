use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::presentation::utils::request_id;
use actix_web::{HttpRequest, HttpResponse, Responder, Scope, post, web};
use tracing::info;

pub fn scope() -> Scope {
    web::scope("/auth").service(register).service(login)
}

#[post("/registration/")]
async fn register(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: web::Json<RegisterRequest>,
) -> Result<impl Responder, DomainError> {
    let (username, email, password) = payload.into_inner().validate()?;
    let user = service.register(username, email, password).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        username = %user.username,
        "user registered"
    );

    let jwt = service.issue_token(&user)?;
    Ok(HttpResponse::Created().json(AuthResponse::bearer(
        jwt,
        service.keys().ttl_seconds(),
    )))
}

#[post("/login/")]
async fn login(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, DomainError> {
    let jwt = service.login(&payload.username, &payload.password).await?;

    info!(
        request_id = %request_id(&req),
        username = %payload.username,
        "user logged in"
    );

    Ok(HttpResponse::Ok().json(AuthResponse::bearer(
        jwt,
        service.keys().ttl_seconds(),
    )))
}
