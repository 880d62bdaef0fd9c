use crate::application::user_service::UserService;
use crate::domain::error::DomainError;
use crate::domain::validation::FieldErrors;
use crate::presentation::dto::ProfileForm;
use crate::presentation::routes::Route;
use crate::presentation::utils::{AuthenticatedUser, redirect, request_id};
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use tracing::info;

#[get("/edit_profile/")]
pub async fn edit_profile_form(
    user: AuthenticatedUser,
    users: web::Data<UserService>,
) -> Result<HttpResponse, DomainError> {
    let user = users.get_by_id(user.id).await?;
    Ok(HttpResponse::Ok().json(ProfileForm::from(&user)))
}

#[post("/edit_profile/")]
pub async fn edit_profile(
    req: HttpRequest,
    user: AuthenticatedUser,
    users: web::Data<UserService>,
    payload: web::Json<ProfileForm>,
) -> Result<HttpResponse, DomainError> {
    let update = payload.into_inner().validate()?;
    let updated = users
        .update_profile(user.id, update)
        .await
        .map_err(|err| match err {
            DomainError::UserAlreadyExists(_) => {
                let mut errors = FieldErrors::default();
                errors.add("username", "A user with that username already exists.");
                DomainError::Validation(errors)
            }
            other => other,
        })?;

    info!(
        request_id = %request_id(&req),
        user_id = %updated.id,
        username = %updated.username,
        "profile updated"
    );

    Ok(redirect(Route::Profile(updated.username)))
}
