use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::domain::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("user already exists: {0}")]
    UserAlreadyExists(String),
    #[error("post not found: {0}")]
    PostNotFound(i64),
    #[error("comment not found: {0}")]
    CommentNotFound(i64),
    #[error("category not found: {0}")]
    CategoryNotFound(String),
    #[error("category already exists: {0}")]
    CategoryAlreadyExists(String),
    #[error("location not found: {0}")]
    LocationNotFound(i64),
    #[error("invalid page: {0}")]
    InvalidPage(String),
    #[error("not found: {0}")]
    RouteNotFound(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::UserNotFound(_)
            | DomainError::PostNotFound(_)
            | DomainError::CommentNotFound(_)
            | DomainError::CategoryNotFound(_)
            | DomainError::LocationNotFound(_)
            | DomainError::InvalidPage(_)
            | DomainError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            DomainError::UserAlreadyExists(_) | DomainError::CategoryAlreadyExists(_) => {
                StatusCode::CONFLICT
            }
            DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Storage failures stay opaque to clients.
        let message = match self {
            DomainError::Internal(_) => "internal error".to_string(),
            _ => self.to_string(),
        };
        let details = match self {
            DomainError::PostNotFound(id)
            | DomainError::CommentNotFound(id)
            | DomainError::LocationNotFound(id) => Some(json!({ "resource": id })),
            DomainError::UserNotFound(name) | DomainError::CategoryNotFound(name) => {
                Some(json!({ "resource": name }))
            }
            DomainError::Validation(errors) => Some(json!({ "fields": errors })),
            _ => None,
        };
        let body = ErrorBody {
            error: message.as_str(),
            details,
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
