use crate::domain::error::DomainError;
use crate::presentation::dto::{HealthResponse, PageTitle};
use actix_web::{HttpRequest, HttpResponse, Scope, get, web};
use chrono::Utc;

pub fn scope() -> Scope {
    web::scope("/pages").service(about).service(rules)
}

#[get("/about/")]
async fn about() -> HttpResponse {
    HttpResponse::Ok().json(PageTitle {
        title: "About".to_string(),
    })
}

#[get("/rules/")]
async fn rules() -> HttpResponse {
    HttpResponse::Ok().json(PageTitle {
        title: "Rules".to_string(),
    })
}

#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    })
}

/// Fallback for every unmatched route.
pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, DomainError> {
    Err(DomainError::RouteNotFound(req.path().to_string()))
}
