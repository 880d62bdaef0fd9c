use crate::app;
use crate::application::Services;
use crate::infrastructure::config::AppConfig;
use actix_cors::Cors;
use actix_web::HttpServer;
use actix_web::middleware::Logger;
use tracing::info;

pub async fn start_http_server(services: Services, config: AppConfig) -> anyhow::Result<()> {
    let bind_address = (config.host.clone(), config.port);

    info!(host = %bind_address.0, port = bind_address.1, "HTTP server starting");

    HttpServer::new(move || {
        app(services.clone())
            .wrap(Logger::default())
            .wrap(build_cors(&config))
    })
    .bind(bind_address)?
    .run()
    .await
    .map_err(anyhow::Error::new)?;

    Ok(())
}

pub fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .max_age(3600);

    if config.cors_origins.iter().any(|origin| origin == "*") {
        return cors.allow_any_origin();
    }

    cors = cors.supports_credentials();
    for origin in &config.cors_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header;
    use actix_web::{App, HttpResponse, test, web};

    fn config(origins: &[&str]) -> AppConfig {
        AppConfig {
            host: "127.0.0.1".into(),
            port: 8080,
            database_url: None,
            db_max_connections: 5,
            jwt_secret: "secret".into(),
            jwt_ttl_hours: 24,
            cors_origins: origins.iter().map(|o| o.to_string()).collect(),
        }
    }

    #[actix_web::test]
    async fn listed_origin_is_echoed_back() {
        let app = test::init_service(
            App::new()
                .wrap(build_cors(&config(&["https://blogicum.example"])))
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "https://blogicum.example"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("https://blogicum.example")
        );
    }
}
