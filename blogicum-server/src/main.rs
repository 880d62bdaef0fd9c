use std::sync::Arc;

use anyhow::Context;
use blogicum_server::application::Services;
use blogicum_server::data::Repositories;
use blogicum_server::data::memory::InMemoryStore;
use blogicum_server::infrastructure::config::AppConfig;
use blogicum_server::infrastructure::database::{create_pool, run_migrations};
use blogicum_server::infrastructure::logging::init_logging;
use blogicum_server::infrastructure::security::JwtKeys;
use blogicum_server::utils::start_http_server;
use tracing::{info, warn};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let repos = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url, config.db_max_connections)
                .await
                .context("failed to connect to database")?;
            run_migrations(&pool)
                .await
                .context("failed to run migrations")?;
            info!("using PostgreSQL storage");
            Repositories::postgres(pool)
        }
        None => {
            warn!("DATABASE_URL is not set, data lives in memory and is lost on exit");
            Repositories::in_memory(Arc::new(InMemoryStore::new()))
        }
    };

    let keys = JwtKeys::new(config.jwt_secret.clone(), config.jwt_ttl_hours);
    let services = Services::new(repos, keys);

    start_http_server(services, config).await
}
