use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::Arc;

use todo_list::auth::JwtService;
use todo_list::config::Config;
use todo_list::service::TaskService;
use todo_list::store::{postgres, PgStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::var("CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.yaml"));
    let config = Config::load(&config_path).map_err(|e| {
        log::error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let pool = postgres::connect(&config.database).await.map_err(|e| {
        log::error!("Failed to connect to database: {}", e);
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e)
    })?;

    if config.database.run_migrations {
        postgres::migrate(&pool).await.map_err(|e| {
            log::error!("Failed to apply migrations: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e)
        })?;
        log::info!("Migrations applied");
    }

    let service = TaskService::new(
        Arc::new(PgStore::new(pool.clone())),
        Arc::new(JwtService::new(&config.auth.jwt_secret)),
        config.auth.bcrypt_cost,
    );

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port))?;
    log::info!("Starting server at {}", config.server_url());

    let result = todo_list::run(listener, service, config.server.shutdown_timeout_secs)?.await;
    if let Err(e) = &result {
        log::error!("Server error during shutdown: {}", e);
    }

    pool.close().await;
    log::info!("Server stopped");
    Ok(())
}
