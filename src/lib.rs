#![doc = "The `todo_list` library crate."]
#![doc = ""]
#![doc = "Contains the domain models, token authentication, the task service, the"]
#![doc = "storage backends, the route table and the server factory used by the"]
#![doc = "binary (`main.rs`) and by the integration tests."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod service;
pub mod store;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;

use crate::auth::TokenService;
use crate::service::TaskService;

/// Builds the HTTP server on an already bound `listener`.
///
/// On SIGINT/SIGTERM the server stops accepting connections and gives
/// in-flight requests `shutdown_timeout_secs` to finish before they are
/// dropped.
pub fn run(
    listener: TcpListener,
    service: TaskService,
    shutdown_timeout_secs: u64,
) -> std::io::Result<Server> {
    let tokens: web::Data<dyn TokenService> = web::Data::from(service.tokens());
    let service = web::Data::new(service);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(tokens.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .shutdown_timeout(shutdown_timeout_secs)
    .listen(listener)?
    .run();

    Ok(server)
}
