pub mod auth;
pub mod health;
pub mod profile;
pub mod tasks;

use actix_web::web;

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers every route. `/health`, `/register` and `/login` are public;
/// `/profile` and `/tasks` sit behind [`AuthMiddleware`].
///
/// The app must provide `web::Data<TaskService>` and
/// `web::Data<dyn TokenService>`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid request body: {}", err)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid path: {}", err)).into()
    }))
    .service(health::health)
    .service(auth::register)
    .service(auth::login)
    .service(
        web::resource("/profile")
            .wrap(AuthMiddleware)
            .route(web::get().to(profile::profile)),
    )
    .service(
        web::scope("/tasks")
            .wrap(AuthMiddleware)
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}
