use crate::{error::AppError, models::Credentials, service::TaskService};
use actix_web::{post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body returned by `/register` and `/login`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed identity token, valid for 24 hours.
    pub token: String,
}

/// Register a new user
///
/// ## Responses:
/// - `201 Created`: `{"token": "..."}` for the new account.
/// - `400 Bad Request`: malformed body or empty username.
/// - `409 Conflict`: the username is taken.
/// - `500 Internal Server Error`: storage failure.
#[post("/register")]
pub async fn register(
    service: web::Data<TaskService>,
    credentials: web::Json<Credentials>,
) -> Result<impl Responder, AppError> {
    credentials.validate()?;

    match service
        .register(&credentials.username, &credentials.password)
        .await?
    {
        Some(token) => Ok(HttpResponse::Created().json(TokenResponse { token })),
        None => Err(AppError::Conflict("User already exists".into())),
    }
}

/// Login user
///
/// ## Responses:
/// - `200 OK`: `{"token": "..."}`.
/// - `400 Bad Request`: malformed body.
/// - `401 Unauthorized`: unknown username or wrong password, including
///   empty ones.
/// - `500 Internal Server Error`: storage failure.
#[post("/login")]
pub async fn login(
    service: web::Data<TaskService>,
    credentials: web::Json<Credentials>,
) -> Result<impl Responder, AppError> {
    match service
        .login(&credentials.username, &credentials.password)
        .await?
    {
        Some(token) => Ok(HttpResponse::Ok().json(TokenResponse { token })),
        None => Err(AppError::Unauthorized("Invalid credentials".into())),
    }
}
