use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A registered user. `password` holds the stored bcrypt hash and is never
/// serialized.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

/// Body of `POST /register` and `POST /login`. Only registration validates
/// it; the password is opaque.
#[derive(Debug, Deserialize, Validate)]
pub struct Credentials {
    #[validate(length(min = 1))]
    pub username: String,
    pub password: String,
}
