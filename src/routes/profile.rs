use crate::auth::AuthenticatedUserId;
use actix_web::{HttpResponse, Responder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user_id: i32,
}

/// Returns the id of the authenticated caller.
pub async fn profile(user_id: AuthenticatedUserId) -> impl Responder {
    HttpResponse::Ok().json(ProfileResponse { user_id: user_id.0 })
}
