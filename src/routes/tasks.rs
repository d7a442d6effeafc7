use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{NewTask, TaskInput, TaskUpdate},
    service::TaskService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

/// Body returned by successful update and delete calls.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Retrieves the tasks of the authenticated user, ordered by id.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects.
/// - `401 Unauthorized`: missing or invalid token.
/// - `500 Internal Server Error`: storage failure.
#[get("")]
pub async fn get_tasks(
    service: web::Data<TaskService>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let tasks = service.get_tasks(user_id.0).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task for the authenticated user.
///
/// The owner always comes from the token, never from the body.
///
/// ## Request Body:
/// - `title`: any string (required).
/// - `completed` (optional): defaults to `false`.
///
/// ## Responses:
/// - `201 Created`: the created `Task`.
/// - `400 Bad Request`: malformed body.
/// - `401 Unauthorized`: missing or invalid token.
/// - `500 Internal Server Error`: storage failure.
#[post("")]
pub async fn create_task(
    service: web::Data<TaskService>,
    user_id: AuthenticatedUserId,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = service
        .create_task(NewTask::new(task_data.into_inner(), user_id.0))
        .await?;

    Ok(HttpResponse::Created().json(task))
}

/// Sets the completion flag of a task the caller owns.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Task updated"}`.
/// - `400 Bad Request`: malformed body or non-integer id.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: the task does not exist or is owned by someone else.
/// - `500 Internal Server Error`: storage failure.
#[put("/{id}")]
pub async fn update_task(
    service: web::Data<TaskService>,
    user_id: AuthenticatedUserId,
    task_id: web::Path<i32>,
    update: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    let updated = service
        .update_task(task_id.into_inner(), user_id.0, update.completed)
        .await?;

    if !updated {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Task updated".to_string(),
    }))
}

/// Deletes a task the caller owns.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Task deleted"}`.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: the task does not exist, is owned by someone else, or
///   the id is not a valid integer.
/// - `500 Internal Server Error`: storage failure.
#[delete("/{id}")]
pub async fn delete_task(
    service: web::Data<TaskService>,
    user_id: AuthenticatedUserId,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let deleted = match task_id.parse::<i32>() {
        Ok(id) => service.delete_task(id, user_id.0).await?,
        Err(_) => {
            log::warn!("Delete of unparseable task id {:?} by user {}", task_id.as_str(), user_id.0);
            false
        }
    };

    if !deleted {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Task deleted".to_string(),
    }))
}
