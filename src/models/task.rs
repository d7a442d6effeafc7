use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskInput {
    /// The title of the task. Any string is accepted, including `""`.
    pub title: String,

    /// Whether the task is already done. Defaults to `false` when omitted.
    #[serde(default)]
    pub completed: bool,
}

/// Body of `PUT /tasks/{id}`. Only the completion flag can change.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub completed: bool,
}

/// Represents a task entity as stored in the database and returned by the API.
///
/// The owner is never serialized; clients only ever see their own tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Identifier assigned by the store.
    pub id: i32,
    /// The title of the task.
    pub title: String,
    /// Completion flag, the only mutable field.
    pub completed: bool,
    /// Identifier of the user who owns the task.
    #[serde(skip)]
    pub user_id: i32,
}

/// A task that has not been persisted yet. The owner is always set by the
/// caller from the authenticated identity, never from the request body.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub completed: bool,
    pub user_id: i32,
}

impl NewTask {
    /// Creates a `NewTask` owned by `user_id` from the request body.
    pub fn new(input: TaskInput, user_id: i32) -> Self {
        Self {
            title: input.title,
            completed: input.completed,
            user_id,
        }
    }

    /// Attaches the identifier assigned by the store.
    pub fn into_task(self, id: i32) -> Task {
        Task {
            id,
            title: self.title,
            completed: self.completed,
            user_id: self.user_id,
        }
    }
}
