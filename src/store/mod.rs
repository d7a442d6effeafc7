//! Persistence of users and tasks.
//!
//! [`CredentialStore`] is the capability the service layer depends on.
//! [`PgStore`] backs it with PostgreSQL, [`MemoryStore`] keeps everything in
//! process memory for tests and database-less local runs.
//!
//! Every task query and mutation is scoped by owner in a single operation,
//! so ownership never depends on a separate check-then-act step.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{NewTask, Task, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Inserts a user. Fails with `AppError::Conflict` if the username is
    /// already taken.
    async fn create_user(&self, username: &str, password: &str) -> Result<User, AppError>;

    /// Exact-match lookup by username.
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Persists `task` and returns it with its assigned id.
    async fn create_task(&self, task: NewTask) -> Result<Task, AppError>;

    /// All tasks owned by `user_id`, in ascending id order.
    async fn tasks_for_user(&self, user_id: i32) -> Result<Vec<Task>, AppError>;

    /// Sets `completed` on the task matching both `id` and `user_id`.
    /// Returns `false` when no such task exists.
    async fn update_task(&self, id: i32, user_id: i32, completed: bool) -> Result<bool, AppError>;

    /// Deletes the task matching both `id` and `user_id`.
    /// Returns `false` when no such task exists.
    async fn delete_task(&self, id: i32, user_id: i32) -> Result<bool, AppError>;
}
