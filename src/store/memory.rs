use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

use crate::error::AppError;
use crate::models::{NewTask, Task, User};
use crate::store::CredentialStore;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    tasks: Vec<Task>,
    next_user_id: i32,
    next_task_id: i32,
}

/// In-process [`CredentialStore`] with the same constraints as the SQL
/// schema: unique usernames, tasks must reference an existing user, ids
/// assigned in increasing order starting at 1.
///
/// The lock is taken once per operation, which gives every call the same
/// per-row atomicity a single SQL statement has.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables
            .lock()
            .map_err(|_| AppError::DatabaseError("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn create_user(&self, username: &str, password: &str) -> Result<User, AppError> {
        let mut tables = self.lock()?;
        if tables.users.iter().any(|user| user.username == username) {
            return Err(AppError::Conflict("User already exists".into()));
        }

        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            username: username.to_string(),
            password: password.to_string(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let tables = self.lock()?;
        Ok(tables
            .users
            .iter()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn create_task(&self, task: NewTask) -> Result<Task, AppError> {
        let mut tables = self.lock()?;
        if !tables.users.iter().any(|user| user.id == task.user_id) {
            return Err(AppError::DatabaseError(format!(
                "task owner {} does not exist",
                task.user_id
            )));
        }

        tables.next_task_id += 1;
        let task = task.into_task(tables.next_task_id);
        tables.tasks.push(task.clone());
        Ok(task)
    }

    async fn tasks_for_user(&self, user_id: i32) -> Result<Vec<Task>, AppError> {
        let tables = self.lock()?;
        Ok(tables
            .tasks
            .iter()
            .filter(|task| task.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_task(&self, id: i32, user_id: i32, completed: bool) -> Result<bool, AppError> {
        let mut tables = self.lock()?;
        match tables
            .tasks
            .iter_mut()
            .find(|task| task.id == id && task.user_id == user_id)
        {
            Some(task) => {
                task.completed = completed;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_task(&self, id: i32, user_id: i32) -> Result<bool, AppError> {
        let mut tables = self.lock()?;
        let before = tables.tasks.len();
        tables
            .tasks
            .retain(|task| !(task.id == id && task.user_id == user_id));
        Ok(tables.tasks.len() < before)
    }
}
