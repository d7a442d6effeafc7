//! Business rules for accounts and tasks.
//!
//! `TaskService` sits between the HTTP handlers and the store. It owns
//! username uniqueness, credential checks and token issuing, and forwards
//! task operations to the store with the caller's id as the ownership scope.
//! It never authenticates requests itself; handlers pass in the id the
//! request gate established.

use std::sync::Arc;

use crate::auth::{hash_password, spawn_hash_password, spawn_verify_password, TokenService};
use crate::error::AppError;
use crate::models::{NewTask, Task};
use crate::store::CredentialStore;

pub struct TaskService {
    store: Arc<dyn CredentialStore>,
    tokens: Arc<dyn TokenService>,
    bcrypt_cost: u32,
    /// Checked against on unknown usernames so every rejected login costs
    /// one bcrypt verification.
    dummy_hash: String,
}

impl TaskService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        tokens: Arc<dyn TokenService>,
        bcrypt_cost: u32,
    ) -> Self {
        let dummy_hash = hash_password("unused login placeholder", bcrypt_cost).unwrap_or_else(|e| {
            log::error!("Failed to prepare dummy password hash: {}", e);
            String::new()
        });
        Self {
            store,
            tokens,
            bcrypt_cost,
            dummy_hash,
        }
    }

    /// The token service shared with the request gate.
    pub fn tokens(&self) -> Arc<dyn TokenService> {
        Arc::clone(&self.tokens)
    }

    /// Creates an account and returns a token for it.
    ///
    /// Returns `Ok(None)` when the username is already taken, including
    /// when a concurrent registration claims it first.
    pub async fn register(&self, username: &str, password: &str) -> Result<Option<String>, AppError> {
        if self.store.find_user_by_username(username).await?.is_some() {
            log::warn!("Registration rejected, user {} already exists", username);
            return Ok(None);
        }

        let password_hash = spawn_hash_password(password, self.bcrypt_cost).await?;
        let user = match self.store.create_user(username, &password_hash).await {
            Ok(user) => user,
            Err(AppError::Conflict(_)) => {
                log::warn!("Registration rejected, user {} already exists", username);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let token = self.tokens.issue(user.id)?;
        log::info!("User {} registered", user.id);
        Ok(Some(token))
    }

    /// Returns a token when `password` matches the stored credential, and
    /// `Ok(None)` for an unknown user or a wrong password.
    pub async fn login(&self, username: &str, password: &str) -> Result<Option<String>, AppError> {
        let user = match self.store.find_user_by_username(username).await? {
            Some(user) => user,
            None => {
                let _ = spawn_verify_password(password, &self.dummy_hash).await;
                log::warn!("Login rejected for unknown user {}", username);
                return Ok(None);
            }
        };

        if !spawn_verify_password(password, &user.password).await? {
            log::warn!("Login rejected for user {}: wrong password", user.id);
            return Ok(None);
        }

        let token = self.tokens.issue(user.id)?;
        log::info!("User {} logged in", user.id);
        Ok(Some(token))
    }

    pub async fn create_task(&self, task: NewTask) -> Result<Task, AppError> {
        let task = self.store.create_task(task).await?;
        log::info!("Task {} created for user {}", task.id, task.user_id);
        Ok(task)
    }

    pub async fn get_tasks(&self, user_id: i32) -> Result<Vec<Task>, AppError> {
        let tasks = self.store.tasks_for_user(user_id).await?;
        log::debug!("Listed {} tasks for user {}", tasks.len(), user_id);
        Ok(tasks)
    }

    /// `false` means the task does not exist or belongs to someone else;
    /// the two cases are deliberately indistinguishable.
    pub async fn update_task(&self, id: i32, user_id: i32, completed: bool) -> Result<bool, AppError> {
        let updated = self.store.update_task(id, user_id, completed).await?;
        if updated {
            log::info!("Task {} updated by user {}", id, user_id);
        } else {
            log::warn!("Task {} not found for user {}", id, user_id);
        }
        Ok(updated)
    }

    /// Same ownership semantics as [`TaskService::update_task`].
    pub async fn delete_task(&self, id: i32, user_id: i32) -> Result<bool, AppError> {
        let deleted = self.store.delete_task(id, user_id).await?;
        if deleted {
            log::info!("Task {} deleted by user {}", id, user_id);
        } else {
            log::warn!("Task {} not found for user {}", id, user_id);
        }
        Ok(deleted)
    }
}
