//! Store tests against a real PostgreSQL database.
//!
//! Ignored by default. Run with `DATABASE_URL` pointing at a scratch
//! database and `cargo test -- --ignored`.

use dotenv::dotenv;
use sqlx::PgPool;
use todo_list::error::AppError;
use todo_list::models::NewTask;
use todo_list::store::{postgres, CredentialStore, PgStore};

async fn test_store() -> PgStore {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB");
    postgres::migrate(&pool)
        .await
        .expect("Failed to apply migrations");
    PgStore::new(pool)
}

async fn cleanup_user(store: &PgStore, username: &str) {
    let _ = sqlx::query("DELETE FROM users WHERE username = $1")
        .bind(username)
        .execute(store.pool())
        .await;
}

#[ignore]
#[actix_rt::test]
async fn test_duplicate_username_is_a_conflict() {
    let store = test_store().await;
    cleanup_user(&store, "pg_dup_user").await;

    store.create_user("pg_dup_user", "hash").await.unwrap();
    let second = store.create_user("pg_dup_user", "hash").await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    cleanup_user(&store, "pg_dup_user").await;
}

#[ignore]
#[actix_rt::test]
async fn test_owner_scoped_mutations() {
    let store = test_store().await;
    cleanup_user(&store, "pg_owner").await;
    cleanup_user(&store, "pg_intruder").await;

    let owner = store.create_user("pg_owner", "hash").await.unwrap();
    let intruder = store.create_user("pg_intruder", "hash").await.unwrap();

    let task = store
        .create_task(NewTask {
            title: "buy milk".to_string(),
            completed: false,
            user_id: owner.id,
        })
        .await
        .unwrap();

    assert!(!store.update_task(task.id, intruder.id, true).await.unwrap());
    assert!(!store.delete_task(task.id, intruder.id).await.unwrap());
    assert!(store.tasks_for_user(intruder.id).await.unwrap().is_empty());

    assert!(store.update_task(task.id, owner.id, true).await.unwrap());
    let tasks = store.tasks_for_user(owner.id).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert!(tasks[0].completed);

    assert!(store.delete_task(task.id, owner.id).await.unwrap());

    cleanup_user(&store, "pg_owner").await;
    cleanup_user(&store, "pg_intruder").await;
}

#[ignore]
#[actix_rt::test]
async fn test_task_owner_must_exist() {
    let store = test_store().await;

    let result = store
        .create_task(NewTask {
            title: "orphan".to_string(),
            completed: false,
            user_id: -1,
        })
        .await;
    assert!(matches!(result, Err(AppError::DatabaseError(_))));
}
