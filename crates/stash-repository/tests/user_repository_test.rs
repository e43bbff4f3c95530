//! Integration tests for SqliteUserRepository against an in-memory database.

mod common;

use common::TestDatabase;
use stash_core::{User, UserId};
use stash_repository::{DatabasePoolInterface, SqliteUserRepository, UserRepository};

#[tokio::test]
async fn test_seeded_users_are_found() {
    let db = TestDatabase::new().await;
    let repo = SqliteUserRepository::new(db.pool());

    let kirrik = repo
        .find_by_id(UserId::new(1))
        .await
        .expect("Query failed")
        .expect("User not found");
    assert_eq!(kirrik, User::new(1, Some("Kirrik".to_string()), 23));

    let maximka = repo
        .find_by_id(UserId::new(2))
        .await
        .expect("Query failed")
        .expect("User not found");
    assert_eq!(maximka, User::new(2, Some("Maximka".to_string()), 32));
}

#[tokio::test]
async fn test_find_by_id_not_found() {
    let db = TestDatabase::new().await;
    let repo = SqliteUserRepository::new(db.pool());

    let result = repo.find_by_id(UserId::new(999)).await.expect("Query failed");
    assert!(result.is_none());
}

#[tokio::test]
async fn test_negative_id_is_a_plain_miss() {
    let db = TestDatabase::new().await;
    let repo = SqliteUserRepository::new(db.pool());

    let result = repo.find_by_id(UserId::new(-1)).await.expect("Query failed");
    assert!(result.is_none());
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let db = TestDatabase::new().await;
    let pool = db.pool();

    pool.run_migrations().await.expect("Second migration run failed");
    pool.run_migrations().await.expect("Third migration run failed");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool.inner())
        .await
        .expect("Count failed");
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_null_name_round_trips() {
    let db = TestDatabase::new().await;
    let pool = db.pool();

    sqlx::query("INSERT INTO users (id, name, age) VALUES (3, NULL, 50)")
        .execute(pool.inner())
        .await
        .expect("Insert failed");

    let repo = SqliteUserRepository::new(pool);
    let user = repo
        .find_by_id(UserId::new(3))
        .await
        .expect("Query failed")
        .expect("User not found");
    assert_eq!(user.name, None);
    assert_eq!(user.age, 50);
}

#[tokio::test]
async fn test_health_check() {
    let db = TestDatabase::new().await;
    db.pool().health_check().await.expect("Health check failed");
}

#[tokio::test]
async fn test_closed_pool_surfaces_database_error() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let repo = SqliteUserRepository::new(pool.clone());

    pool.close().await;

    let err = repo.find_by_id(UserId::new(1)).await.unwrap_err();
    assert!(matches!(err, stash_core::StashError::Database(_)));
}
