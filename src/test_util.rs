//! Shared fixtures for service tests: an in-memory database with the full
//! schema applied, plus row seeding shortcuts.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::database::{admin_repo, user_repo};

pub async fn test_pool() -> SqlitePool {
    // A single connection keeps every query on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite pool");
    sqlx::migrate!().run(&pool).await.expect("migrations");
    pool
}

pub async fn seed_user(pool: &SqlitePool, matric: &str, verified: bool) -> i64 {
    user_repo::insert_user(
        pool,
        user_repo::NewUser {
            name: "Test Student",
            matric,
            email: &format!("{}@student.utem.edu.my", matric.to_lowercase()),
            password_hash: "not-a-real-hash",
            program: "BITA",
            batch: Some("2025"),
            is_verified: verified,
        },
    )
    .await
    .expect("seed user")
}

pub async fn seed_admin(pool: &SqlitePool, role: &str) -> i64 {
    let id = admin_repo::insert(
        pool,
        "Test Admin",
        &format!("admin{}@portal.edu", rand::random::<u32>()),
        "not-a-real-hash",
        role,
    )
    .await
    .expect("seed admin");
    id
}
