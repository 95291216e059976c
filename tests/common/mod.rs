#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::SqlitePool;

use todo_api::db::{self, encode_timestamp};

pub async fn setup_test_db() -> SqlitePool {
    db::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to create test db")
}

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

pub async fn insert_user(db: &SqlitePool, id: &str) {
    let stamp = encode_timestamp(&db::now());
    sqlx::query(
        r#"
        INSERT INTO users (id, name, email, image, email_verified, created_at, updated_at)
        VALUES (?1, ?1, ?2, NULL, 1, ?3, ?3)
        "#,
    )
    .bind(id)
    .bind(format!("{id}@example.com"))
    .bind(&stamp)
    .execute(db)
    .await
    .expect("Failed to insert user");
}

/// Issues a session the way the auth service would and returns its token.
pub async fn insert_session(db: &SqlitePool, user_id: &str) -> String {
    let token = format!("token-{user_id}");
    let issued = db::now();
    sqlx::query(
        r#"
        INSERT INTO sessions (id, token, user_id, expires_at, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?5)
        "#,
    )
    .bind(format!("session-{user_id}"))
    .bind(&token)
    .bind(user_id)
    .bind(encode_timestamp(&(issued + Duration::days(7))))
    .bind(encode_timestamp(&issued))
    .execute(db)
    .await
    .expect("Failed to insert session");
    token
}
