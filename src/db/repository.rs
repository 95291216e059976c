use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::db::encode_timestamp;
use crate::models::{Cursor, DeletedTask, SortOrder, Task, UpdateTaskRequest, User};

const TASK_COLUMNS: &str = "id, title, completed, created_at, updated_at, owner_id";

pub async fn insert_task(
    db: &SqlitePool,
    owner_id: &str,
    title: &str,
    created_at: DateTime<Utc>,
) -> Result<Task, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let stamp = encode_timestamp(&created_at);

    sqlx::query(
        r#"
        INSERT INTO tasks
            (id, owner_id, title, completed, created_at, updated_at)
        VALUES (?1, ?2, ?3, 0, ?4, ?4)
        "#,
    )
    .bind(&id)
    .bind(owner_id)
    .bind(title)
    .bind(&stamp)
    .execute(db)
    .await?;

    Ok(Task {
        id,
        title: title.to_string(),
        completed: false,
        created_at,
        updated_at: created_at,
        owner_id: owner_id.to_string(),
    })
}

pub async fn find_task(
    db: &SqlitePool,
    owner_id: &str,
    id: &str,
) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1 AND owner_id = ?2"
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(db)
    .await
}

/// Applies the provided fields in a single statement. `None` when no task
/// owned by `owner_id` matched.
pub async fn update_task(
    db: &SqlitePool,
    owner_id: &str,
    id: &str,
    req: UpdateTaskRequest,
    updated_at: DateTime<Utc>,
) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!(
        r#"
        UPDATE tasks
        SET title = COALESCE(?1, title),
            completed = COALESCE(?2, completed),
            updated_at = ?3
        WHERE id = ?4 AND owner_id = ?5
        RETURNING {TASK_COLUMNS}
        "#
    ))
    .bind(req.title)
    .bind(req.completed)
    .bind(encode_timestamp(&updated_at))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(db)
    .await
}

/// Deletes the listed tasks that belong to `owner_id`; ids owned by anyone
/// else are left alone and simply absent from the result.
pub async fn delete_tasks(
    db: &SqlitePool,
    owner_id: &str,
    ids: &[String],
) -> Result<Vec<DeletedTask>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = QueryBuilder::<Sqlite>::new("DELETE FROM tasks WHERE owner_id = ");
    query.push_bind(owner_id);
    query.push(" AND id IN (");
    let mut list = query.separated(", ");
    for id in ids {
        list.push_bind(id.as_str());
    }
    list.push_unseparated(") RETURNING id, title");

    query.build_query_as::<DeletedTask>().fetch_all(db).await
}

pub async fn count_tasks(db: &SqlitePool, owner_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks WHERE owner_id = ?1")
        .bind(owner_id)
        .fetch_one(db)
        .await
}

/// Up to `limit` of the owner's tasks strictly after `after`, ordered by
/// `(created_at, id)` in `order`.
pub async fn scan_tasks(
    db: &SqlitePool,
    owner_id: &str,
    after: Option<&Cursor>,
    order: SortOrder,
    limit: u32,
) -> Result<Vec<Task>, sqlx::Error> {
    let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {TASK_COLUMNS} FROM tasks WHERE owner_id = "));
    query.push_bind(owner_id);

    if let Some(cursor) = after {
        let created_at = encode_timestamp(&cursor.created_at);
        let op = order.sql_comparison();
        query
            .push(" AND (created_at ")
            .push(op)
            .push(" ")
            .push_bind(created_at.clone())
            .push(" OR (created_at = ")
            .push_bind(created_at)
            .push(" AND id ")
            .push(op)
            .push(" ")
            .push_bind(cursor.id.as_str())
            .push("))");
    }

    let direction = order.sql_direction();
    query
        .push(" ORDER BY created_at ")
        .push(direction)
        .push(", id ")
        .push(direction)
        .push(" LIMIT ")
        .push_bind(i64::from(limit));

    query.build_query_as::<Task>().fetch_all(db).await
}

pub async fn find_user(db: &SqlitePool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, name, email, image, email_verified, created_at, updated_at FROM users WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

/// The user owning a live session with this token.
pub async fn find_user_by_session_token(
    db: &SqlitePool,
    token: &str,
    at: DateTime<Utc>,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT u.id, u.name, u.email, u.image, u.email_verified, u.created_at, u.updated_at
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token = ?1 AND s.expires_at > ?2
        "#,
    )
    .bind(token)
    .bind(encode_timestamp(&at))
    .fetch_optional(db)
    .await
}

pub async fn rename_user(
    db: &SqlitePool,
    id: &str,
    name: &str,
    updated_at: DateTime<Utc>,
) -> Result<Option<User>, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET name = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(name)
        .bind(encode_timestamp(&updated_at))
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    if result == 0 {
        return Ok(None);
    }
    find_user(db, id).await
}
