use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{Cursor, SortOrder, Task};

/// Read side of the task collection as the pager sees it.
///
/// Every call is scoped to a single owner.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn count(&self, owner_id: &str) -> Result<u64, AppError>;

    /// Up to `limit` tasks strictly after `after` in `order`, ordered by
    /// `(created_at, id)`.
    async fn scan(
        &self,
        owner_id: &str,
        after: Option<&Cursor>,
        order: SortOrder,
        limit: u32,
    ) -> Result<Vec<Task>, AppError>;
}

#[derive(Clone)]
pub struct SqliteTaskStore {
    db: SqlitePool,
}

impl SqliteTaskStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn count(&self, owner_id: &str) -> Result<u64, AppError> {
        let count = repository::count_tasks(&self.db, owner_id).await?;
        u64::try_from(count).map_err(|_| AppError::InternalServerError)
    }

    async fn scan(
        &self,
        owner_id: &str,
        after: Option<&Cursor>,
        order: SortOrder,
        limit: u32,
    ) -> Result<Vec<Task>, AppError> {
        Ok(repository::scan_tasks(&self.db, owner_id, after, order, limit).await?)
    }
}
