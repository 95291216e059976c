use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{AuthGate, SessionAuthGate};
use crate::db::{SqliteTaskStore, TaskStore};
use crate::services::TaskPager;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub auth: Arc<dyn AuthGate>,
    pub pager: TaskPager,
}

impl AppState {
    /// Wires the SQLite-backed collaborators around one pool.
    pub fn new(db: SqlitePool) -> Self {
        let store: Arc<dyn TaskStore> = Arc::new(SqliteTaskStore::new(db.clone()));
        Self {
            auth: Arc::new(SessionAuthGate::new(db.clone())),
            pager: TaskPager::new(store),
            db,
        }
    }
}
