pub mod repository;
pub mod store;

use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::error::AppError;

pub use store::{SqliteTaskStore, TaskStore};

/// Fixed-width UTC text so that SQLite's text comparison is chronological.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

pub fn encode_timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Current time at the precision the database keeps.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Opens the pool and brings the schema up to date.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("database ready at {}", database_url);

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_encoded_timestamps_sort_like_time() {
        let early = Utc.timestamp_opt(1_700_000_000, 5_000).unwrap();
        let later = Utc.timestamp_opt(1_700_000_000, 500_000_000).unwrap();
        let latest = Utc.timestamp_opt(1_700_000_001, 0).unwrap();

        let encoded = [early, later, latest].map(|t| encode_timestamp(&t));
        assert!(encoded[0] < encoded[1]);
        assert!(encoded[1] < encoded[2]);
        assert_eq!(encoded[2], "2023-11-14T22:13:21.000000Z");
    }

    #[test]
    fn test_now_keeps_microseconds_only() {
        let t = now();
        assert_eq!(t.timestamp_subsec_nanos() % 1_000, 0);
    }
}
