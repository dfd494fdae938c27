//! Shared handler state.
//!
//! # Invariants
//! - One SQLite connection per process, opened explicitly at startup.
//! - Handlers hold the lock for one unit of work and never across an await.

use planner_core::db::{open_db, open_db_in_memory, DbResult};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn in_memory() -> DbResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Runs synchronous storage work with exclusive access to the connection.
    pub async fn with_conn<T, F>(&self, work: F) -> T
    where
        F: FnOnce(&mut Connection) -> T,
    {
        let mut conn = self.db.lock().await;
        work(&mut conn)
    }
}
