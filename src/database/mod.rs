//! Database handle module
//!
//! A lazily opened SQLite connection shared through `AppState`. The first caller
//! opens and pings the database; concurrent first callers block on the same
//! one-shot cell so the open runs exactly once. Request handlers never touch it.

use once_cell::sync::OnceCell;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use thiserror::Error;

use crate::logger;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("Failed to ping database: {0}")]
    Ping(#[source] rusqlite::Error),
    #[error("Failed to close database: {0}")]
    Close(#[source] rusqlite::Error),
    #[error("Database lock poisoned")]
    Poisoned,
}

/// Process-wide database handle
pub struct Database {
    path: PathBuf,
    conn: OnceCell<Mutex<Option<Connection>>>,
    #[cfg(test)]
    opens: AtomicUsize,
}

impl Database {
    /// Create the handle without opening the file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conn: OnceCell::new(),
            #[cfg(test)]
            opens: AtomicUsize::new(0),
        }
    }

    /// Open the connection on first use and return it
    pub fn connection(&self) -> Result<&Mutex<Option<Connection>>, DatabaseError> {
        self.conn.get_or_try_init(|| {
            #[cfg(test)]
            self.opens.fetch_add(1, Ordering::SeqCst);
            let conn = open_and_ping(&self.path)?;
            logger::log_info("Database connection established");
            Ok(Mutex::new(Some(conn)))
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.conn.get().is_some()
    }

    /// Number of times the open sequence has run
    #[cfg(test)]
    pub fn initializations(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Close the connection if it was ever opened
    pub fn close(&self) -> Result<(), DatabaseError> {
        let Some(cell) = self.conn.get() else {
            return Ok(());
        };
        let taken = cell
            .lock()
            .map_err(|_| DatabaseError::Poisoned)?
            .take();
        match taken {
            Some(conn) => conn.close().map_err(|(_, e)| DatabaseError::Close(e)),
            None => Ok(()),
        }
    }
}

fn open_and_ping(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open(path).map_err(|source| DatabaseError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
        .map_err(DatabaseError::Ping)?;
    Ok(conn)
}
