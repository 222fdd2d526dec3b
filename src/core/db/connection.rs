/// Connection Management Module
///
/// This module owns the single database connection used by a run: opening
/// and validating it, handing it out to queries, and closing it.

use crate::core::{HospitalError, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Observed state of the connection after a liveness probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// The probe query succeeded
    Open,
    /// The probe query failed
    Closed,
}

/// Connection manager for database operations
///
/// The connection lives in an `Option` slot. Closing empties the slot, after
/// which every query path fails with `HospitalError::ConnectionClosed`.
#[derive(Debug)]
pub struct ConnectionManager {
    /// Active database connection (None once closed)
    connection: Option<Connection>,
    /// Path to the database file (None for in-memory databases)
    path: Option<PathBuf>,
}

impl ConnectionManager {
    /// Opens an existing SQLite database file at `db_path`.
    ///
    /// The file is opened read-write without the create flag, so a missing
    /// file is an error instead of an empty database. Foreign keys are
    /// enabled and the schema table is read to make sure the file is actually
    /// a database.
    ///
    /// # Errors
    ///
    /// Returns `HospitalError::Database` if the file is missing, unreadable
    /// or not a SQLite database.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        debug!("Opening database at {:?}", db_path);

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(db_path, flags)?;

        let manager = ConnectionManager {
            connection: Some(conn),
            path: Some(db_path.to_path_buf()),
        };
        manager.initialize()?;

        info!("Connected to database {:?}", db_path);
        Ok(manager)
    }

    /// Wraps an already opened connection (used for in-memory databases).
    pub fn from_connection(conn: Connection) -> Result<Self> {
        let manager = ConnectionManager {
            connection: Some(conn),
            path: None,
        };
        manager.initialize()?;
        Ok(manager)
    }

    fn initialize(&self) -> Result<()> {
        let conn = self.connection()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        // Forces SQLite to read the header; a non-database file fails here.
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    /// Returns the open connection.
    ///
    /// # Errors
    ///
    /// Returns `HospitalError::ConnectionClosed` once `close` has been called.
    pub fn connection(&self) -> Result<&Connection> {
        self.connection.as_ref().ok_or(HospitalError::ConnectionClosed)
    }

    /// Path of the database file, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Checks if the connection slot still holds a connection
    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    /// Returns the version string reported by the SQLite engine
    pub fn sqlite_version(&self) -> Result<String> {
        let version = self
            .connection()?
            .query_row("SELECT sqlite_version()", [], |row| row.get::<_, String>(0))?;
        Ok(version)
    }

    /// Closes the connection.
    ///
    /// Closing an already closed manager is a no-op. If SQLite refuses to
    /// close, the connection is put back and the error returned.
    pub fn close(&mut self) -> Result<()> {
        let Some(conn) = self.connection.take() else {
            debug!("close called on an already closed connection");
            return Ok(());
        };

        match conn.close() {
            Ok(()) => {
                info!("Database connection closed");
                Ok(())
            }
            Err((conn, err)) => {
                warn!("Failed to close database connection: {}", err);
                self.connection = Some(conn);
                Err(HospitalError::Database(err))
            }
        }
    }

    /// Runs a trivial query to find out whether the connection is usable.
    ///
    /// Any failure counts as closed; the kind of error is not inspected.
    pub fn probe(&self) -> ConnectionState {
        let result = self
            .connection()
            .and_then(|conn| {
                conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                    .map_err(HospitalError::from)
            });

        match result {
            Ok(_) => ConnectionState::Open,
            Err(err) => {
                debug!("Connection probe failed: {}", err);
                ConnectionState::Closed
            }
        }
    }
}
