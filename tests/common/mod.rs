#![allow(dead_code)]

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SAMPLE_DATA_SQL: &str = include_str!("../fixtures/hospital.sql");

/// A database file in its own temporary directory, removed on drop.
pub struct TempHospitalDb {
    dir: TempDir,
    path: PathBuf,
}

impl TempHospitalDb {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("HospitalInfo.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(SAMPLE_DATA_SQL).unwrap();
        TempHospitalDb { dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Opens a separate connection for checking what a run wrote
    pub fn open(&self) -> Connection {
        Connection::open(&self.path).unwrap()
    }

    pub fn experience_of(&self, doc_id: i64) -> rusqlite::types::Value {
        self.open()
            .query_row("SELECT Exp FROM Doctor WHERE DocID = ?1", [doc_id], |row| row.get(0))
            .unwrap()
    }
}
