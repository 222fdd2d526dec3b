/// Core Module for hospitaldb
///
/// Shared infrastructure used by the exercise runner: the database layer
/// (connection lifecycle, schema introspection, query execution) and the
/// crate-wide error type.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{HospitalError, Result};
