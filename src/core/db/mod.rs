/// Database Module
///
/// This module provides the database functionality for hospitaldb,
/// organized into focused submodules.
///
/// ## Architecture
///
/// - **Connection Management** (`connection.rs`): opening, validating and closing the single connection
/// - **Schema Introspection** (`schema.rs`): table, column and foreign key metadata plus table dumps
/// - **Query Execution** (`query.rs`): parameterized query execution and value formatting
///
/// ## Error Handling
///
/// All database operations use the standardized `HospitalError` type.
pub mod connection;
pub mod query;
pub mod schema;

pub use connection::*;
pub use query::*;
pub use schema::*;
