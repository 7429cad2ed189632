use async_trait::async_trait;

use crate::error::Result;
use crate::types::{RawQueryResult, SqlValue};

/// Opens connections for the store. One connection is opened per operation.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a new connection using the given connection string.
    async fn connect(&self, connection_string: &str) -> Result<Box<dyn Connection>>;
}

/// A single open database connection.
/// Drivers are responsible for:
/// - Converting SqlValue parameters to native types
/// - Executing statements and converting results to RawQueryResult
/// - Releasing the underlying connection on `close` and on drop
#[async_trait]
pub trait Connection: Send {
    /// Execute a SQL statement with the given parameters and return its rows.
    /// Parameters use PostgreSQL-style placeholders ($1, $2, etc.)
    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<RawQueryResult>;

    /// Execute parameterless statements that return no rows (BEGIN, COMMIT, ...).
    async fn batch_execute(&mut self, sql: &str) -> Result<()>;

    /// Close the connection and wait for it to shut down.
    async fn close(self: Box<Self>) -> Result<()>;
}
