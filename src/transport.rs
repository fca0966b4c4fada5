//! The request/response channel to the remote engine.
//!
//! The driver core never parses wire bytes itself: it hands SQL text plus
//! already-encoded parameters to a [`Transport`] and gets back a structured
//! [`SqlResponse`]. Connection establishment, retry, and the actual wire
//! protocol live behind this trait, outside the core.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::TransportError;
use crate::types::ColumnDescriptor;

/// One complete engine response to a single statement execution.
///
/// The engine produces exactly one of the two shapes per statement: a
/// row-returning result or an affected-row count. Errors are reported through
/// `TransportError`, never inline in the response.
#[derive(Debug, Clone)]
pub enum SqlResponse {
    /// Row-returning result: column metadata plus the full, already
    /// materialized set of rows in engine order. Values are wire-level JSON;
    /// the codec turns them into [`crate::SqlValue`]s.
    Rows {
        columns: Vec<ColumnDescriptor>,
        rows: Vec<Vec<JsonValue>>,
    },
    /// Affected-row count for a non-query statement.
    RowCount(u64),
}

/// Opaque request/response function to the remote SQL engine.
///
/// `execute` blocks (suspends) until the complete response is available;
/// there is no partial or streamed delivery of rows.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        sql: &str,
        params: &[JsonValue],
    ) -> Result<SqlResponse, TransportError>;
}
