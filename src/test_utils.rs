//! Scripted in-memory transport for exercising the statement and cursor
//! layers without a live engine.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::TransportError;
use crate::transport::{SqlResponse, Transport};
use crate::types::{ColumnDescriptor, SqlType};

enum Reply {
    Response(SqlResponse),
    Error(TransportError),
}

/// A [`Transport`] that replays a scripted sequence of responses and records
/// every dispatched call.
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<(String, Vec<JsonValue>)>>,
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a row-returning response.
    pub fn push_rows(&self, columns: Vec<ColumnDescriptor>, rows: Vec<Vec<JsonValue>>) {
        self.push(Reply::Response(SqlResponse::Rows { columns, rows }));
    }

    /// Queue an update-count response.
    pub fn push_row_count(&self, count: u64) {
        self.push(Reply::Response(SqlResponse::RowCount(count)));
    }

    /// Queue a connection-level transport failure.
    pub fn push_connection_error(&self, message: impl Into<String>) {
        self.push(Reply::Error(TransportError::Connection(message.into())));
    }

    /// Queue an engine-reported SQL error.
    pub fn push_engine_error(&self, message: impl Into<String>, position: Option<usize>) {
        self.push(Reply::Error(TransportError::Engine {
            message: message.into(),
            position,
        }));
    }

    fn push(&self, reply: Reply) {
        self.lock_script().push_back(reply);
    }

    /// SQL text of every call dispatched so far, in order.
    #[must_use]
    pub fn dispatched_sql(&self) -> Vec<String> {
        self.lock_calls().iter().map(|(sql, _)| sql.clone()).collect()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock_calls().len()
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<Reply>> {
        match self.script.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<(String, Vec<JsonValue>)>> {
        match self.calls.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(
        &self,
        sql: &str,
        params: &[JsonValue],
    ) -> Result<SqlResponse, TransportError> {
        self.lock_calls().push((sql.to_string(), params.to_vec()));
        match self.lock_script().pop_front() {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Error(err)) => Err(err),
            None => Err(TransportError::Connection(
                "mock transport script exhausted".to_string(),
            )),
        }
    }
}

/// Shorthand for a column list: `columns(&[("a", SqlType::Integer)])`.
#[must_use]
pub fn columns(defs: &[(&str, SqlType)]) -> Vec<ColumnDescriptor> {
    defs.iter()
        .enumerate()
        .map(|(i, (name, ty))| ColumnDescriptor::new(*name, i + 1, *ty))
        .collect()
}
