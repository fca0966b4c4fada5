//! Forward-only, read-only cursor over one query's materialized rows.

use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::codec;
use crate::error::DriverError;
use crate::types::{ColumnDescriptor, SqlValue};

struct CursorState {
    rows: Vec<Vec<SqlValue>>,
    /// -1 = before first row, rows.len() = after last row.
    position: i64,
    closed: bool,
    last_was_null: bool,
}

struct CursorInner {
    columns: Arc<Vec<ColumnDescriptor>>,
    state: Mutex<CursorState>,
}

/// Handle to one engine response exposed as an ordered row sequence.
///
/// The whole answer is materialized before the cursor is handed out; the
/// cursor never reorders or buffers ahead. Cloning yields another handle to
/// the same underlying position, which is how the owning statement closes a
/// cursor it no longer considers active. Column access is 1-based.
#[derive(Clone)]
pub struct ResultCursor {
    inner: Arc<CursorInner>,
}

impl ResultCursor {
    pub(crate) fn new(columns: Vec<ColumnDescriptor>, rows: Vec<Vec<SqlValue>>) -> Self {
        Self {
            inner: Arc::new(CursorInner {
                columns: Arc::new(columns),
                state: Mutex::new(CursorState {
                    rows,
                    position: -1,
                    closed: false,
                    last_was_null: false,
                }),
            }),
        }
    }

    /// Column metadata, available at any time, before the first `advance`
    /// and after `close`.
    pub fn metadata(&self) -> &[ColumnDescriptor] {
        &self.inner.columns
    }

    /// Move one row forward. Returns whether a row is now available.
    /// The position never moves backward; once exhausted, every further call
    /// returns `false`.
    pub fn advance(&self) -> Result<bool, DriverError> {
        let mut state = self.lock();
        if state.closed {
            return Err(DriverError::Closed("result cursor"));
        }
        let len = state.rows.len() as i64;
        if state.position < len {
            state.position += 1;
        }
        Ok(state.position < len)
    }

    /// Whether the most recently read column value was SQL NULL.
    pub fn was_null(&self) -> Result<bool, DriverError> {
        let state = self.lock();
        if state.closed {
            return Err(DriverError::Closed("result cursor"));
        }
        Ok(state.last_was_null)
    }

    /// Release the materialized rows. Further `advance`/`get` calls fail.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.rows = Vec::new();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Read the current row's column `col` (1-based) with a codec conversion.
    fn read<T>(
        &self,
        col: usize,
        convert: impl FnOnce(&SqlValue) -> Result<Option<T>, DriverError>,
    ) -> Result<Option<T>, DriverError> {
        let mut state = self.lock();
        if state.closed {
            return Err(DriverError::Closed("result cursor"));
        }
        if state.position < 0 || state.position >= state.rows.len() as i64 {
            return Err(DriverError::Execution("no current row".to_string()));
        }
        if col == 0 || col > self.inner.columns.len() {
            return Err(DriverError::Execution(format!(
                "column index {col} out of range 1..={}",
                self.inner.columns.len()
            )));
        }
        let value = &state.rows[state.position as usize][col - 1];
        let was_null = value.is_null();
        let converted = convert(value);
        state.last_was_null = was_null;
        converted
    }

    /// The raw value of column `col` in the current row.
    pub fn get_value(&self, col: usize) -> Result<SqlValue, DriverError> {
        self.read(col, |v| Ok(Some(v.clone())))
            .map(|v| v.unwrap_or(SqlValue::Null))
    }

    pub fn get_i64(&self, col: usize) -> Result<Option<i64>, DriverError> {
        self.read(col, codec::to_i64)
    }

    pub fn get_i32(&self, col: usize) -> Result<Option<i32>, DriverError> {
        self.read(col, codec::to_i32)
    }

    pub fn get_f64(&self, col: usize) -> Result<Option<f64>, DriverError> {
        self.read(col, codec::to_f64)
    }

    pub fn get_bool(&self, col: usize) -> Result<Option<bool>, DriverError> {
        self.read(col, codec::to_bool)
    }

    pub fn get_string(&self, col: usize) -> Result<Option<String>, DriverError> {
        self.read(col, codec::to_text)
    }

    pub fn get_timestamp(&self, col: usize) -> Result<Option<NaiveDateTime>, DriverError> {
        self.read(col, codec::to_timestamp)
    }

    pub fn get_json(&self, col: usize) -> Result<Option<JsonValue>, DriverError> {
        self.read(col, codec::to_json)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CursorState> {
        // Cursor state is plain data; a poisoned lock only happens if a caller
        // panicked mid-read, in which case the data is still consistent.
        match self.inner.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl std::fmt::Debug for ResultCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("ResultCursor")
            .field("columns", &self.inner.columns.len())
            .field("rows", &state.rows.len())
            .field("position", &state.position)
            .field("closed", &state.closed)
            .finish()
    }
}
