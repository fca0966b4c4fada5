//! Statement executor: raw and prepared statements sharing one executor core
//! and one no-op vs. not-supported classification table.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

use tracing::debug;

use crate::codec;
use crate::connection::ConnectionInner;
use crate::cursor::ResultCursor;
use crate::error::DriverError;
use crate::placeholder::count_placeholders;
use crate::transport::SqlResponse;
use crate::types::SqlValue;

/// Result of one statement execution: rows or an update count, never both.
#[derive(Debug)]
pub enum ExecutionOutcome {
    Rows(ResultCursor),
    Updated(u64),
}

impl ExecutionOutcome {
    /// Whether this outcome carries a result cursor.
    pub fn is_rows(&self) -> bool {
        matches!(self, ExecutionOutcome::Rows(_))
    }
}

/// The only cursor traversal direction the engine supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDirection {
    Forward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSetType {
    ForwardOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSetConcurrency {
    ReadOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSetHoldability {
    HoldCursorsOverCommit,
}

/// Generated-key retrieval modes of the standard execute variants. The engine
/// has no generated-key support, so every mode is rejected uniformly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRetrieval {
    GeneratedKeys,
    ColumnIndexes(Vec<usize>),
    ColumnNames(Vec<String>),
}

/// Executor state shared by the plain and prepared statement variants.
pub struct StatementCore {
    conn: Weak<ConnectionInner>,
    closed: AtomicBool,
    cursor: Mutex<Option<ResultCursor>>,
}

impl StatementCore {
    pub(crate) fn new(conn: Weak<ConnectionInner>) -> Self {
        Self {
            conn,
            closed: AtomicBool::new(false),
            cursor: Mutex::new(None),
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Synchronous closed-check before any dispatch. The statement is also
    /// considered closed once its connection has gone away or closed.
    fn check_open(&self) -> Result<Arc<ConnectionInner>, DriverError> {
        if self.is_closed() {
            return Err(DriverError::Closed("statement"));
        }
        let conn = self
            .conn
            .upgrade()
            .ok_or(DriverError::Closed("statement"))?;
        if !conn.is_open() {
            return Err(DriverError::Closed("connection"));
        }
        Ok(conn)
    }

    /// Swap in `next` as the active cursor, closing the previous one.
    /// At most one cursor is active per statement at any time.
    fn swap_cursor(&self, next: Option<ResultCursor>) {
        let previous = {
            let mut slot = lock(&self.cursor);
            std::mem::replace(&mut *slot, next)
        };
        if let Some(cursor) = previous {
            cursor.close();
        }
    }

    fn open_cursor(&self) -> Option<ResultCursor> {
        lock(&self.cursor).clone()
    }

    pub(crate) fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.swap_cursor(None);
    }

    async fn dispatch(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<ExecutionOutcome, DriverError> {
        if sql.trim().is_empty() {
            return Err(DriverError::Execution(
                "SQL text must not be empty".to_string(),
            ));
        }
        let conn = self.check_open()?;
        // Release the previous result before the new call goes out.
        self.swap_cursor(None);

        let encoded = codec::encode_params(params)?;
        debug!(sql, params = params.len(), "dispatching statement");
        let response = conn.transport().execute(sql, &encoded).await?;

        match response {
            SqlResponse::Rows { columns, rows } => {
                let mut decoded = Vec::with_capacity(rows.len());
                for row in &rows {
                    if row.len() != columns.len() {
                        return Err(DriverError::Execution(format!(
                            "engine returned a row of width {} for {} column(s)",
                            row.len(),
                            columns.len()
                        )));
                    }
                    let mut values = Vec::with_capacity(row.len());
                    for (wire, col) in row.iter().zip(&columns) {
                        values.push(codec::decode_wire(wire, col.sql_type)?);
                    }
                    decoded.push(values);
                }
                let cursor = ResultCursor::new(columns, decoded);
                self.swap_cursor(Some(cursor.clone()));
                Ok(ExecutionOutcome::Rows(cursor))
            }
            SqlResponse::RowCount(n) => Ok(ExecutionOutcome::Updated(n)),
        }
    }

    fn require_rows(&self, outcome: ExecutionOutcome) -> Result<ResultCursor, DriverError> {
        match outcome {
            ExecutionOutcome::Rows(cursor) => Ok(cursor),
            ExecutionOutcome::Updated(_) => Err(DriverError::Execution(
                "statement did not produce a result set".to_string(),
            )),
        }
    }

    fn require_update(&self, outcome: ExecutionOutcome) -> Result<u64, DriverError> {
        match outcome {
            ExecutionOutcome::Updated(n) => Ok(n),
            ExecutionOutcome::Rows(_) => {
                // Release the cursor the misuse just opened.
                self.swap_cursor(None);
                Err(DriverError::Execution(
                    "statement produced a result set instead of an update count".to_string(),
                ))
            }
        }
    }
}

/// Shared surface of both statement variants.
///
/// The default methods are the single source of truth for the classification
/// of every optional standard capability: either a safe no-op preserving
/// default behavior, or a deterministic `Unsupported` failure. Callers probe
/// this surface directly, so the split must not drift between variants.
pub trait StatementOps {
    #[doc(hidden)]
    fn core(&self) -> &StatementCore;

    fn is_closed(&self) -> bool {
        self.core().is_closed()
    }

    /// Close the statement and release its open cursor. Idempotent.
    fn close(&self) {
        self.core().close();
    }

    /// The currently open result cursor, if the last execution produced one.
    fn result_set(&self) -> Result<Option<ResultCursor>, DriverError> {
        self.core().check_open()?;
        Ok(self.core().open_cursor())
    }

    // ---- safe no-ops and fixed defaults ----

    fn set_escape_processing(&self, _enable: bool) -> Result<(), DriverError> {
        Ok(())
    }

    fn set_cursor_name(&self, _name: &str) -> Result<(), DriverError> {
        Ok(())
    }

    fn warnings(&self) -> Result<Option<String>, DriverError> {
        Ok(None)
    }

    fn clear_warnings(&self) -> Result<(), DriverError> {
        Ok(())
    }

    /// Accepted but never enforced, matching upstream driver behavior; the
    /// sibling fetch controls raise instead. Deliberate asymmetry.
    fn set_max_rows(&self, _max: u64) -> Result<(), DriverError> {
        Ok(())
    }

    fn max_rows(&self) -> Result<u64, DriverError> {
        Ok(0)
    }

    fn max_field_size(&self) -> Result<u64, DriverError> {
        Ok(0)
    }

    fn query_timeout(&self) -> Result<u64, DriverError> {
        Ok(0)
    }

    /// The engine produces a single result per statement; there is never a
    /// further one.
    fn more_results(&self) -> Result<bool, DriverError> {
        Ok(false)
    }

    fn fetch_direction(&self) -> Result<FetchDirection, DriverError> {
        Ok(FetchDirection::Forward)
    }

    fn fetch_size(&self) -> Result<u64, DriverError> {
        Ok(0)
    }

    fn result_set_type(&self) -> Result<ResultSetType, DriverError> {
        Ok(ResultSetType::ForwardOnly)
    }

    fn result_set_concurrency(&self) -> Result<ResultSetConcurrency, DriverError> {
        Ok(ResultSetConcurrency::ReadOnly)
    }

    fn result_set_holdability(&self) -> Result<ResultSetHoldability, DriverError> {
        Ok(ResultSetHoldability::HoldCursorsOverCommit)
    }

    fn is_poolable(&self) -> Result<bool, DriverError> {
        Ok(false)
    }

    fn is_close_on_completion(&self) -> Result<bool, DriverError> {
        Ok(true)
    }

    // ---- explicitly unsupported capabilities ----

    fn set_max_field_size(&self, _max: u64) -> Result<(), DriverError> {
        Err(DriverError::unsupported("set_max_field_size"))
    }

    fn set_query_timeout(&self, _seconds: u64) -> Result<(), DriverError> {
        Err(DriverError::unsupported("set_query_timeout"))
    }

    /// Cancellation fails explicitly rather than silently doing nothing.
    fn cancel(&self) -> Result<(), DriverError> {
        self.core().check_open()?;
        Err(DriverError::unsupported("cancel"))
    }

    fn set_fetch_direction(&self, _direction: FetchDirection) -> Result<(), DriverError> {
        Err(DriverError::unsupported("set_fetch_direction"))
    }

    fn set_fetch_size(&self, _rows: u64) -> Result<(), DriverError> {
        Err(DriverError::unsupported("set_fetch_size"))
    }

    /// Multi-result-set advancement with a cursor disposition.
    fn more_results_then(&self) -> Result<bool, DriverError> {
        self.core().check_open()?;
        Err(DriverError::unsupported("more_results_then"))
    }

    fn generated_keys(&self) -> Result<ResultCursor, DriverError> {
        self.core().check_open()?;
        Err(DriverError::unsupported("generated_keys"))
    }

    fn set_poolable(&self, _poolable: bool) -> Result<(), DriverError> {
        Err(DriverError::unsupported("set_poolable"))
    }
}

/// Plain statement: raw SQL text supplied per call.
pub struct Statement {
    core: Arc<StatementCore>,
}

impl Statement {
    pub(crate) fn from_core(core: Arc<StatementCore>) -> Self {
        Self { core }
    }

    /// Execute SQL text, classifying the response as rows or an update count.
    pub async fn execute(&self, sql: &str) -> Result<ExecutionOutcome, DriverError> {
        self.core.dispatch(sql, &[]).await
    }

    /// Execute SQL that must produce rows.
    pub async fn execute_query(&self, sql: &str) -> Result<ResultCursor, DriverError> {
        let outcome = self.core.dispatch(sql, &[]).await?;
        self.core.require_rows(outcome)
    }

    /// Execute SQL that must produce an update count.
    pub async fn execute_update(&self, sql: &str) -> Result<u64, DriverError> {
        let outcome = self.core.dispatch(sql, &[]).await?;
        self.core.require_update(outcome)
    }

    /// Generated-key execute variants, uniformly rejected.
    pub async fn execute_returning_keys(
        &self,
        _sql: &str,
        _keys: KeyRetrieval,
    ) -> Result<ExecutionOutcome, DriverError> {
        self.core.check_open()?;
        Err(DriverError::unsupported("execute_returning_keys"))
    }

    pub async fn execute_update_returning_keys(
        &self,
        _sql: &str,
        _keys: KeyRetrieval,
    ) -> Result<u64, DriverError> {
        self.core.check_open()?;
        Err(DriverError::unsupported("execute_update_returning_keys"))
    }
}

impl StatementOps for Statement {
    fn core(&self) -> &StatementCore {
        &self.core
    }
}

/// Prepared statement: SQL text fixed at creation, positional parameters
/// bound per execution. The placeholder count is parsed once at creation and
/// every execution's parameter arity is checked against it before dispatch.
pub struct PreparedStatement {
    core: Arc<StatementCore>,
    sql: String,
    placeholders: usize,
}

impl PreparedStatement {
    pub(crate) fn from_core(core: Arc<StatementCore>, sql: String) -> Self {
        let placeholders = count_placeholders(&sql);
        Self {
            core,
            sql,
            placeholders,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn placeholder_count(&self) -> usize {
        self.placeholders
    }

    fn check_binding(&self, params: &[SqlValue]) -> Result<(), DriverError> {
        if params.len() != self.placeholders {
            return Err(DriverError::ParameterMismatch {
                expected: self.placeholders,
                supplied: params.len(),
            });
        }
        Ok(())
    }

    pub async fn execute(&self, params: &[SqlValue]) -> Result<ExecutionOutcome, DriverError> {
        self.core.check_open()?;
        self.check_binding(params)?;
        self.core.dispatch(&self.sql, params).await
    }

    pub async fn execute_query(&self, params: &[SqlValue]) -> Result<ResultCursor, DriverError> {
        let outcome = self.execute(params).await?;
        self.core.require_rows(outcome)
    }

    pub async fn execute_update(&self, params: &[SqlValue]) -> Result<u64, DriverError> {
        let outcome = self.execute(params).await?;
        self.core.require_update(outcome)
    }
}

impl StatementOps for PreparedStatement {
    fn core(&self) -> &StatementCore {
        &self.core
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
