//! Connection context: owns the transport session, the current schema, and
//! the closing cascade over open statements and their cursors.

use std::sync::{Arc, Mutex, Weak};

use tracing::debug;

use crate::error::DriverError;
use crate::statement::{PreparedStatement, Statement, StatementCore};
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Open,
    Closing,
    Closed,
}

pub(crate) struct ConnectionInner {
    transport: Arc<dyn Transport>,
    schema: Mutex<String>,
    state: Mutex<Lifecycle>,
    statements: Mutex<Vec<Weak<StatementCore>>>,
}

impl ConnectionInner {
    pub(crate) fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub(crate) fn is_open(&self) -> bool {
        *lock(&self.state) == Lifecycle::Open
    }
}

/// Handle to one engine session.
///
/// Lifecycle is `Open -> Closing -> Closed`; `close` is idempotent and
/// force-closes every still-open statement (cascading to their cursors)
/// before the transport handle is released. Once closed, the connection is
/// permanently inert: every operation except `is_closed` fails.
pub struct Connection {
    inner: Arc<ConnectionInner>,
}

impl Connection {
    /// Open a connection context over an established transport session.
    pub fn new(transport: Arc<dyn Transport>, schema: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ConnectionInner {
                transport,
                schema: Mutex::new(schema.into()),
                state: Mutex::new(Lifecycle::Open),
                statements: Mutex::new(Vec::new()),
            }),
        }
    }

    fn check_open(&self) -> Result<(), DriverError> {
        if self.inner.is_open() {
            Ok(())
        } else {
            Err(DriverError::Closed("connection"))
        }
    }

    fn register(&self, core: &Arc<StatementCore>) {
        let mut registry = lock(&self.inner.statements);
        registry.retain(|weak| weak.strong_count() > 0);
        registry.push(Arc::downgrade(core));
    }

    /// Create a plain statement bound to this connection.
    pub fn create_statement(&self) -> Result<Statement, DriverError> {
        self.check_open()?;
        let core = Arc::new(StatementCore::new(Arc::downgrade(&self.inner)));
        self.register(&core);
        Ok(Statement::from_core(core))
    }

    /// Create a prepared statement with SQL text fixed at creation.
    pub fn prepare(&self, sql: impl Into<String>) -> Result<PreparedStatement, DriverError> {
        self.check_open()?;
        let sql = sql.into();
        if sql.trim().is_empty() {
            return Err(DriverError::Execution(
                "SQL text must not be empty".to_string(),
            ));
        }
        let core = Arc::new(StatementCore::new(Arc::downgrade(&self.inner)));
        self.register(&core);
        Ok(PreparedStatement::from_core(core, sql))
    }

    /// The schema statements run against.
    pub fn schema(&self) -> Result<String, DriverError> {
        self.check_open()?;
        Ok(lock(&self.inner.schema).clone())
    }

    pub fn set_schema(&self, schema: impl Into<String>) -> Result<(), DriverError> {
        self.check_open()?;
        *lock(&self.inner.schema) = schema.into();
        Ok(())
    }

    /// The engine runs every statement in its own implicit transaction;
    /// autocommit is always on and cannot be disabled.
    pub fn is_autocommit(&self) -> Result<bool, DriverError> {
        self.check_open()?;
        Ok(true)
    }

    pub fn set_autocommit(&self, enabled: bool) -> Result<(), DriverError> {
        self.check_open()?;
        if enabled {
            Ok(())
        } else {
            Err(DriverError::unsupported("disabling autocommit"))
        }
    }

    pub fn is_closed(&self) -> bool {
        !self.inner.is_open()
    }

    /// Close the connection. Idempotent: the second and later calls are
    /// no-ops. Open statements are force-closed before the state flips to
    /// `Closed`.
    pub fn close(&self) {
        {
            let mut state = lock(&self.inner.state);
            if *state != Lifecycle::Open {
                return;
            }
            *state = Lifecycle::Closing;
        }
        debug!("closing connection, cascading to open statements");

        let statements = std::mem::take(&mut *lock(&self.inner.statements));
        for weak in statements {
            if let Some(core) = weak.upgrade() {
                core.close();
            }
        }

        *lock(&self.inner.state) = Lifecycle::Closed;
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
