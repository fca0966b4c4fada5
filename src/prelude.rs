//! Convenient imports for common functionality.

pub use crate::config::{ConnectOptions, ConnectOptionsBuilder, DEFAULT_PORT, DEFAULT_SCHEMA};
pub use crate::connection::Connection;
pub use crate::cursor::ResultCursor;
pub use crate::driver::{CrateDriver, Driver, DriverRegistry, TransportFactory};
pub use crate::error::{DriverError, TransportError};
pub use crate::statement::{
    ExecutionOutcome, FetchDirection, KeyRetrieval, PreparedStatement, ResultSetConcurrency,
    ResultSetHoldability, ResultSetType, Statement, StatementOps,
};
pub use crate::transport::{SqlResponse, Transport};
pub use crate::types::{ColumnDescriptor, SqlType, SqlValue};
