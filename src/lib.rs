//! Client-side SQL driver for CrateDB-style distributed SQL engines.
//!
//! The crate adapts a conventional statement/result-set API to an engine that
//! supports exactly one forward-only, read-only result per statement: a
//! [`Connection`](connection::Connection) creates plain or prepared
//! statements, statement execution classifies each engine response as either
//! a [`ResultCursor`](cursor::ResultCursor) or an update count, and the value
//! codec maps wire values to caller-requested types. The wire protocol
//! itself lives behind the [`Transport`](transport::Transport) trait.
//!
//! ```no_run
//! use std::sync::Arc;
//! use cratedb_client::prelude::*;
//!
//! async fn example(transport: Arc<dyn Transport>) -> Result<(), DriverError> {
//!     let conn = ConnectOptions::from_url("crate://localhost:4200/doc")?
//!         .connect(transport);
//!     let stmt = conn.create_statement()?;
//!     let cursor = stmt.execute_query("select name, port from sys.nodes").await?;
//!     while cursor.advance()? {
//!         let name = cursor.get_string(1)?;
//!         let port = cursor.get_i64(2)?;
//!         println!("{name:?} {port:?}");
//!     }
//!     conn.close();
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod config;
pub mod connection;
pub mod cursor;
pub mod driver;
pub mod error;
pub mod placeholder;
pub mod prelude;
pub mod statement;
pub mod transport;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use config::ConnectOptions;
pub use connection::Connection;
pub use cursor::ResultCursor;
pub use error::{DriverError, TransportError};
pub use statement::{ExecutionOutcome, PreparedStatement, Statement, StatementOps};
pub use transport::{SqlResponse, Transport};
pub use types::{ColumnDescriptor, SqlType, SqlValue};
