use thiserror::Error;

/// Faults reported by the transport collaborator.
///
/// `Connection` covers network/channel-level failures the caller may choose to
/// retry; `Engine` is the remote engine rejecting or failing the SQL itself,
/// with an optional byte offset into the statement text. The driver never
/// retries either internally.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection failure: {0}")]
    Connection(String),

    #[error("engine error: {message}")]
    Engine {
        message: String,
        position: Option<usize>,
    },
}

#[derive(Debug, Error)]
pub enum DriverError {
    /// Operation invoked on a closed connection, statement, or cursor.
    #[error("{0} is closed")]
    Closed(&'static str),

    /// Standard capability deliberately left unimplemented.
    #[error("not supported: {0}")]
    Unsupported(String),

    /// Prepared-statement parameter arity does not match the placeholder count.
    #[error("parameter binding mismatch: statement has {expected} placeholder(s), {supplied} parameter(s) supplied")]
    ParameterMismatch { expected: usize, supplied: usize },

    /// Network/connection-level fault, surfaced with the underlying cause.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The engine rejected or failed the SQL.
    #[error("query error: {message}")]
    Query {
        message: String,
        position: Option<usize>,
    },

    /// Requested accessor type is incompatible with the column's value.
    #[error("conversion error: {0}")]
    Conversion(String),

    /// Driver-side execution misuse (e.g. executeQuery on a DML statement).
    #[error("execution error: {0}")]
    Execution(String),

    /// Configuration error (bad URL, bad options).
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<TransportError> for DriverError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Connection(msg) => DriverError::Transport(msg),
            TransportError::Engine { message, position } => {
                DriverError::Query { message, position }
            }
        }
    }
}

impl DriverError {
    pub(crate) fn unsupported(what: &str) -> DriverError {
        DriverError::Unsupported(what.to_string())
    }
}
