//! Structured error types for albumctl-core.
//!
//! Uses `thiserror` so library consumers can match on the failure kind.
//! The `albumctl` binary wraps these in `anyhow` at the top level.

use thiserror::Error;

/// Main error type for album data access
#[derive(Error, Debug)]
pub enum AlbumError {
    /// Configuration missing or unusable
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// Connection string could not be parsed
    #[error("Invalid connection string: {source}")]
    InvalidConnectionString {
        #[source]
        source: sqlx::Error,
    },

    /// Pool creation, connection establishment or acquisition failed
    #[error("{context}: {source}")]
    Connection {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    /// Statement execution or row decoding failed
    #[error("{context}: {source}")]
    Query {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    /// The run deadline elapsed while `operation` was in flight
    #[error("Timed out during {operation}")]
    Timeout { operation: String },

    /// A named placeholder in a statement had no bound value
    #[error("Missing value for named argument '@{name}'")]
    MissingNamedArg { name: String },
}

/// Result type alias for albumctl-core operations
pub type Result<T> = std::result::Result<T, AlbumError>;

impl AlbumError {
    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create a connection error with context naming the operation
    pub fn connection(context: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Connection {
            context: context.into(),
            source,
        }
    }

    /// Wrap a driver error from `context`, keeping transport failures apart
    /// from statement failures.
    pub fn from_sqlx(context: impl Into<String>, source: sqlx::Error) -> Self {
        match source {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::connection(context, source),
            _ => Self::query(context, source),
        }
    }

    /// Create a query error with context naming the operation
    pub fn query(context: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Query {
            context: context.into(),
            source,
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
