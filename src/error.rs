use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlMiddlewareDbError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    /// The backend was asked to query or disconnect without a live connection.
    #[error("Backend is not connected")]
    NotConnected,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    /// A chain member panicked; the payload message is preserved when it is a string.
    #[error("Middleware panicked: {0}")]
    MiddlewarePanic(String),

    #[error("Other database error: {0}")]
    Other(String),
}

impl From<tokio::task::JoinError> for SqlMiddlewareDbError {
    fn from(err: tokio::task::JoinError) -> Self {
        SqlMiddlewareDbError::ConnectionError(format!("Backend worker task failed: {err}"))
    }
}
