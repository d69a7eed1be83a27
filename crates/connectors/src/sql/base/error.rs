use thiserror::Error;

/// All errors coming from the database/query layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// Low‐level I/O failure, typically while opening the TCP stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQL Server error: {0}")]
    MsSql(#[from] tiberius::error::Error),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("TLS error: {0}")]
    Tls(#[from] native_tls::Error),

    /// The operation did not finish within the configured limit.
    #[error("{operation} timed out after {seconds}s")]
    Timeout { operation: String, seconds: u64 },

    /// A table or column the operation depends on does not exist.
    #[error("Missing schema object: {0}")]
    MissingObject(String),

    /// A value returned by the server could not be read.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Errors happening during adapter or connection setup.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Invalid connection settings: {0}")]
    InvalidSettings(String),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<std::io::Error> for ConnectorError {
    fn from(err: std::io::Error) -> Self {
        ConnectorError::Database(DbError::Io(err))
    }
}

impl From<tiberius::error::Error> for ConnectorError {
    fn from(err: tiberius::error::Error) -> Self {
        ConnectorError::Database(DbError::MsSql(err))
    }
}

impl From<tokio_postgres::Error> for ConnectorError {
    fn from(err: tokio_postgres::Error) -> Self {
        ConnectorError::Database(DbError::Postgres(err))
    }
}

impl From<native_tls::Error> for ConnectorError {
    fn from(err: native_tls::Error) -> Self {
        ConnectorError::Database(DbError::Tls(err))
    }
}
