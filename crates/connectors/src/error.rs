use crate::{
    file::csv::error::FileError,
    sql::base::error::{ConnectorError, DbError},
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    /// The configured driver identifier is not one this build can use.
    #[error("Unsupported driver: {0}")]
    UnsupportedDriver(String),

    #[error("Connector error: {0}")]
    Connector(#[from] ConnectorError),

    #[error("File error: {0}")]
    FileError(#[from] FileError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

/// Coarse failure categories an operator can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    Connectivity,
    Authentication,
    Tls,
    DriverMissing,
    Schema,
    Cast,
    Execution,
}

impl ErrorKind {
    /// Classifies a driver message by its well-known fragments.
    pub fn from_message(message: &str) -> ErrorKind {
        let msg = message.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| msg.contains(n));

        if has(&["login failed", "password authentication failed"]) {
            ErrorKind::Authentication
        } else if has(&["ssl", "certificate", "tls"]) {
            ErrorKind::Tls
        } else if has(&[
            "cannot open server",
            "timeout",
            "timed out",
            "connection refused",
            "network",
        ]) {
            ErrorKind::Connectivity
        } else if has(&["driver"]) {
            ErrorKind::DriverMissing
        } else if has(&["invalid object name", "does not exist", "invalid column name"]) {
            ErrorKind::Schema
        } else if has(&[
            "conversion failed",
            "error converting",
            "invalid input syntax",
            "arithmetic overflow",
            "numeric field overflow",
        ]) {
            ErrorKind::Cast
        } else {
            ErrorKind::Execution
        }
    }

    /// What the operator should check first.
    pub fn hint(&self) -> &'static str {
        match self {
            ErrorKind::Connectivity => {
                "Check the server address and port, that the server is running, and that a firewall allows the connection."
            }
            ErrorKind::Authentication => {
                "Check the username and password, and that SQL authentication is enabled for the login."
            }
            ErrorKind::Tls => {
                "The TLS handshake failed. Verify the server certificate or set trust_server_certificate for a trusted private server."
            }
            ErrorKind::DriverMissing => {
                "Use a supported driver identifier: \"mssql\" or \"postgres\"."
            }
            ErrorKind::Schema => {
                "A required table or column is missing. Run the schema creation scripts or the import step first."
            }
            ErrorKind::Cast => {
                "A value could not be converted to the target column type. Inspect the staging data for that column."
            }
            ErrorKind::Execution => "The server rejected the statement. See the message above.",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Connectivity => "connectivity",
            ErrorKind::Authentication => "authentication",
            ErrorKind::Tls => "tls",
            ErrorKind::DriverMissing => "driver missing",
            ErrorKind::Schema => "schema",
            ErrorKind::Cast => "cast",
            ErrorKind::Execution => "execution",
        };
        f.write_str(name)
    }
}

/// Errors that can be mapped to an [`ErrorKind`].
pub trait Classify {
    fn kind(&self) -> ErrorKind;
}

impl Classify for DbError {
    fn kind(&self) -> ErrorKind {
        match self {
            DbError::Io(_) | DbError::Timeout { .. } => ErrorKind::Connectivity,
            DbError::Tls(_) => ErrorKind::Tls,
            DbError::MissingObject(_) => ErrorKind::Schema,
            DbError::Decode(_) => ErrorKind::Execution,
            DbError::Postgres(err) => match err.code().map(|c| c.code()) {
                Some("28P01") | Some("28000") => ErrorKind::Authentication,
                Some("42P01") | Some("42703") | Some("3D000") => ErrorKind::Schema,
                Some("22P02") | Some("22003") => ErrorKind::Cast,
                _ => ErrorKind::from_message(&err.to_string()),
            },
            DbError::MsSql(err) => match err {
                tiberius::error::Error::Io { .. } => ErrorKind::Connectivity,
                tiberius::error::Error::Tls(_) => ErrorKind::Tls,
                _ => ErrorKind::from_message(&err.to_string()),
            },
        }
    }
}

impl Classify for ConnectorError {
    fn kind(&self) -> ErrorKind {
        match self {
            ConnectorError::InvalidSettings(_) => ErrorKind::Connectivity,
            ConnectorError::Database(err) => err.kind(),
        }
    }
}

impl Classify for FileError {
    fn kind(&self) -> ErrorKind {
        match self {
            FileError::NotFound(_) | FileError::IoError(_) => ErrorKind::Execution,
            FileError::InvalidFormat(_) | FileError::CsvError(_) => ErrorKind::Schema,
        }
    }
}

impl Classify for AdapterError {
    fn kind(&self) -> ErrorKind {
        match self {
            AdapterError::UnsupportedDriver(_) => ErrorKind::DriverMissing,
            AdapterError::Connector(err) => err.kind(),
            AdapterError::FileError(err) => err.kind(),
            AdapterError::Database(err) => err.kind(),
        }
    }
}
