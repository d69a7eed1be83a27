use connectors::{
    error::{AdapterError, Classify, ErrorKind},
    sql::base::error::DbError,
};
use engine_core::error::EngineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read a file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to parse the settings file as JSON: {0}")]
    ConfigDeserialize(#[from] serde_json::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),

    #[error("Credentials unavailable: {0}")]
    Credentials(String),

    #[error("{0}")]
    Adapter(#[from] AdapterError),

    #[error("{0}")]
    Database(#[from] DbError),

    #[error("{0}")]
    Engine(#[from] EngineError),

    #[error("Missing required tables: {}", .0.join(", "))]
    MissingTables(Vec<String>),
}

impl Classify for CliError {
    fn kind(&self) -> ErrorKind {
        match self {
            CliError::Adapter(err) => err.kind(),
            CliError::Database(err) => err.kind(),
            CliError::Engine(err) => err.kind(),
            CliError::MissingTables(_) => ErrorKind::Schema,
            CliError::Credentials(_) => ErrorKind::Authentication,
            CliError::Io(_)
            | CliError::Config(_)
            | CliError::ConfigDeserialize(_)
            | CliError::JsonSerialize(_) => ErrorKind::Execution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_the_wrapped_error() {
        let err = CliError::from(AdapterError::UnsupportedDriver("odbc".into()));
        assert_eq!(err.kind(), ErrorKind::DriverMissing);

        let err = CliError::from(EngineError::Schema("temp_products_market".into()));
        assert_eq!(err.kind(), ErrorKind::Schema);

        let err = CliError::MissingTables(vec!["dbo.Roles".into(), "dbo.UserRoles".into()]);
        assert_eq!(err.to_string(), "Missing required tables: dbo.Roles, dbo.UserRoles");
        assert_eq!(err.kind(), ErrorKind::Schema);
    }
}
