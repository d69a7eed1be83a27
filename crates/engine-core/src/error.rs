use connectors::{
    error::{AdapterError, Classify, ErrorKind},
    file::csv::error::FileError,
    sql::base::error::DbError,
};
use model::catalog::mapping::MappingError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Database(#[from] DbError),

    #[error("{0}")]
    Adapter(#[from] AdapterError),

    #[error("File error: {0}")]
    File(#[from] FileError),

    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// A table or column the step depends on is missing.
    #[error("Schema error: {0}")]
    Schema(String),
}

impl Classify for EngineError {
    fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Database(err) => err.kind(),
            EngineError::Adapter(err) => err.kind(),
            EngineError::File(err) => err.kind(),
            EngineError::Mapping(_) => ErrorKind::Execution,
            EngineError::Schema(_) => ErrorKind::Schema,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_errors_classify_as_schema() {
        let err = EngineError::Schema("temp_products has no columns".into());
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert_eq!(err.to_string(), "Schema error: temp_products has no columns");
    }

    #[test]
    fn test_database_message_is_kept_verbatim() {
        let err = EngineError::from(DbError::MissingObject("Invalid object name 'Products'.".into()));
        assert!(err.to_string().contains("Invalid object name 'Products'."));
        assert_eq!(err.kind(), ErrorKind::Schema);
    }
}
