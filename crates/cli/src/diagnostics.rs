use connectors::error::Classify;

/// The operator-facing rendering of a failure: the verbatim message, its
/// category and what to check.
pub fn describe<E: Classify + std::fmt::Display>(err: &E) -> String {
    let kind = err.kind();
    format!("Error ({kind}): {err}\nHint: {}", kind.hint())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use connectors::{error::AdapterError, sql::base::error::DbError};

    #[test]
    fn test_message_is_kept_verbatim() {
        let err = CliError::from(DbError::MissingObject(
            "Invalid object name 'temp_products_market'.".into(),
        ));
        let text = describe(&err);
        assert!(text.starts_with("Error (schema): "));
        assert!(text.contains("Invalid object name 'temp_products_market'."));
        assert!(text.contains("Hint: A required table or column is missing."));
    }

    #[test]
    fn test_driver_hint() {
        let err = CliError::from(AdapterError::UnsupportedDriver("odbc driver 17".into()));
        assert!(describe(&err).contains("\"mssql\" or \"postgres\""));
    }
}
