use serde::Serialize;

/// Outcome of one migration step against one target table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MigrationResult {
    pub table: String,
    pub rows_written: u64,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl MigrationResult {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Default::default()
        }
    }

    pub fn with_rows(mut self, rows: u64) -> Self {
        self.rows_written = rows;
        self
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
