//! Defines the `Dialect` trait for database-specific SQL syntax.

use model::core::data_type::DataType;

pub trait Dialect: Send + Sync {
    /// Wraps an identifier (like a table or column name) in the correct
    /// quotation marks for the dialect.
    ///
    /// - SQL Server uses brackets: `[my_column]`
    /// - PostgreSQL uses double quotes: `"my_column"`
    fn quote_identifier(&self, ident: &str) -> String;

    /// Returns the placeholder for a parameterized query.
    ///
    /// - SQL Server (TDS) uses `@P1`, `@P2`, etc.
    /// - PostgreSQL uses `$1`, `$2`, etc.
    fn get_placeholder(&self, index: usize) -> String;

    /// Renders a generic `DataType` into a database-specific SQL type string.
    fn render_data_type(&self, data_type: &DataType) -> String;

    /// Quotes and escapes an inline string literal.
    fn quote_text(&self, text: &str) -> String {
        format!("'{}'", text.replace('\'', "''"))
    }

    fn current_timestamp(&self) -> &'static str;

    /// Column clause for a server-generated ascending integer key.
    fn identity_clause(&self) -> &'static str;

    /// Whether the server has a native conversion that yields NULL on failure.
    fn supports_try_cast(&self) -> bool;

    /// Whether `CREATE TABLE IF NOT EXISTS` is understood.
    fn supports_create_if_not_exists(&self) -> bool;

    /// Returns the name of the dialect (e.g., "PostgreSQL", "SQL Server").
    fn name(&self) -> String;
}

/// A POSIX regular expression matching the text forms a numeric type
/// accepts. Used where the server has no TRY_CAST.
///
/// The pattern only checks the shape of the text; whether the value fits
/// is left to [`numeric_bound`].
pub fn numeric_pattern(data_type: &DataType) -> String {
    let body = match data_type {
        DataType::Int | DataType::BigInt | DataType::Decimal { scale: 0, .. } => "[0-9]+",
        _ => "([0-9]+([.][0-9]*)?|[.][0-9]+)",
    };
    format!("^[[:space:]]*[-+]?{body}[[:space:]]*$")
}

/// The value check a numeric text must pass before it is cast, so that an
/// out-of-range value becomes NULL instead of failing the statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumericBound {
    /// Inclusive range of an integer type.
    Between(i64, i64),
    /// The magnitude, rounded to `scale` digits when set, must stay below
    /// `limit`.
    Below { scale: Option<u8>, limit: String },
}

pub fn numeric_bound(data_type: &DataType) -> Option<NumericBound> {
    match data_type {
        DataType::Int => Some(NumericBound::Between(i32::MIN as i64, i32::MAX as i64)),
        DataType::BigInt => Some(NumericBound::Between(i64::MIN, i64::MAX)),
        DataType::Decimal { scale, .. } => {
            let digits = data_type.integer_digits().unwrap_or_default() as usize;
            Some(NumericBound::Below {
                scale: Some(*scale),
                limit: format!("1{}", "0".repeat(digits)),
            })
        }
        DataType::Float => Some(NumericBound::Below {
            scale: None,
            limit: "1E308".into(),
        }),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct MsSql;

impl Dialect for MsSql {
    fn quote_identifier(&self, ident: &str) -> String {
        format!("[{}]", ident.replace(']', "]]"))
    }

    fn get_placeholder(&self, index: usize) -> String {
        format!("@P{}", index + 1)
    }

    fn render_data_type(&self, data_type: &DataType) -> String {
        match data_type {
            DataType::Int => "INT".into(),
            DataType::BigInt => "BIGINT".into(),
            DataType::Decimal { precision, scale } => format!("DECIMAL({precision},{scale})"),
            DataType::Float => "FLOAT".into(),
            DataType::Text(Some(len)) => format!("NVARCHAR({len})"),
            DataType::Text(None) => "NVARCHAR(MAX)".into(),
            DataType::Boolean => "BIT".into(),
            DataType::Timestamp => "DATETIME2".into(),
        }
    }

    fn quote_text(&self, text: &str) -> String {
        format!("N'{}'", text.replace('\'', "''"))
    }

    fn current_timestamp(&self) -> &'static str {
        "GETDATE()"
    }

    fn identity_clause(&self) -> &'static str {
        "IDENTITY(1,1)"
    }

    fn supports_try_cast(&self) -> bool {
        true
    }

    fn supports_create_if_not_exists(&self) -> bool {
        false
    }

    fn name(&self) -> String {
        "SQL Server".into()
    }
}

#[derive(Debug, Clone)]
pub struct Postgres;

impl Dialect for Postgres {
    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#""{}""#, ident.replace('"', "\"\""))
    }

    fn get_placeholder(&self, index: usize) -> String {
        format!("${}", index + 1)
    }

    fn render_data_type(&self, data_type: &DataType) -> String {
        match data_type {
            DataType::Int => "INTEGER".into(),
            DataType::BigInt => "BIGINT".into(),
            DataType::Decimal { precision, scale } => format!("NUMERIC({precision},{scale})"),
            DataType::Float => "DOUBLE PRECISION".into(),
            DataType::Text(Some(len)) => format!("VARCHAR({len})"),
            DataType::Text(None) => "TEXT".into(),
            DataType::Boolean => "BOOLEAN".into(),
            DataType::Timestamp => "TIMESTAMP".into(),
        }
    }

    fn current_timestamp(&self) -> &'static str {
        "CURRENT_TIMESTAMP"
    }

    fn identity_clause(&self) -> &'static str {
        "GENERATED BY DEFAULT AS IDENTITY"
    }

    fn supports_try_cast(&self) -> bool {
        false
    }

    fn supports_create_if_not_exists(&self) -> bool {
        true
    }

    fn name(&self) -> String {
        "PostgreSQL".into()
    }
}
