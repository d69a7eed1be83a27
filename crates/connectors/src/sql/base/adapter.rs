use crate::sql::base::error::DbError;
use async_trait::async_trait;
use model::{catalog::field::SourceColumn, core::value::Value, records::row::RowData};
use planner::query::dialect::Dialect;
use serde::Serialize;
use std::{future::Future, time::Duration};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseKind {
    MsSql,
    Postgres,
}

/// A base table as listed by `INFORMATION_SCHEMA.TABLES`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableName {
    pub schema: String,
    pub name: String,
}

impl TableName {
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerInfo {
    pub version: String,
    pub database: String,
    pub server_time: String,
}

#[async_trait]
pub trait SqlAdapter: Send + Sync {
    fn kind(&self) -> DatabaseKind;

    fn dialect(&self) -> &dyn Dialect;

    /// Runs one unparameterized batch (DDL, scripts). Returns rows affected.
    async fn exec(&self, sql: &str) -> Result<u64, DbError>;

    async fn exec_params(&self, sql: &str, params: Vec<Value>) -> Result<u64, DbError>;

    /// Runs one statement in its own transaction: committed on success,
    /// rolled back on failure.
    async fn exec_in_transaction(&self, sql: &str, params: Vec<Value>) -> Result<u64, DbError>;

    async fn query_rows(&self, sql: &str, params: Vec<Value>) -> Result<Vec<RowData>, DbError>;

    // Introspection
    async fn table_exists(&self, table: &str) -> Result<bool, DbError>;
    async fn list_tables(&self) -> Result<Vec<TableName>, DbError>;
    /// Columns of `table` in ordinal order; empty when the table is missing.
    async fn table_columns(&self, table: &str) -> Result<Vec<SourceColumn>, DbError>;
    async fn server_info(&self) -> Result<ServerInfo, DbError>;
}

/// Bounds `fut` by `limit`, turning an elapsed deadline into
/// [`DbError::Timeout`].
pub async fn with_timeout<T, F>(operation: &str, limit: Duration, fut: F) -> Result<T, DbError>
where
    F: Future<Output = Result<T, DbError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(DbError::Timeout {
            operation: operation.to_string(),
            seconds: limit.as_secs(),
        }),
    }
}

/// Runs `statement` on `conn` bounded by `limit`. When it fails or times
/// out, `rollback` runs on the same connection under its own deadline; a
/// failed rollback is logged and the statement's error is returned.
pub async fn run_or_rollback<C, T, S, R>(
    conn: &mut C,
    operation: &str,
    limit: Duration,
    statement: S,
    rollback: R,
) -> Result<T, DbError>
where
    S: AsyncFnOnce(&mut C) -> Result<T, DbError>,
    R: AsyncFnOnce(&mut C) -> Result<(), DbError>,
{
    let outcome = with_timeout(operation, limit, statement(&mut *conn)).await;
    if outcome.is_err() {
        if let Err(rollback_err) = with_timeout("rollback", limit, rollback(conn)).await {
            warn!(%rollback_err, "Rollback failed");
        }
    }
    outcome
}

/// Splits `schema.table`; unqualified names have no schema.
pub fn split_table_name(table: &str) -> (Option<&str>, &str) {
    match table.split_once('.') {
        Some((schema, name)) => (Some(schema), name),
        None => (None, table),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_elapses() {
        let result: Result<(), DbError> =
            with_timeout("sleep", Duration::from_millis(10), async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(DbError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_timed_out_statement_is_rolled_back() {
        let mut sent: Vec<&'static str> = vec!["BEGIN"];
        let result: Result<u64, DbError> = run_or_rollback(
            &mut sent,
            "transaction",
            Duration::from_millis(10),
            async |sent: &mut Vec<&'static str>| {
                sent.push("INSERT");
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(1)
            },
            async |sent: &mut Vec<&'static str>| {
                sent.push("ROLLBACK");
                Ok(())
            },
        )
        .await;

        assert!(matches!(result, Err(DbError::Timeout { .. })));
        assert_eq!(sent, ["BEGIN", "INSERT", "ROLLBACK"]);
    }

    #[tokio::test]
    async fn test_successful_statement_skips_rollback() {
        let mut sent: Vec<&'static str> = Vec::new();
        let affected = run_or_rollback(
            &mut sent,
            "transaction",
            Duration::from_secs(1),
            async |sent: &mut Vec<&'static str>| {
                sent.push("INSERT");
                Ok::<_, DbError>(3)
            },
            async |sent: &mut Vec<&'static str>| {
                sent.push("ROLLBACK");
                Ok(())
            },
        )
        .await
        .unwrap();

        assert_eq!(affected, 3);
        assert_eq!(sent, ["INSERT"]);
    }

    #[test]
    fn test_split_table_name() {
        assert_eq!(split_table_name("config.users"), (Some("config"), "users"));
        assert_eq!(split_table_name("Products"), (None, "Products"));
    }
}
