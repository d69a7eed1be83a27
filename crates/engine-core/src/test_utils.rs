//! In-memory `SqlAdapter` that records statements and replays canned rows.

use async_trait::async_trait;
use connectors::sql::base::{
    adapter::{DatabaseKind, ServerInfo, SqlAdapter, TableName},
    error::DbError,
};
use model::{catalog::field::SourceColumn, core::value::Value, records::row::RowData};
use planner::query::dialect::{self, Dialect};
use std::{collections::HashMap, sync::Mutex};

pub struct MockAdapter {
    kind: DatabaseKind,
    dialect: Box<dyn Dialect>,
    columns: HashMap<String, Vec<SourceColumn>>,
    tables: Vec<TableName>,
    /// First entry whose needle occurs in the SQL answers the query.
    responses: Vec<(String, Result<Vec<RowData>, String>)>,
    fail_on: Option<String>,
    affected: u64,
    executed: Mutex<Vec<(String, Vec<Value>)>>,
}

impl MockAdapter {
    pub fn mssql() -> Self {
        Self::new(DatabaseKind::MsSql, Box::new(dialect::MsSql))
    }

    pub fn postgres() -> Self {
        Self::new(DatabaseKind::Postgres, Box::new(dialect::Postgres))
    }

    fn new(kind: DatabaseKind, dialect: Box<dyn Dialect>) -> Self {
        Self {
            kind,
            dialect,
            columns: HashMap::new(),
            tables: Vec::new(),
            responses: Vec::new(),
            fail_on: None,
            affected: 1,
            executed: Mutex::new(Vec::new()),
        }
    }

    pub fn with_columns(mut self, table: &str, names: &[&str]) -> Self {
        self.columns
            .insert(table.to_string(), SourceColumn::from_names(names.iter().copied()));
        self
    }

    pub fn with_table(mut self, schema: &str, name: &str) -> Self {
        self.tables.push(TableName {
            schema: schema.to_string(),
            name: name.to_string(),
        });
        self
    }

    pub fn with_rows(mut self, needle: &str, rows: Vec<RowData>) -> Self {
        self.responses.push((needle.to_string(), Ok(rows)));
        self
    }

    pub fn with_query_error(mut self, needle: &str, message: &str) -> Self {
        self.responses
            .push((needle.to_string(), Err(message.to_string())));
        self
    }

    /// Statements containing `needle` fail with a driver-like message.
    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on = Some(needle.to_string());
        self
    }

    pub fn affecting(mut self, rows: u64) -> Self {
        self.affected = rows;
        self
    }

    pub fn executed(&self) -> Vec<(String, Vec<Value>)> {
        self.executed.lock().unwrap().clone()
    }

    pub fn executed_sql(&self) -> Vec<String> {
        self.executed().into_iter().map(|(sql, _)| sql).collect()
    }

    fn record(&self, sql: &str, params: Vec<Value>) -> Result<u64, DbError> {
        self.executed
            .lock()
            .unwrap()
            .push((sql.to_string(), params));
        match &self.fail_on {
            Some(needle) if sql.contains(needle.as_str()) => Err(DbError::MissingObject(format!(
                "statement rejected: {needle}"
            ))),
            _ => Ok(self.affected),
        }
    }
}

pub fn count_row(count: i64) -> RowData {
    RowData::from_pairs([("total", Value::Int(count))])
}

#[async_trait]
impl SqlAdapter for MockAdapter {
    fn kind(&self) -> DatabaseKind {
        self.kind.clone()
    }

    fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    async fn exec(&self, sql: &str) -> Result<u64, DbError> {
        self.record(sql, Vec::new())
    }

    async fn exec_params(&self, sql: &str, params: Vec<Value>) -> Result<u64, DbError> {
        self.record(sql, params)
    }

    async fn exec_in_transaction(&self, sql: &str, params: Vec<Value>) -> Result<u64, DbError> {
        self.record(sql, params)
    }

    async fn query_rows(&self, sql: &str, params: Vec<Value>) -> Result<Vec<RowData>, DbError> {
        self.executed
            .lock()
            .unwrap()
            .push((sql.to_string(), params));
        for (needle, response) in &self.responses {
            if sql.contains(needle.as_str()) {
                return response.clone().map_err(DbError::MissingObject);
            }
        }
        Ok(Vec::new())
    }

    async fn table_exists(&self, table: &str) -> Result<bool, DbError> {
        Ok(self.columns.contains_key(table)
            || self
                .tables
                .iter()
                .any(|t| t.name.eq_ignore_ascii_case(table) || t.qualified() == table))
    }

    async fn list_tables(&self) -> Result<Vec<TableName>, DbError> {
        Ok(self.tables.clone())
    }

    async fn table_columns(&self, table: &str) -> Result<Vec<SourceColumn>, DbError> {
        Ok(self.columns.get(table).cloned().unwrap_or_default())
    }

    async fn server_info(&self) -> Result<ServerInfo, DbError> {
        Ok(ServerInfo {
            version: "Mock SQL 1.0".to_string(),
            database: "proteo".to_string(),
            server_time: "2026-01-01 00:00:00".to_string(),
        })
    }
}
