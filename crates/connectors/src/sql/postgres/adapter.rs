use crate::{
    settings::{ConnectionSettings, Credentials},
    sql::{
        base::{
            adapter::{
                DatabaseKind, ServerInfo, SqlAdapter, TableName, split_table_name, with_timeout,
            },
            error::{ConnectorError, DbError},
            introspection,
            row::DbRow,
        },
        postgres::{params::PgParamStore, utils::connect_client},
    },
};
use async_trait::async_trait;
use model::{catalog::field::SourceColumn, core::value::Value, records::row::RowData};
use planner::query::dialect::{self, Dialect};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_postgres::Client;
use tracing::debug;

pub struct PgAdapter {
    client: RwLock<Client>,
    dialect: dialect::Postgres,
    command_timeout: Duration,
}

const QUERY_TABLE_EXISTS_SQL: &str = include_str!("sql/table_exists.sql");
const QUERY_TABLE_COLUMNS_SQL: &str = include_str!("sql/table_columns.sql");
const QUERY_LIST_TABLES_SQL: &str = include_str!("sql/list_tables.sql");
const QUERY_SERVER_INFO_SQL: &str = include_str!("sql/server_info.sql");

impl PgAdapter {
    pub async fn connect(
        settings: &ConnectionSettings,
        credentials: &Credentials,
    ) -> Result<Self, ConnectorError> {
        let client = match tokio::time::timeout(
            settings.connect_timeout(),
            connect_client(settings, credentials),
        )
        .await
        {
            Ok(client) => client?,
            Err(_) => {
                return Err(ConnectorError::Database(DbError::Timeout {
                    operation: "connect".into(),
                    seconds: settings.connect_timeout_secs,
                }));
            }
        };

        Ok(PgAdapter {
            client: RwLock::new(client),
            dialect: dialect::Postgres,
            command_timeout: settings.command_timeout(),
        })
    }

    /// Drops the client, which ends the background connection task.
    pub async fn close(self) -> Result<(), DbError> {
        drop(self.client.into_inner());
        Ok(())
    }

    async fn run_query(&self, sql: &str, params: Vec<Value>) -> Result<Vec<RowData>, DbError> {
        with_timeout("query", self.command_timeout, async {
            let bindings = PgParamStore::from_values(params);
            let client = self.client.read().await;
            let rows = client.query(sql, &bindings.as_refs()).await?;
            Ok::<_, DbError>(rows
                .iter()
                .map(|row| DbRow::PostgresRow(row).to_row_data())
                .collect())
        })
        .await
    }
}

fn table_params(table: &str) -> Vec<Value> {
    let (schema, name) = split_table_name(table);
    vec![Value::from(name), Value::from(schema)]
}

#[async_trait]
impl SqlAdapter for PgAdapter {
    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Postgres
    }

    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    async fn exec(&self, sql: &str) -> Result<u64, DbError> {
        debug!("exec: {}", sql);
        with_timeout("exec", self.command_timeout, async {
            let client = self.client.read().await;
            client.batch_execute(sql).await?;
            Ok::<_, DbError>(0)
        })
        .await
    }

    async fn exec_params(&self, sql: &str, params: Vec<Value>) -> Result<u64, DbError> {
        debug!("exec: {} ({} params)", sql, params.len());
        with_timeout("exec", self.command_timeout, async {
            let bindings = PgParamStore::from_values(params);
            let client = self.client.read().await;
            Ok::<_, DbError>(client.execute(sql, &bindings.as_refs()).await?)
        })
        .await
    }

    async fn exec_in_transaction(&self, sql: &str, params: Vec<Value>) -> Result<u64, DbError> {
        debug!("exec in transaction: {}", sql);
        with_timeout("transaction", self.command_timeout, async {
            let bindings = PgParamStore::from_values(params);
            let mut client = self.client.write().await;
            // Dropping the transaction without commit rolls it back.
            let tx = client.transaction().await?;
            let affected = tx.execute(sql, &bindings.as_refs()).await?;
            tx.commit().await?;
            Ok::<_, DbError>(affected)
        })
        .await
    }

    async fn query_rows(&self, sql: &str, params: Vec<Value>) -> Result<Vec<RowData>, DbError> {
        debug!("query: {}", sql);
        self.run_query(sql, params).await
    }

    async fn table_exists(&self, table: &str) -> Result<bool, DbError> {
        let rows = self
            .run_query(QUERY_TABLE_EXISTS_SQL, table_params(table))
            .await?;
        Ok(introspection::parse_exists(&rows))
    }

    async fn list_tables(&self) -> Result<Vec<TableName>, DbError> {
        let rows = self.run_query(QUERY_LIST_TABLES_SQL, Vec::new()).await?;
        Ok(introspection::parse_tables(&rows))
    }

    async fn table_columns(&self, table: &str) -> Result<Vec<SourceColumn>, DbError> {
        let rows = self
            .run_query(QUERY_TABLE_COLUMNS_SQL, table_params(table))
            .await?;
        introspection::parse_columns(&rows)
    }

    async fn server_info(&self) -> Result<ServerInfo, DbError> {
        let rows = self.run_query(QUERY_SERVER_INFO_SQL, Vec::new()).await?;
        introspection::parse_server_info(&rows)
    }
}
