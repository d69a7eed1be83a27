use crate::{
    settings::{ConnectionSettings, Credentials},
    sql::{
        base::{
            adapter::{
                DatabaseKind, ServerInfo, SqlAdapter, TableName, run_or_rollback, split_table_name,
                with_timeout,
            },
            error::{ConnectorError, DbError},
            introspection,
            row::DbRow,
        },
        mssql::params::bind_values,
    },
};
use async_trait::async_trait;
use model::{catalog::field::SourceColumn, core::value::Value, records::row::RowData};
use planner::query::dialect::{self, Dialect};
use std::time::Duration;
use tiberius::{AuthMethod, Client, Config, EncryptionLevel, Query};
use tokio::{net::TcpStream, sync::Mutex};
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::debug;

pub type TdsClient = Client<Compat<TcpStream>>;

pub struct MsSqlAdapter {
    client: Mutex<TdsClient>,
    dialect: dialect::MsSql,
    command_timeout: Duration,
}

const QUERY_TABLE_EXISTS_SQL: &str = include_str!("sql/table_exists.sql");
const QUERY_TABLE_COLUMNS_SQL: &str = include_str!("sql/table_columns.sql");
const QUERY_LIST_TABLES_SQL: &str = include_str!("sql/list_tables.sql");
const QUERY_SERVER_INFO_SQL: &str = include_str!("sql/server_info.sql");

pub(crate) fn build_config(settings: &ConnectionSettings, credentials: &Credentials) -> Config {
    let mut config = Config::new();
    config.host(&settings.host);
    config.port(settings.port);
    config.database(&settings.database);
    config.authentication(AuthMethod::sql_server(
        &credentials.username,
        &credentials.password,
    ));
    config.encryption(if settings.encrypt {
        EncryptionLevel::Required
    } else {
        EncryptionLevel::Off
    });
    if settings.trust_server_certificate {
        config.trust_cert();
    }
    config
}

impl MsSqlAdapter {
    pub async fn connect(
        settings: &ConnectionSettings,
        credentials: &Credentials,
    ) -> Result<Self, ConnectorError> {
        let config = build_config(settings, credentials);
        let client = with_timeout("connect", settings.connect_timeout(), async {
            let tcp = TcpStream::connect(config.get_addr()).await?;
            tcp.set_nodelay(true)?;
            let client = Client::connect(config, tcp.compat_write()).await?;
            Ok::<_, DbError>(client)
        })
        .await?;

        Ok(MsSqlAdapter {
            client: Mutex::new(client),
            dialect: dialect::MsSql,
            command_timeout: settings.command_timeout(),
        })
    }

    /// Sends the logout and closes the TCP stream.
    pub async fn close(self) -> Result<(), DbError> {
        self.client.into_inner().close().await?;
        Ok(())
    }

    async fn run_query(&self, sql: &str, params: Vec<Value>) -> Result<Vec<RowData>, DbError> {
        with_timeout("query", self.command_timeout, async {
            let mut query = Query::new(sql);
            bind_values(&mut query, params);
            let mut client = self.client.lock().await;
            let rows = query.query(&mut *client).await?.into_first_result().await?;
            Ok::<_, DbError>(
                rows.iter()
                    .map(|row| DbRow::MsSqlRow(row).to_row_data())
                    .collect(),
            )
        })
        .await
    }
}

/// Runs a statement that returns nothing, draining the response.
async fn simple(client: &mut TdsClient, sql: &str) -> Result<(), DbError> {
    client.simple_query(sql).await?.into_results().await?;
    Ok(())
}

async fn rollback(client: &mut TdsClient) -> Result<(), DbError> {
    simple(client, "IF @@TRANCOUNT > 0 ROLLBACK TRANSACTION").await
}

async fn execute(client: &mut TdsClient, sql: &str, params: Vec<Value>) -> Result<u64, DbError> {
    let mut query = Query::new(sql);
    bind_values(&mut query, params);
    let result = query.execute(client).await?;
    Ok(result.total())
}

fn table_params(table: &str) -> Vec<Value> {
    let (schema, name) = split_table_name(table);
    vec![Value::from(name), Value::from(schema)]
}

#[async_trait]
impl SqlAdapter for MsSqlAdapter {
    fn kind(&self) -> DatabaseKind {
        DatabaseKind::MsSql
    }

    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    async fn exec(&self, sql: &str) -> Result<u64, DbError> {
        debug!("exec: {}", sql);
        with_timeout("exec", self.command_timeout, async {
            let mut client = self.client.lock().await;
            execute(&mut *client, sql, Vec::new()).await
        })
        .await
    }

    async fn exec_params(&self, sql: &str, params: Vec<Value>) -> Result<u64, DbError> {
        debug!("exec: {} ({} params)", sql, params.len());
        with_timeout("exec", self.command_timeout, async {
            let mut client = self.client.lock().await;
            execute(&mut *client, sql, params).await
        })
        .await
    }

    /// Only the statement and the COMMIT run under the command timeout. A
    /// failure or timeout in either sends a rollback before the error is
    /// returned, so no transaction is left open on the connection.
    async fn exec_in_transaction(&self, sql: &str, params: Vec<Value>) -> Result<u64, DbError> {
        debug!("exec in transaction: {}", sql);
        let mut client = self.client.lock().await;
        let client = &mut *client;
        with_timeout(
            "transaction",
            self.command_timeout,
            simple(client, "BEGIN TRANSACTION"),
        )
        .await?;

        let affected = run_or_rollback(
            client,
            "transaction",
            self.command_timeout,
            async move |c: &mut TdsClient| execute(c, sql, params).await,
            async |c: &mut TdsClient| rollback(c).await,
        )
        .await?;
        run_or_rollback(
            client,
            "commit",
            self.command_timeout,
            async |c: &mut TdsClient| simple(c, "COMMIT TRANSACTION").await,
            async |c: &mut TdsClient| rollback(c).await,
        )
        .await?;
        Ok(affected)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_config_address() {
        let settings = ConnectionSettings {
            host: "sql.internal".into(),
            port: 1444,
            ..Default::default()
        };
        let config = build_config(&settings, &Credentials::new("loader", "pw"));
        assert_eq!(config.get_addr(), "sql.internal:1444");
    }
}
