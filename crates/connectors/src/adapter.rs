use crate::{
    error::AdapterError,
    settings::{ConnectionSettings, Credentials, Driver},
    sql::{
        base::{adapter::SqlAdapter, error::DbError},
        mssql::adapter::MsSqlAdapter,
        postgres::adapter::PgAdapter,
    },
};
use tracing::info;

/// The one open database connection of a run.
pub enum Adapter {
    MsSql(MsSqlAdapter),
    Postgres(PgAdapter),
}

impl Adapter {
    pub async fn connect(
        settings: &ConnectionSettings,
        credentials: &Credentials,
    ) -> Result<Self, AdapterError> {
        let driver = settings.driver()?;
        info!(
            "Connecting to {}:{} ({driver}) database '{}'",
            settings.host, settings.port, settings.database
        );
        match driver {
            Driver::MsSql => {
                let adapter = MsSqlAdapter::connect(settings, credentials).await?;
                Ok(Adapter::MsSql(adapter))
            }
            Driver::Postgres => {
                let adapter = PgAdapter::connect(settings, credentials).await?;
                Ok(Adapter::Postgres(adapter))
            }
        }
    }

    pub fn get_sql(&self) -> &(dyn SqlAdapter + Send + Sync) {
        match self {
            Adapter::MsSql(adapter) => adapter,
            Adapter::Postgres(adapter) => adapter,
        }
    }

    pub async fn close(self) -> Result<(), DbError> {
        match self {
            Adapter::MsSql(adapter) => adapter.close().await,
            Adapter::Postgres(adapter) => adapter.close().await,
        }
    }
}
