use crate::{error::EngineError, staging::STAGING_PREFIX};
use connectors::sql::base::adapter::{DatabaseKind, ServerInfo, SqlAdapter, TableName};
use model::core::value::Value;
use planner::query::{
    ast::{common::TableRef, select::Select},
    builder::select::SelectBuilder,
    count_all,
    renderer::render,
};
use serde::Serialize;
use tracing::{info, warn};

/// Tables the application cannot start without.
pub const REQUIRED_TABLES: [&str; 5] = [
    "config.users",
    "dbo.Products",
    "dbo.Roles",
    "dbo.UserRoles",
    "dbo.UserSessions",
];

pub const COUNTED_TABLES: [&str; 6] = [
    "config.users",
    "Products",
    "NutritionalInfo",
    "ProductAnalysis",
    "Categories",
    "Brands",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCount {
    pub table: String,
    pub rows: Option<i64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    pub server: ServerInfo,
    pub tables: Vec<String>,
    pub missing: Vec<String>,
    pub counts: Vec<TableCount>,
    pub staging: Vec<TableCount>,
}

impl VerifyReport {
    pub fn has_required_tables(&self) -> bool {
        self.missing.is_empty()
    }
}

pub fn count_query(table: &str) -> Select {
    SelectBuilder::new()
        .select(vec![count_all().alias("total")])
        .from(TableRef::parse(table), None)
        .build()
}

pub async fn count_rows(adapter: &dyn SqlAdapter, table: &str) -> Result<i64, EngineError> {
    let (sql, params) = render(&count_query(table), adapter.dialect());
    let rows = adapter.query_rows(&sql, params).await?;
    rows.first()
        .and_then(|row| row.get_at(0))
        .and_then(Value::as_i64)
        .ok_or_else(|| EngineError::Schema(format!("COUNT(*) on {table} returned no value")))
}

/// Counts each table; a failing count is recorded and the rest continue.
pub async fn row_counts<S: AsRef<str>>(adapter: &dyn SqlAdapter, tables: &[S]) -> Vec<TableCount> {
    let mut counts = Vec::with_capacity(tables.len());
    for table in tables {
        let table = table.as_ref();
        let count = match count_rows(adapter, table).await {
            Ok(rows) => TableCount {
                table: table.to_string(),
                rows: Some(rows),
                error: None,
            },
            Err(err) => {
                warn!("Could not count {}: {}", table, err);
                TableCount {
                    table: table.to_string(),
                    rows: None,
                    error: Some(err.to_string()),
                }
            }
        };
        counts.push(count);
    }
    counts
}

/// Required tables absent from `present`. PostgreSQL keeps `dbo` objects in
/// `public`.
pub fn missing_tables(present: &[TableName], required: &[&str], kind: &DatabaseKind) -> Vec<String> {
    let schema_for = |schema: &str| match kind {
        DatabaseKind::Postgres if schema.eq_ignore_ascii_case("dbo") => "public".to_string(),
        _ => schema.to_string(),
    };

    required
        .iter()
        .filter(|wanted| {
            let wanted = TableRef::parse(wanted);
            let schema = wanted.schema.as_deref().map(schema_for);
            !present.iter().any(|t| {
                t.name.eq_ignore_ascii_case(&wanted.name)
                    && schema
                        .as_deref()
                        .is_none_or(|s| t.schema.eq_ignore_ascii_case(s))
            })
        })
        .map(|t| t.to_string())
        .collect()
}

pub async fn verify(adapter: &dyn SqlAdapter) -> Result<VerifyReport, EngineError> {
    let server = adapter.server_info().await?;
    info!("Connected to {} ({})", server.database, server.version);

    let present = adapter.list_tables().await?;
    let missing = missing_tables(&present, &REQUIRED_TABLES, &adapter.kind());
    if !missing.is_empty() {
        warn!("Missing required tables: {}", missing.join(", "));
    }

    let counts = row_counts(adapter, &COUNTED_TABLES).await;
    let staging_tables: Vec<String> = present
        .iter()
        .filter(|t| t.name.starts_with(STAGING_PREFIX))
        .map(TableName::qualified)
        .collect();
    let staging = row_counts(adapter, &staging_tables).await;

    Ok(VerifyReport {
        server,
        tables: present.iter().map(TableName::qualified).collect(),
        missing,
        counts,
        staging,
    })
}
