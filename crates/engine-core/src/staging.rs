//! Raw CSV import into `temp_<name>` staging tables.

use crate::error::EngineError;
use connectors::{
    file::csv::reader::CsvReader,
    sql::base::adapter::{DatabaseKind, SqlAdapter},
};
use model::{core::data_type::DataType, core::value::Value, records::result::MigrationResult};
use planner::query::{
    ast::{common::TableRef, create_table::CreateTable, drop_table::DropTable},
    builder::{
        create_table::CreateTableBuilder, drop_table::DropTableBuilder, insert::InsertBuilder,
    },
    renderer::render,
    value,
};
use std::path::Path;
use tracing::{debug, info};

pub const STAGING_PREFIX: &str = "temp_";

/// Bound parameters allowed in one statement.
pub fn max_params(kind: &DatabaseKind) -> usize {
    match kind {
        DatabaseKind::MsSql => 2100,
        DatabaseKind::Postgres => 65535,
    }
}

pub fn staging_table_name(name: &str) -> String {
    if name.starts_with(STAGING_PREFIX) {
        name.to_string()
    } else {
        format!("{STAGING_PREFIX}{name}")
    }
}

/// Row constructors allowed in one `VALUES` list, when the server limits it.
pub fn max_values_rows(kind: &DatabaseKind) -> Option<usize> {
    match kind {
        DatabaseKind::MsSql => Some(1000),
        DatabaseKind::Postgres => None,
    }
}

/// Rows per multi-row INSERT so the parameter count stays below
/// `max_params` and the `VALUES` list within `max_values_rows`.
pub fn rows_per_batch(columns: usize, kind: &DatabaseKind) -> usize {
    if columns == 0 {
        return 0;
    }
    let rows = (max_params(kind) - 1) / columns;
    match max_values_rows(kind) {
        Some(limit) => rows.min(limit),
        None => rows,
    }
}

pub fn staging_table(table: &TableRef, headers: &[String]) -> CreateTable {
    headers
        .iter()
        .fold(CreateTableBuilder::new(table.clone()), |builder, header| {
            builder.column(header, DataType::Text(None)).add()
        })
        .build()
}

fn drop_staging(table: &TableRef) -> DropTable {
    DropTableBuilder::new(table.clone()).if_exists().build()
}

/// Replaces `temp_<name>` with the contents of the CSV at `path`. Every
/// column is unbounded text; empty cells are stored as NULL.
pub async fn import_csv(
    adapter: &dyn SqlAdapter,
    path: &Path,
    name: &str,
) -> Result<MigrationResult, EngineError> {
    let mut reader = CsvReader::open(path)?;
    let headers = reader.headers().to_vec();
    let table_name = staging_table_name(name);
    let table = TableRef::new(&table_name);

    let batch_rows = rows_per_batch(headers.len(), &adapter.kind());
    if batch_rows == 0 {
        return Err(EngineError::Schema(format!(
            "{} has {} columns, more than one statement can bind",
            path.display(),
            headers.len()
        )));
    }

    let (drop_sql, _) = render(&drop_staging(&table), adapter.dialect());
    adapter.exec(&drop_sql).await?;
    let (create_sql, _) = render(&staging_table(&table, &headers), adapter.dialect());
    debug!("Staging DDL: {}", create_sql);
    adapter.exec(&create_sql).await?;

    let mut imported = 0u64;
    loop {
        let batch = reader.next_batch(batch_rows)?;
        if batch.is_empty() {
            break;
        }

        let rows = batch.len() as u64;
        let insert = batch
            .into_iter()
            .fold(
                InsertBuilder::new(table.clone()).columns(&headers),
                |builder, row| {
                    builder.values(row.into_iter().map(|cell| value(Value::from(cell))).collect())
                },
            )
            .build();
        let (sql, params) = render(&insert, adapter.dialect());
        adapter.exec_params(&sql, params).await?;
        imported += rows;
        debug!("{}: {} rows so far", table_name, imported);
    }

    info!(
        "Imported {} rows from {} into {}",
        imported,
        path.display(),
        table_name
    );
    Ok(MigrationResult::new(&table_name).with_rows(imported))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockAdapter;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_batch_sizing() {
        let mssql = DatabaseKind::MsSql;
        assert_eq!(rows_per_batch(7, &mssql), 299);
        assert_eq!(rows_per_batch(32, &mssql), 65);
        assert_eq!(rows_per_batch(2100, &mssql), 0);
        assert_eq!(rows_per_batch(0, &mssql), 0);
        assert!(rows_per_batch(33, &mssql) * 33 < 2100);
        assert_eq!(rows_per_batch(7, &DatabaseKind::Postgres), 9362);
    }

    #[test]
    fn test_narrow_tables_stay_within_values_limit() {
        assert_eq!(rows_per_batch(1, &DatabaseKind::MsSql), 1000);
        assert_eq!(rows_per_batch(2, &DatabaseKind::MsSql), 1000);
        assert_eq!(rows_per_batch(3, &DatabaseKind::MsSql), 699);
        assert_eq!(rows_per_batch(1, &DatabaseKind::Postgres), 65534);
    }

    #[tokio::test]
    async fn test_import_splits_two_column_file_at_thousand_rows() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Brand,Price").unwrap();
        for i in 0..1500 {
            writeln!(file, "Brand {i},{i}.99").unwrap();
        }
        let adapter = MockAdapter::mssql();

        let result = import_csv(&adapter, file.path(), "brands").await.unwrap();

        let inserts: Vec<_> = adapter
            .executed()
            .into_iter()
            .filter(|(sql, _)| sql.starts_with("INSERT"))
            .collect();
        assert_eq!(inserts.len(), 2);
        assert_eq!(inserts[0].1.len(), 2000);
        assert_eq!(inserts[0].0.matches("), (").count() + 1, 1000);
        assert_eq!(inserts[1].1.len(), 1000);
        assert_eq!(result.rows_written, 1500);
    }

    #[test]
    fn test_staging_names() {
        assert_eq!(staging_table_name("products_market"), "temp_products_market");
        assert_eq!(staging_table_name("temp_selected_analysis"), "temp_selected_analysis");
    }

    #[tokio::test]
    async fn test_import_replaces_table_and_binds_nulls() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Product Name,# of Reviews,Price\nWhey,12,\nVegan,,9.50\n")
            .unwrap();
        let adapter = MockAdapter::mssql();

        let result = import_csv(&adapter, file.path(), "products_market")
            .await
            .unwrap();

        let executed = adapter.executed();
        assert_eq!(executed[0].0, "DROP TABLE IF EXISTS [temp_products_market];");
        assert!(executed[1].0.contains("[Num_of_Reviews] NVARCHAR(MAX)"));
        assert_eq!(
            executed[2].0,
            "INSERT INTO [temp_products_market] ([Product_Name], [Num_of_Reviews], [Price]) VALUES (@P1, @P2, @P3), (@P4, @P5, @P6);"
        );
        assert_eq!(executed[2].1[2], Value::Null);
        assert_eq!(executed[2].1[4], Value::Null);
        assert_eq!(executed[2].1[5], Value::from("9.50"));
        assert_eq!(result.table, "temp_products_market");
        assert_eq!(result.rows_written, 2);
    }

    #[tokio::test]
    async fn test_import_missing_file_touches_nothing() {
        let adapter = MockAdapter::postgres();
        let err = import_csv(&adapter, Path::new("/nonexistent/market.csv"), "market")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::File(_)));
        assert!(adapter.executed().is_empty());
    }
}
