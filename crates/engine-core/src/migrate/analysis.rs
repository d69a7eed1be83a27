use crate::{error::EngineError, migrate::products::PRODUCTS_TABLE, verify::report::count_rows};
use connectors::sql::base::adapter::SqlAdapter;
use model::records::result::MigrationResult;
use planner::query::{
    ast::{
        common::{JoinKind, TableRef},
        insert::Insert,
    },
    builder::{insert::InsertBuilder, select::SelectBuilder},
    qualified,
    renderer::render,
};
use tracing::{debug, info, warn};

pub const ANALYSIS_TABLE: &str = "ProductAnalysis";
pub const ANALYSIS_STAGING_TABLE: &str = "temp_selected_analysis";

/// Target column and the staging column it is copied from.
const ANALYSIS_COLUMNS: [(&str, &str); 7] = [
    ("ValueProposition", "Value_Proposition"),
    ("Ingredients", "Ingredients"),
    ("KeyLabels", "Key_Labels"),
    ("PrimaryColors", "Primary_Colors"),
    ("SecondaryColors", "Secondary_Colors"),
    ("IntendedSegment", "Intended_Segment"),
    ("AdditionalNotes", "Additional_Notes"),
];

/// Joins staged analysis rows to `Products` by ASIN.
pub fn build_analysis_insert(staging: &TableRef) -> Insert {
    let mut columns = vec!["ProductId"];
    columns.extend(ANALYSIS_COLUMNS.iter().map(|(target, _)| *target));

    let mut projections = vec![qualified("p", "Id")];
    projections.extend(
        ANALYSIS_COLUMNS
            .iter()
            .map(|(_, source)| qualified("sa", source)),
    );

    let select = SelectBuilder::new()
        .select(projections)
        .from(staging.clone(), Some("sa"))
        .join(
            JoinKind::Inner,
            TableRef::new(PRODUCTS_TABLE),
            Some("p"),
            qualified("p", "ASIN").equals(qualified("sa", "ASIN")),
        )
        .where_clause(qualified("sa", "Value_Proposition").is_not_null())
        .build();

    InsertBuilder::new(TableRef::new(ANALYSIS_TABLE))
        .columns(&columns)
        .select(select)
        .build()
}

/// Skipped, with a warning, when the staging table is absent or empty.
pub async fn migrate_analysis(
    adapter: &dyn SqlAdapter,
    staging: &str,
) -> Result<MigrationResult, EngineError> {
    let mut result = MigrationResult::new(ANALYSIS_TABLE);

    if !adapter.table_exists(staging).await? {
        warn!("Staging table {} not found; skipping analysis migration", staging);
        result.warn(format!("{staging} not found; nothing migrated"));
        return Ok(result);
    }

    let staged = count_rows(adapter, staging).await?;
    if staged == 0 {
        warn!("Staging table {} is empty; skipping analysis migration", staging);
        result.warn(format!("{staging} is empty; nothing migrated"));
        return Ok(result);
    }

    let insert = build_analysis_insert(&TableRef::parse(staging));
    let (sql, params) = render(&insert, adapter.dialect());
    debug!("Analysis migration SQL: {}", sql);

    let rows = adapter.exec_in_transaction(&sql, params).await?;
    info!("Migrated {} of {} staged analysis rows", rows, staged);
    Ok(result.with_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockAdapter, count_row};
    use planner::query::dialect::MsSql;

    #[test]
    fn test_render_analysis_insert() {
        let insert = build_analysis_insert(&TableRef::new(ANALYSIS_STAGING_TABLE));
        let (sql, params) = render(&insert, &MsSql);
        assert_eq!(
            sql,
            concat!(
                "INSERT INTO [ProductAnalysis] ([ProductId], [ValueProposition], [Ingredients], [KeyLabels], ",
                "[PrimaryColors], [SecondaryColors], [IntendedSegment], [AdditionalNotes]) ",
                "SELECT [p].[Id], [sa].[Value_Proposition], [sa].[Ingredients], [sa].[Key_Labels], ",
                "[sa].[Primary_Colors], [sa].[Secondary_Colors], [sa].[Intended_Segment], [sa].[Additional_Notes] ",
                "FROM [temp_selected_analysis] AS [sa] ",
                "INNER JOIN [Products] AS [p] ON ([p].[ASIN] = [sa].[ASIN]) ",
                "WHERE [sa].[Value_Proposition] IS NOT NULL;"
            )
        );
        assert!(params.is_empty());
    }

    #[tokio::test]
    async fn test_skips_missing_staging_table() {
        let adapter = MockAdapter::mssql();
        let result = migrate_analysis(&adapter, ANALYSIS_STAGING_TABLE).await.unwrap();

        assert_eq!(result.rows_written, 0);
        assert_eq!(result.warnings.len(), 1);
        assert!(adapter.executed().is_empty());
    }

    #[tokio::test]
    async fn test_skips_empty_staging_table() {
        let adapter = MockAdapter::mssql()
            .with_columns(ANALYSIS_STAGING_TABLE, &["ASIN", "Value_Proposition"])
            .with_rows("COUNT(*)", vec![count_row(0)]);

        let result = migrate_analysis(&adapter, ANALYSIS_STAGING_TABLE).await.unwrap();
        assert_eq!(result.rows_written, 0);
        assert!(result.warnings[0].contains("empty"));
        assert_eq!(adapter.executed().len(), 1);
    }

    #[tokio::test]
    async fn test_migrates_staged_rows() {
        let adapter = MockAdapter::mssql()
            .with_columns(ANALYSIS_STAGING_TABLE, &["ASIN", "Value_Proposition"])
            .with_rows("COUNT(*)", vec![count_row(12)])
            .affecting(9);

        let result = migrate_analysis(&adapter, ANALYSIS_STAGING_TABLE).await.unwrap();
        assert_eq!(result.rows_written, 9);
        assert!(result.warnings.is_empty());
        assert!(adapter.executed_sql()[1].starts_with("INSERT INTO [ProductAnalysis]"));
    }
}
