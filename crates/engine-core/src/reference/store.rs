use crate::error::EngineError;
use async_trait::async_trait;
use connectors::sql::base::adapter::SqlAdapter;
use model::{
    catalog::reference::{
        ChildRecord, ColumnExpr, ColumnValue, ReferenceRecord, SURROGATE_ID_COLUMN,
    },
    core::{data_type::DataType, value::Value},
};
use planner::query::{
    ast::{common::TableRef, expr::Expr, insert::Insert, select::Select},
    builder::{insert::InsertBuilder, select::SelectBuilder},
    count_all, ident, qualified,
    renderer::render,
    typed_value,
};
use tracing::debug;

/// Storage for reference rows, addressed by natural key.
#[async_trait]
pub trait ReferenceStore: Send + Sync {
    async fn exists(&self, record: &ReferenceRecord) -> Result<bool, EngineError>;

    /// Inserts the parent row unless its key is already present. Returns
    /// rows written.
    async fn insert(&self, record: &ReferenceRecord) -> Result<u64, EngineError>;

    /// Inserts `child` for the stored parent unless one already exists.
    async fn insert_child(
        &self,
        record: &ReferenceRecord,
        child: &ChildRecord,
    ) -> Result<u64, EngineError>;
}

/// [`ReferenceStore`] over a live connection. Every insert carries its own
/// `NOT EXISTS` guard.
pub struct SqlReferenceStore<'a> {
    adapter: &'a dyn SqlAdapter,
}

impl<'a> SqlReferenceStore<'a> {
    pub fn new(adapter: &'a dyn SqlAdapter) -> Self {
        Self { adapter }
    }
}

const PARENT_ALIAS: &str = "p";
const CHILD_ALIAS: &str = "c";

fn key_type(record: &ReferenceRecord) -> DataType {
    record
        .values
        .iter()
        .find(|v| v.column.eq_ignore_ascii_case(&record.key_column))
        .map(|v| v.data_type)
        .unwrap_or(DataType::Text(None))
}

fn key_expr(record: &ReferenceRecord) -> Expr {
    typed_value(Value::from(record.key.as_str()), key_type(record))
}

fn column_expr(value: &ColumnValue) -> Expr {
    match &value.value {
        ColumnExpr::Value(v) => typed_value(v.clone(), value.data_type),
        ColumnExpr::CurrentTimestamp => Expr::CurrentTimestamp,
    }
}

fn column_names(values: &[ColumnValue]) -> Vec<&str> {
    values.iter().map(|v| v.column.as_str()).collect()
}

pub fn exists_query(record: &ReferenceRecord) -> Select {
    SelectBuilder::new()
        .select(vec![count_all().alias("total")])
        .from(TableRef::parse(&record.table), None)
        .where_clause(ident(&record.key_column).equals(key_expr(record)))
        .build()
}

/// `INSERT INTO t (...) SELECT <values> WHERE NOT EXISTS (<same key>)`
pub fn guarded_insert(record: &ReferenceRecord) -> Insert {
    let existing = SelectBuilder::new()
        .select(vec![Expr::Literal("1".into())])
        .from(TableRef::parse(&record.table), None)
        .where_clause(ident(&record.key_column).equals(key_expr(record)))
        .build();

    let select = SelectBuilder::new()
        .select(record.values.iter().map(column_expr).collect())
        .where_clause(Expr::not_exists(existing))
        .build();

    InsertBuilder::new(TableRef::parse(&record.table))
        .columns(&column_names(&record.values))
        .select(select)
        .build()
}

/// Inserts the child row against the parent found by natural key, unless
/// the parent already has a row in the child table.
pub fn guarded_child_insert(record: &ReferenceRecord, child: &ChildRecord) -> Insert {
    let existing = SelectBuilder::new()
        .select(vec![Expr::Literal("1".into())])
        .from(TableRef::parse(&child.table), Some(CHILD_ALIAS))
        .where_clause(
            qualified(CHILD_ALIAS, &child.parent_column)
                .equals(qualified(PARENT_ALIAS, SURROGATE_ID_COLUMN)),
        )
        .build();

    let mut projections = vec![qualified(PARENT_ALIAS, SURROGATE_ID_COLUMN)];
    projections.extend(child.values.iter().map(column_expr));

    let select = SelectBuilder::new()
        .select(projections)
        .from(TableRef::parse(&record.table), Some(PARENT_ALIAS))
        .where_clause(qualified(PARENT_ALIAS, &record.key_column).equals(key_expr(record)))
        .where_clause(Expr::not_exists(existing))
        .build();

    let mut columns = vec![child.parent_column.as_str()];
    columns.extend(column_names(&child.values));

    InsertBuilder::new(TableRef::parse(&child.table))
        .columns(&columns)
        .select(select)
        .build()
}

#[async_trait]
impl ReferenceStore for SqlReferenceStore<'_> {
    async fn exists(&self, record: &ReferenceRecord) -> Result<bool, EngineError> {
        let (sql, params) = render(&exists_query(record), self.adapter.dialect());
        let rows = self.adapter.query_rows(&sql, params).await?;
        let count = rows
            .first()
            .and_then(|row| row.get_at(0))
            .and_then(Value::as_i64)
            .unwrap_or(0);
        Ok(count > 0)
    }

    async fn insert(&self, record: &ReferenceRecord) -> Result<u64, EngineError> {
        let (sql, params) = render(&guarded_insert(record), self.adapter.dialect());
        debug!("Reference insert for {} '{}': {}", record.table, record.key, sql);
        Ok(self.adapter.exec_params(&sql, params).await?)
    }

    async fn insert_child(
        &self,
        record: &ReferenceRecord,
        child: &ChildRecord,
    ) -> Result<u64, EngineError> {
        let (sql, params) = render(&guarded_child_insert(record, child), self.adapter.dialect());
        debug!("{} row for '{}': {}", child.table, record.key, sql);
        Ok(self.adapter.exec_params(&sql, params).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        reference::catalog,
        test_utils::{MockAdapter, count_row},
    };
    use planner::query::dialect::{MsSql, Postgres};

    #[test]
    fn test_guarded_insert_mssql() {
        let brand = catalog::brands().remove(6);
        let (sql, params) = render(&guarded_insert(&brand), &MsSql);
        assert_eq!(
            sql,
            concat!(
                "INSERT INTO [Brands] ([Name], [Description], [Country], [CreatedAt]) ",
                "SELECT CAST(@P1 AS NVARCHAR(100)), CAST(@P2 AS NVARCHAR(500)), CAST(@P3 AS NVARCHAR(50)), GETDATE() ",
                "WHERE NOT EXISTS (SELECT 1 FROM [Brands] WHERE ([Name] = CAST(@P4 AS NVARCHAR(100))));"
            )
        );
        assert_eq!(params[0], Value::from("PROTEO"));
        assert_eq!(params[2], Value::from("México"));
        assert_eq!(params[3], Value::from("PROTEO"));
    }

    #[test]
    fn test_guarded_child_insert_postgres() {
        let product = catalog::reference_product();
        let nutrition = &product.children[0];
        let (sql, params) = render(&guarded_child_insert(&product, nutrition), &Postgres);

        assert!(sql.starts_with(
            r#"INSERT INTO "NutritionalInfo" ("ProductId", "Energy", "Protein", "TotalFat", "Carbohydrates", "DietaryFiber", "Sodium") SELECT "p"."Id", CAST($1 AS NUMERIC(10,2))"#
        ));
        assert!(sql.ends_with(concat!(
            r#"FROM "Products" AS "p" WHERE (("p"."ASIN" = CAST($7 AS VARCHAR(50))) AND "#,
            r#"NOT EXISTS (SELECT 1 FROM "NutritionalInfo" AS "c" WHERE ("c"."ProductId" = "p"."Id")));"#
        )));
        assert_eq!(params.len(), 7);
        assert_eq!(params[6], Value::from(catalog::REFERENCE_PRODUCT_KEY));
    }

    #[test]
    fn test_exists_query() {
        let category = catalog::categories().remove(0);
        let (sql, params) = render(&exists_query(&category), &MsSql);
        assert_eq!(
            sql,
            "SELECT COUNT(*) AS [total] FROM [Categories] WHERE ([Name] = CAST(@P1 AS NVARCHAR(100)))"
        );
        assert_eq!(params, vec![Value::from("Salud y Cuidado Personal")]);
    }

    #[tokio::test]
    async fn test_sql_store_roundtrip() {
        let adapter = MockAdapter::mssql().with_rows("COUNT(*)", vec![count_row(1)]);
        let store = SqlReferenceStore::new(&adapter);
        let product = catalog::reference_product();

        assert!(store.exists(&product).await.unwrap());
        assert_eq!(store.insert(&product).await.unwrap(), 1);
        assert_eq!(
            store.insert_child(&product, &product.children[1]).await.unwrap(),
            1
        );

        let sql = adapter.executed_sql();
        assert_eq!(sql.len(), 3);
        assert!(sql[1].starts_with("INSERT INTO [Products]"));
        assert!(sql[2].starts_with("INSERT INTO [ProductAnalysis]"));
    }
}
