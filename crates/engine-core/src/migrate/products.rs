//! Bulk `INSERT … SELECT` from a staging table into `Products`.

use crate::{error::EngineError, mapping::mapper::ColumnMapper};
use connectors::sql::base::adapter::SqlAdapter;
use model::{
    catalog::{
        field::{Fallback, SourceColumn, TargetField, UNKNOWN_KEY_PREFIX},
        mapping::{FieldMapping, FieldSource},
    },
    core::{data_type::DataType, value::Value},
    records::result::MigrationResult,
};
use planner::query::{
    ast::{
        common::{OrderDir, TableRef},
        expr::Expr,
        insert::Insert,
        select::OrderByExpr,
    },
    builder::{insert::InsertBuilder, select::SelectBuilder},
    func, ident,
    renderer::render,
};
use tracing::{debug, error, info};

pub const PRODUCTS_TABLE: &str = "Products";

/// Width of the row number inside a generated key.
const GENERATED_KEY_DIGITS: u32 = 10;

/// The mapping that was applied together with the outcome of the insert.
#[derive(Debug, Clone)]
pub struct ProductMigration {
    pub mapping: FieldMapping,
    pub result: MigrationResult,
}

/// Builds the single statement that copies `staging` into `Products`.
///
/// `columns` are the staging table's columns; the first one (by ordinal)
/// stands in for the product name when no column matched it.
pub fn build_products_insert(
    staging: &TableRef,
    mapping: &FieldMapping,
    columns: &[SourceColumn],
) -> Result<Insert, EngineError> {
    let first_column = columns
        .iter()
        .min_by_key(|c| c.ordinal)
        .map(|c| c.name.as_str())
        .ok_or_else(|| {
            EngineError::Schema(format!("staging table {} has no columns", staging.name))
        })?;

    let name_expr = ident(
        mapping
            .column_for(TargetField::ProductName)
            .unwrap_or(first_column),
    );

    let target_columns: Vec<&str> = TargetField::ALL.iter().map(|f| f.column()).collect();
    let projections = mapping
        .iter()
        .map(|(field, source)| field_expr(field, source, first_column, &name_expr))
        .collect();

    let select = SelectBuilder::new()
        .select(projections)
        .from(staging.clone(), None)
        .where_clause(name_expr.is_not_null())
        .build();

    Ok(InsertBuilder::new(TableRef::new(PRODUCTS_TABLE))
        .columns(&target_columns)
        .select(select)
        .build())
}

fn field_expr(
    field: TargetField,
    source: &FieldSource,
    first_column: &str,
    name_expr: &Expr,
) -> Expr {
    let data_type = field.data_type();
    match source {
        FieldSource::Column(column) if field == TargetField::Identifier => func(
            "COALESCE",
            vec![ident(column), generated_key(UNKNOWN_KEY_PREFIX, name_expr)],
        ),
        FieldSource::Column(column) => coerce(ident(column), data_type),
        FieldSource::Fallback(Fallback::FirstColumn) => coerce(ident(first_column), data_type),
        FieldSource::Fallback(Fallback::Literal(value)) => literal(value).cast(data_type),
        FieldSource::Fallback(Fallback::GeneratedKey { prefix }) => {
            generated_key(prefix, name_expr)
        }
    }
}

/// Staging columns hold raw text; numeric targets go through a try-cast so
/// unparseable cells become NULL instead of failing the statement.
fn coerce(expr: Expr, data_type: DataType) -> Expr {
    if data_type.is_numeric() {
        expr.try_cast(data_type)
    } else {
        expr
    }
}

/// `CONCAT('<prefix>', CAST(ROW_NUMBER() OVER (ORDER BY <name>) AS text))`
fn generated_key(prefix: &str, name_expr: &Expr) -> Expr {
    let row_number = Expr::RowNumber {
        order_by: vec![OrderByExpr {
            expr: name_expr.clone(),
            direction: Some(OrderDir::Asc),
        }],
    };
    func(
        "CONCAT",
        vec![
            Expr::Text(prefix.to_string()),
            row_number.cast(DataType::text(GENERATED_KEY_DIGITS)),
        ],
    )
}

fn literal(value: &Value) -> Expr {
    match value {
        Value::Null => Expr::Null,
        Value::Int32(_) | Value::Int(_) | Value::Float(_) | Value::Decimal(_) => {
            Expr::Literal(value.to_string())
        }
        Value::Boolean(b) => Expr::Literal(if *b { "1" } else { "0" }.to_string()),
        Value::String(_) | Value::Timestamp(_) => Expr::Text(value.to_string()),
    }
}

/// Introspects `staging`, derives the mapping and runs the insert in one
/// transaction.
pub async fn migrate_products(
    adapter: &dyn SqlAdapter,
    staging: &str,
    mapper: &ColumnMapper,
) -> Result<ProductMigration, EngineError> {
    let columns = adapter.table_columns(staging).await?;
    if columns.is_empty() {
        return Err(EngineError::Schema(format!(
            "staging table {staging} does not exist or has no columns"
        )));
    }
    info!("Staging table {} has {} columns", staging, columns.len());

    let mapping = mapper.map(&columns)?;
    let insert = build_products_insert(&TableRef::parse(staging), &mapping, &columns)?;
    let (sql, params) = render(&insert, adapter.dialect());
    debug!("Products migration SQL: {}", sql);

    let rows = adapter
        .exec_in_transaction(&sql, params)
        .await
        .inspect_err(|err| error!("Products migration failed: {err}"))?;
    info!("Migrated {} products from {}", rows, staging);

    let mut result = MigrationResult::new(PRODUCTS_TABLE).with_rows(rows);
    for field in mapping.unmatched() {
        result.warn(format!(
            "{field}: no source column, using {}",
            field.fallback()
        ));
    }

    Ok(ProductMigration { mapping, result })
}
