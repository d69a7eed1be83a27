//! Creates the reference tables the operator scripts do not cover and
//! seeds their rows.

use crate::{
    error::EngineError,
    reference::{
        catalog,
        seed::{SeedReport, seed},
        store::SqlReferenceStore,
    },
};
use connectors::sql::base::adapter::SqlAdapter;
use model::{catalog::reference::SURROGATE_ID_COLUMN, core::data_type::DataType};
use planner::query::{
    ast::{common::TableRef, create_table::CreateTable, expr::Expr},
    builder::create_table::CreateTableBuilder,
    renderer::render,
};
use tracing::{debug, info};

pub const CATEGORIES_TABLE: &str = "Categories";
pub const BRANDS_TABLE: &str = "Brands";

pub fn categories_table() -> CreateTable {
    CreateTableBuilder::new(TableRef::new(CATEGORIES_TABLE))
        .if_not_exists()
        .identity_key(SURROGATE_ID_COLUMN)
        .column("Name", DataType::text(100))
        .not_null()
        .unique()
        .add()
        .column("Description", DataType::text(500))
        .add()
        .column("ParentCategoryId", DataType::Int)
        .add()
        .column("CreatedAt", DataType::Timestamp)
        .default_value(Expr::CurrentTimestamp)
        .add()
        .foreign_key(
            "ParentCategoryId",
            TableRef::new(CATEGORIES_TABLE),
            SURROGATE_ID_COLUMN,
        )
        .build()
}

pub fn brands_table() -> CreateTable {
    CreateTableBuilder::new(TableRef::new(BRANDS_TABLE))
        .if_not_exists()
        .identity_key(SURROGATE_ID_COLUMN)
        .column("Name", DataType::text(100))
        .not_null()
        .unique()
        .add()
        .column("Description", DataType::text(500))
        .add()
        .column("MarketShare", DataType::decimal(5, 4))
        .add()
        .column("Country", DataType::text(50))
        .add()
        .column("Website", DataType::text(200))
        .add()
        .column("CreatedAt", DataType::Timestamp)
        .default_value(Expr::CurrentTimestamp)
        .add()
        .build()
}

/// Creates `Categories` and `Brands` when absent, then seeds them.
pub async fn bootstrap(adapter: &dyn SqlAdapter) -> Result<Vec<SeedReport>, EngineError> {
    for table in [categories_table(), brands_table()] {
        let (sql, _) = render(&table, adapter.dialect());
        debug!("Bootstrap DDL: {}", sql);
        adapter.exec(&sql).await?;
        info!("Table {} is in place", table.table.name);
    }

    let store = SqlReferenceStore::new(adapter);
    let mut records = catalog::categories();
    records.extend(catalog::brands());
    seed(&store, &records).await
}
