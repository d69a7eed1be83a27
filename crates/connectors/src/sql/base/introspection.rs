//! Parsing of the introspection queries shared by both adapters.

use crate::sql::base::{
    adapter::{ServerInfo, TableName},
    error::DbError,
};
use model::{catalog::field::SourceColumn, records::row::RowData};

pub const COL_TABLE_COUNT: &str = "table_count";
pub const COL_COLUMN_NAME: &str = "column_name";
pub const COL_ORDINAL: &str = "ordinal_position";
pub const COL_TABLE_SCHEMA: &str = "table_schema";
pub const COL_TABLE_NAME: &str = "table_name";

pub fn parse_exists(rows: &[RowData]) -> bool {
    rows.first()
        .and_then(|row| row.get_value(COL_TABLE_COUNT).as_i64())
        .unwrap_or(0)
        > 0
}

pub fn parse_columns(rows: &[RowData]) -> Result<Vec<SourceColumn>, DbError> {
    rows.iter()
        .map(|row| {
            let name = row
                .get_string(COL_COLUMN_NAME)
                .ok_or_else(|| DbError::Decode(format!("{COL_COLUMN_NAME} is NULL")))?;
            let ordinal = row
                .get_value(COL_ORDINAL)
                .as_i64()
                .ok_or_else(|| DbError::Decode(format!("{COL_ORDINAL} is NULL")))?;
            Ok(SourceColumn::new(name, ordinal as usize))
        })
        .collect()
}

pub fn parse_tables(rows: &[RowData]) -> Vec<TableName> {
    rows.iter()
        .filter_map(|row| {
            Some(TableName {
                schema: row.get_string(COL_TABLE_SCHEMA)?,
                name: row.get_string(COL_TABLE_NAME)?,
            })
        })
        .collect()
}

pub fn parse_server_info(rows: &[RowData]) -> Result<ServerInfo, DbError> {
    let row = rows
        .first()
        .ok_or_else(|| DbError::Decode("server info query returned no rows".into()))?;
    Ok(ServerInfo {
        version: row.get_string("version").unwrap_or_default(),
        database: row.get_string("database_name").unwrap_or_default(),
        server_time: row.get_string("server_time").unwrap_or_default(),
    })
}
