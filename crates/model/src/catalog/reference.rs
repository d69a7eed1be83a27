use crate::core::{data_type::DataType, value::Value};
use rust_decimal::Decimal;
use serde::Serialize;

/// A typed value for one column of a reference row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnValue {
    pub column: String,
    pub data_type: DataType,
    pub value: ColumnExpr,
}

/// Either a bound value or a server-side "now".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ColumnExpr {
    Value(Value),
    CurrentTimestamp,
}

impl ColumnValue {
    pub fn text(column: &str, max_length: Option<u32>, value: &str) -> Self {
        Self {
            column: column.to_string(),
            data_type: DataType::Text(max_length),
            value: ColumnExpr::Value(Value::String(value.to_string())),
        }
    }

    pub fn int(column: &str, value: i32) -> Self {
        Self {
            column: column.to_string(),
            data_type: DataType::Int,
            value: ColumnExpr::Value(Value::Int32(value)),
        }
    }

    pub fn decimal(column: &str, precision: u8, scale: u8, value: Decimal) -> Self {
        Self {
            column: column.to_string(),
            data_type: DataType::decimal(precision, scale),
            value: ColumnExpr::Value(Value::Decimal(value)),
        }
    }

    pub fn now(column: &str) -> Self {
        Self {
            column: column.to_string(),
            data_type: DataType::Timestamp,
            value: ColumnExpr::CurrentTimestamp,
        }
    }
}

/// A row that must exist exactly once, identified by a natural key rather
/// than by the table's surrogate id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceRecord {
    pub table: String,
    pub key_column: String,
    pub key: String,
    /// Every column to insert, the natural key included.
    pub values: Vec<ColumnValue>,
    pub children: Vec<ChildRecord>,
}

/// A row owned by a reference record, linked through the parent's
/// surrogate id. At most one child row per parent and table is inserted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildRecord {
    pub table: String,
    /// Column of the child that stores the parent's id.
    pub parent_column: String,
    pub values: Vec<ColumnValue>,
}

/// Surrogate id column shared by the catalog tables.
pub const SURROGATE_ID_COLUMN: &str = "Id";

impl ReferenceRecord {
    pub fn new(table: &str, key_column: &str, key: &str) -> Self {
        Self {
            table: table.to_string(),
            key_column: key_column.to_string(),
            key: key.to_string(),
            values: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with(mut self, value: ColumnValue) -> Self {
        self.values.push(value);
        self
    }

    pub fn with_child(mut self, child: ChildRecord) -> Self {
        self.children.push(child);
        self
    }

    pub fn columns(&self) -> Vec<&str> {
        self.values.iter().map(|v| v.column.as_str()).collect()
    }
}

impl ChildRecord {
    pub fn new(table: &str, parent_column: &str) -> Self {
        Self {
            table: table.to_string(),
            parent_column: parent_column.to_string(),
            values: Vec::new(),
        }
    }

    pub fn with(mut self, value: ColumnValue) -> Self {
        self.values.push(value);
        self
    }
}
