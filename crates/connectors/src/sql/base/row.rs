//! Conversion of driver rows into [`RowData`].

use chrono::NaiveDateTime;
use model::{core::value::Value, records::row::RowData};
use rust_decimal::Decimal;
use tiberius::{ColumnData, FromSql};
use tokio_postgres::{Row as PgRow, types::Type};
use tracing::warn;

pub enum DbRow<'a> {
    MsSqlRow(&'a tiberius::Row),
    PostgresRow(&'a PgRow),
}

impl DbRow<'_> {
    pub fn to_row_data(&self) -> RowData {
        match self {
            DbRow::MsSqlRow(row) => RowData::from_pairs(
                row.cells()
                    .map(|(column, data)| (column.name().to_string(), mssql_value(data))),
            ),
            DbRow::PostgresRow(row) => RowData::from_pairs(
                row.columns()
                    .iter()
                    .enumerate()
                    .map(|(i, column)| (column.name().to_string(), pg_value(row, i, column.type_()))),
            ),
        }
    }
}

fn mssql_value(data: &ColumnData<'static>) -> Value {
    let value = match data {
        ColumnData::U8(v) => v.map(|v| Value::Int32(v as i32)),
        ColumnData::I16(v) => v.map(|v| Value::Int32(v as i32)),
        ColumnData::I32(v) => v.map(Value::Int32),
        ColumnData::I64(v) => v.map(Value::Int),
        ColumnData::F32(v) => v.map(|v| Value::Float(v as f64)),
        ColumnData::F64(v) => v.map(Value::Float),
        ColumnData::Bit(v) => v.map(Value::Boolean),
        ColumnData::String(v) => v.as_ref().map(|s| Value::String(s.to_string())),
        ColumnData::Guid(v) => v.as_ref().map(|g| Value::String(g.to_string())),
        ColumnData::Numeric(v) => v.as_ref().and_then(|n| {
            Decimal::try_from_i128_with_scale(n.value(), n.scale() as u32)
                .ok()
                .map(Value::Decimal)
        }),
        ColumnData::DateTime(_)
        | ColumnData::SmallDateTime(_)
        | ColumnData::DateTime2(_) => NaiveDateTime::from_sql(data)
            .ok()
            .flatten()
            .map(Value::Timestamp),
        other => {
            warn!("Unsupported SQL Server column data: {:?}", other);
            None
        }
    };
    value.unwrap_or(Value::Null)
}

fn pg_value(row: &PgRow, idx: usize, ty: &Type) -> Value {
    let value = match *ty {
        Type::INT2 => row
            .try_get::<_, Option<i16>>(idx)
            .ok()
            .flatten()
            .map(|v| Value::Int32(v as i32)),
        Type::INT4 => row.try_get::<_, Option<i32>>(idx).ok().flatten().map(Value::Int32),
        Type::INT8 => row.try_get::<_, Option<i64>>(idx).ok().flatten().map(Value::Int),
        Type::FLOAT4 => row
            .try_get::<_, Option<f32>>(idx)
            .ok()
            .flatten()
            .map(|v| Value::Float(v as f64)),
        Type::FLOAT8 => row.try_get::<_, Option<f64>>(idx).ok().flatten().map(Value::Float),
        Type::NUMERIC => row
            .try_get::<_, Option<Decimal>>(idx)
            .ok()
            .flatten()
            .map(Value::Decimal),
        Type::BOOL => row.try_get::<_, Option<bool>>(idx).ok().flatten().map(Value::Boolean),
        Type::TIMESTAMP => row
            .try_get::<_, Option<NaiveDateTime>>(idx)
            .ok()
            .flatten()
            .map(Value::Timestamp),
        Type::TIMESTAMPTZ => row
            .try_get::<_, Option<chrono::DateTime<chrono::Utc>>>(idx)
            .ok()
            .flatten()
            .map(|v| Value::Timestamp(v.naive_utc())),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => row
            .try_get::<_, Option<String>>(idx)
            .ok()
            .flatten()
            .map(Value::String),
        _ => {
            warn!("Unsupported PostgreSQL column type: {}", ty.name());
            None
        }
    };
    value.unwrap_or(Value::Null)
}
