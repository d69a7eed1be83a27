//! Dry run of the products migration over a CSV file, evaluated in
//! process with the same try-cast and fallback rules as the SQL statement.

use crate::{error::EngineError, mapping::mapper::ColumnMapper, migrate::products::PRODUCTS_TABLE};
use connectors::file::csv::reader::{CsvReader, CsvRow};
use model::{
    catalog::{
        field::{Fallback, SourceColumn, TargetField, UNKNOWN_KEY_PREFIX},
        mapping::{FieldMapping, FieldSource},
    },
    core::{data_type::DataType, value::Value},
    records::{result::MigrationResult, row::RowData},
};
use rust_decimal::{Decimal, RoundingStrategy};
use std::{collections::BTreeMap, path::Path, str::FromStr};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Preview {
    pub mapping: FieldMapping,
    pub result: MigrationResult,
    /// Transformed rows keyed by `Products` column.
    pub rows: Vec<RowData>,
    pub cast_warnings: usize,
    pub excluded: usize,
}

/// Converts a raw cell the way `TRY_CAST` would: `None` when the text does
/// not parse or does not fit the declared precision.
pub fn try_convert(text: &str, data_type: &DataType) -> Option<Value> {
    let text = text.trim();
    match data_type {
        DataType::Int => text.parse::<i32>().ok().map(Value::Int32),
        DataType::BigInt => text.parse::<i64>().ok().map(Value::Int),
        DataType::Float => text
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::Float),
        DataType::Decimal { precision, scale } => {
            parse_decimal(text, *precision, *scale).map(Value::Decimal)
        }
        DataType::Text(_) | DataType::Boolean | DataType::Timestamp => {
            Some(Value::String(text.to_string()))
        }
    }
}

fn parse_decimal(text: &str, precision: u8, scale: u8) -> Option<Decimal> {
    let unsigned = text.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(text);
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty())
        || !digits_only(int_part)
        || !digits_only(frac_part)
    {
        return None;
    }

    let value = Decimal::from_str(text.strip_prefix('+').unwrap_or(text)).ok()?;
    let rounded = value.round_dp_with_strategy(scale as u32, RoundingStrategy::MidpointAwayFromZero);
    let int_digits = precision.saturating_sub(scale) as u32;
    if int_digits >= 28 {
        return Some(rounded);
    }
    let bound = Decimal::from_i128_with_scale(10i128.pow(int_digits), 0);
    (rounded.abs() < bound).then_some(rounded)
}

/// Applies `mapping` to `rows`, whose cells are ordered like `headers`.
pub fn preview(headers: &[String], rows: &[CsvRow], mapping: &FieldMapping) -> Preview {
    let index_of = |column: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(column));
    let name_index = mapping
        .column_for(TargetField::ProductName)
        .and_then(index_of)
        .unwrap_or(0);

    let kept: Vec<&CsvRow> = rows
        .iter()
        .filter(|row| row.get(name_index).is_some_and(Option::is_some))
        .collect();
    let excluded = rows.len() - kept.len();

    // Row numbers for generated keys follow product-name order.
    let name_of = |row: &CsvRow| {
        row.get(name_index)
            .cloned()
            .flatten()
            .unwrap_or_default()
            .to_lowercase()
    };
    let mut order: Vec<usize> = (0..kept.len()).collect();
    order.sort_by_key(|&i| name_of(kept[i]));
    let mut row_numbers = vec![0usize; kept.len()];
    for (position, &index) in order.iter().enumerate() {
        row_numbers[index] = position + 1;
    }

    let mut failures: BTreeMap<TargetField, usize> = BTreeMap::new();
    let mut out = Vec::with_capacity(kept.len());
    for (i, row) in kept.iter().enumerate() {
        let cell = |index: Option<usize>| index.and_then(|idx| row.get(idx).cloned().flatten());
        let generated = |prefix: &str| Value::String(format!("{prefix}{}", row_numbers[i]));

        let values = mapping.iter().map(|(field, source)| {
            let value = match source {
                FieldSource::Column(column) => {
                    let raw = cell(index_of(column.as_str()));
                    match raw {
                        Some(text) => convert(field, &text, &mut failures),
                        None if field == TargetField::Identifier => {
                            generated(UNKNOWN_KEY_PREFIX)
                        }
                        None => Value::Null,
                    }
                }
                FieldSource::Fallback(Fallback::FirstColumn) => match cell(Some(0)) {
                    Some(text) => convert(field, &text, &mut failures),
                    None => Value::Null,
                },
                FieldSource::Fallback(Fallback::Literal(value)) => value.clone(),
                FieldSource::Fallback(Fallback::GeneratedKey { prefix }) => generated(prefix),
            };
            (field.column(), value)
        });
        out.push(RowData::from_pairs(values));
    }

    let cast_warnings = failures.values().sum();
    let mut result = MigrationResult::new(PRODUCTS_TABLE).with_rows(out.len() as u64);
    for field in mapping.unmatched() {
        result.warn(format!("{field}: no source column, using {}", field.fallback()));
    }
    for (field, count) in &failures {
        warn!("{} {} value(s) could not be converted and become NULL", count, field);
        result.warn(format!(
            "{field}: {count} value(s) not convertible to {}, set to NULL",
            field.data_type()
        ));
    }
    if excluded > 0 {
        result.warn(format!("{excluded} row(s) without a product name excluded"));
    }

    Preview {
        mapping: mapping.clone(),
        result,
        rows: out,
        cast_warnings,
        excluded,
    }
}

fn convert(field: TargetField, text: &str, failures: &mut BTreeMap<TargetField, usize>) -> Value {
    match try_convert(text, &field.data_type()) {
        Some(value) => value,
        None => {
            *failures.entry(field).or_default() += 1;
            Value::Null
        }
    }
}

/// Reads `path`, derives the mapping from its sanitized headers and
/// previews every row.
pub fn preview_file(path: &Path, mapper: &ColumnMapper) -> Result<Preview, EngineError> {
    let mut reader = CsvReader::open(path)?;
    let headers = reader.headers().to_vec();
    let rows = reader.read_all()?;

    let mapping = mapper.map(&SourceColumn::from_names(headers.iter().cloned()))?;
    let preview = preview(&headers, &rows, &mapping);
    info!(
        "Preview of {}: {} row(s) would be written, {} excluded, {} cast warning(s)",
        path.display(),
        preview.rows.len(),
        preview.excluded,
        preview.cast_warnings
    );
    Ok(preview)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn cells(values: &[&str]) -> CsvRow {
        values
            .iter()
            .map(|v| (!v.is_empty()).then(|| v.to_string()))
            .collect()
    }

    #[test]
    fn test_try_convert_matches_try_cast() {
        let price = DataType::decimal(10, 2);
        let rating = DataType::decimal(3, 2);

        assert_eq!(try_convert("N/A", &price), None);
        assert_eq!(try_convert("", &price), None);
        assert_eq!(try_convert(".", &price), None);
        assert_eq!(
            try_convert(" 19.999 ", &price),
            Some(Value::Decimal(Decimal::new(2000, 2)))
        );
        assert_eq!(try_convert("+4.5", &rating), Some(Value::Decimal(Decimal::new(450, 2))));
        assert_eq!(try_convert("45", &rating), None);
        assert_eq!(try_convert("9.999", &rating), None);
        assert_eq!(try_convert("1e3", &price), None);

        assert_eq!(try_convert("1200", &DataType::Int), Some(Value::Int32(1200)));
        assert_eq!(try_convert("4.5", &DataType::Int), None);
        assert_eq!(try_convert("3000000000", &DataType::Int), None);
        assert_eq!(
            try_convert("2147483647", &DataType::Int),
            Some(Value::Int32(i32::MAX))
        );
        assert_eq!(
            try_convert("Whey", &DataType::text(200)),
            Some(Value::String("Whey".into()))
        );
    }

    #[test]
    fn test_preview_keeps_rows_with_bad_numbers() {
        let headers: Vec<String> = ["Product_Name", "Brand", "Price", "Num_of_Reviews", "ASIN"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = vec![
            cells(&["Whey Gold", "OPTIMUM NUTRITION", "N/A", "1,204", "B01"]),
            cells(&["", "BIRDMAN", "10.00", "3", "B02"]),
            cells(&["Vegan Blend", "ORGAIN", "29.90", "87", ""]),
        ];
        let mapping = ColumnMapper::default()
            .map(&SourceColumn::from_names(headers.iter().cloned()))
            .unwrap();

        let preview = preview(&headers, &rows, &mapping);

        assert_eq!(preview.rows.len(), 2);
        assert_eq!(preview.excluded, 1);
        assert_eq!(preview.cast_warnings, 2);

        let whey = &preview.rows[0];
        assert_eq!(whey.get_value("Price"), Value::Null);
        assert_eq!(whey.get_value("ReviewCount"), Value::Null);
        assert_eq!(whey.get_value("ASIN"), Value::from("B01"));
        assert_eq!(whey.get_value("Category"), Value::Null);

        let vegan = &preview.rows[1];
        assert_eq!(vegan.get_value("Price"), Value::Decimal(Decimal::new(2990, 2)));
        assert_eq!(vegan.get_value("ReviewCount"), Value::Int32(87));
        // Keys follow product-name order, and "vegan blend" < "whey gold".
        assert_eq!(vegan.get_value("ASIN"), Value::from("UNK-1"));

        assert!(preview.result.is_success());
        assert_eq!(preview.result.rows_written, 2);
    }

    #[test]
    fn test_preview_fallbacks_without_matches() {
        let headers = vec!["Title".to_string(), "Cost".to_string()];
        let rows = vec![cells(&["b item", "1"]), cells(&["a item", "2"])];
        let mapping = ColumnMapper::default()
            .map(&SourceColumn::from_names(headers.iter().cloned()))
            .unwrap();

        let preview = preview(&headers, &rows, &mapping);
        assert_eq!(preview.rows[0].get_value("ProductName"), Value::from("b item"));
        assert_eq!(preview.rows[0].get_value("ASIN"), Value::from("UNK-2"));
        assert_eq!(preview.rows[1].get_value("ASIN"), Value::from("UNK-1"));
        assert_eq!(preview.rows[0].get_value("ReviewCount"), Value::Int32(0));
        assert_eq!(preview.rows[0].get_value("Brand"), Value::Null);
        assert_eq!(preview.cast_warnings, 0);
    }

    #[test]
    fn test_preview_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Product Name,Rating,# of Reviews\nWhey,4.6,12\nCasein,excellent,3\n")
            .unwrap();

        let preview = preview_file(file.path(), &ColumnMapper::default()).unwrap();
        assert_eq!(preview.mapping.column_for(TargetField::Reviews), Some("Num_of_Reviews"));
        assert_eq!(preview.rows.len(), 2);
        assert_eq!(preview.cast_warnings, 1);
        assert_eq!(preview.rows[1].get_value("Rating"), Value::Null);
    }
}
