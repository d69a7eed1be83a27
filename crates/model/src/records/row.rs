use crate::core::value::Value;
use serde::{Deserialize, Serialize};

/// One named cell of a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub name: String,
    pub value: Value,
}

/// A row read back from the database or from a staging file, columns kept
/// in source order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RowData {
    pub field_values: Vec<FieldValue>,
}

impl RowData {
    pub fn new(field_values: Vec<FieldValue>) -> Self {
        RowData { field_values }
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        RowData {
            field_values: pairs
                .into_iter()
                .map(|(name, value)| FieldValue {
                    name: name.into(),
                    value,
                })
                .collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.field_values
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(field))
    }

    /// The cell's value, `Null` when the column is absent.
    pub fn get_value(&self, field: &str) -> Value {
        self.get(field)
            .map(|f| f.value.clone())
            .unwrap_or(Value::Null)
    }

    pub fn get_string(&self, field: &str) -> Option<String> {
        self.get(field).and_then(|f| f.value.as_string())
    }

    pub fn get_at(&self, index: usize) -> Option<&Value> {
        self.field_values.get(index).map(|f| &f.value)
    }

    pub fn len(&self) -> usize {
        self.field_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field_values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_is_case_insensitive() {
        let row = RowData::from_pairs([("ASIN", Value::from("B01")), ("Price", Value::Null)]);
        assert_eq!(row.get_string("asin").as_deref(), Some("B01"));
        assert_eq!(row.get_value("price"), Value::Null);
        assert_eq!(row.get_value("missing"), Value::Null);
        assert_eq!(row.get_at(0), Some(&Value::from("B01")));
    }
}
