use crate::catalog::field::{Fallback, TargetField};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Where a target field takes its value from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldSource {
    Column(String),
    Fallback(Fallback),
}

impl FieldSource {
    pub fn column(&self) -> Option<&str> {
        match self {
            FieldSource::Column(name) => Some(name),
            FieldSource::Fallback(_) => None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum MappingError {
    #[error("Source column '{column}' is assigned to both {first} and {second}")]
    ColumnReused {
        column: String,
        first: TargetField,
        second: TargetField,
    },
}

/// A complete, read-only assignment of every [`TargetField`] to either a
/// source column or its fallback.
///
/// Built once per migration run. A field holds at most one source column
/// and a source column feeds at most one field; both are checked on
/// construction. Column names are compared exactly, since a staging table
/// may hold columns that differ only in case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMapping {
    entries: BTreeMap<TargetField, FieldSource>,
    unmatched: Vec<TargetField>,
}

impl FieldMapping {
    /// Builds the mapping from matched columns. Fields missing from
    /// `matched` resolve to their fallback and are listed as unmatched.
    pub fn new(matched: BTreeMap<TargetField, String>) -> Result<Self, MappingError> {
        let mut seen: BTreeMap<String, TargetField> = BTreeMap::new();
        for (field, column) in &matched {
            if let Some(first) = seen.insert(column.clone(), *field) {
                return Err(MappingError::ColumnReused {
                    column: column.clone(),
                    first,
                    second: *field,
                });
            }
        }

        let mut entries = BTreeMap::new();
        let mut unmatched = Vec::new();
        for field in TargetField::ALL {
            match matched.get(&field) {
                Some(column) => {
                    entries.insert(field, FieldSource::Column(column.clone()));
                }
                None => {
                    entries.insert(field, FieldSource::Fallback(field.fallback()));
                    unmatched.push(field);
                }
            }
        }

        Ok(Self { entries, unmatched })
    }

    pub fn source(&self, field: TargetField) -> &FieldSource {
        // Every field is inserted by `new`.
        &self.entries[&field]
    }

    pub fn column_for(&self, field: TargetField) -> Option<&str> {
        self.source(field).column()
    }

    /// Fields in INSERT column order with their sources.
    pub fn iter(&self) -> impl Iterator<Item = (TargetField, &FieldSource)> {
        self.entries.iter().map(|(field, source)| (*field, source))
    }

    pub fn unmatched(&self) -> &[TargetField] {
        &self.unmatched
    }

    pub fn matched_columns(&self) -> HashSet<&str> {
        self.entries
            .values()
            .filter_map(FieldSource::column)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.unmatched.is_empty()
    }
}
