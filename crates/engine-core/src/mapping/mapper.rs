use crate::{error::EngineError, mapping::rules::RuleSet};
use model::catalog::{
    field::{SourceColumn, TargetField},
    mapping::{FieldMapping, FieldSource},
};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Derives a [`FieldMapping`] from introspected columns with an ordered
/// [`RuleSet`].
#[derive(Debug, Clone, Default)]
pub struct ColumnMapper {
    rules: RuleSet,
}

impl ColumnMapper {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Columns are visited in ordinal order. Each column belongs to the first
    /// rule it matches and is assigned only if that rule's field is still
    /// free; otherwise it stays unassigned. Fields no column claimed take
    /// their fallback.
    pub fn map(&self, columns: &[SourceColumn]) -> Result<FieldMapping, EngineError> {
        let mut ordered: Vec<&SourceColumn> = columns.iter().collect();
        ordered.sort_by_key(|c| c.ordinal);

        let mut matched: BTreeMap<TargetField, String> = BTreeMap::new();
        for column in ordered {
            let lowered = column.name.to_lowercase();
            let Some(rule) = self.rules.iter().find(|r| r.predicate.matches(&lowered)) else {
                continue;
            };

            if matched.contains_key(&rule.field) {
                debug!(
                    "Column '{}' skipped; {} is already taken",
                    column.name, rule.field
                );
            } else {
                debug!(
                    "Column '{}' -> {} ({})",
                    column.name, rule.field, rule.predicate
                );
                matched.insert(rule.field, column.name.clone());
            }
        }

        let mapping = FieldMapping::new(matched)?;
        for field in mapping.unmatched() {
            if let FieldSource::Fallback(fallback) = mapping.source(*field) {
                warn!("No source column for {field}; using {fallback}");
            }
        }

        Ok(mapping)
    }
}

/// One line per field, for printing.
pub fn describe(mapping: &FieldMapping) -> Vec<String> {
    mapping
        .iter()
        .map(|(field, source)| match source {
            FieldSource::Column(column) => format!("{:<12} <- {column}", field.as_str()),
            FieldSource::Fallback(fallback) => {
                format!("{:<12} <- {fallback} (fallback)", field.as_str())
            }
        })
        .collect()
}
