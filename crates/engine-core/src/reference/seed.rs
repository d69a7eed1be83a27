use crate::{error::EngineError, reference::store::ReferenceStore};
use model::catalog::reference::ReferenceRecord;
use serde::Serialize;
use std::fmt;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeedOutcome {
    Inserted,
    AlreadyPresent,
}

impl fmt::Display for SeedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedOutcome::Inserted => write!(f, "inserted"),
            SeedOutcome::AlreadyPresent => write!(f, "already present"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedReport {
    pub table: String,
    pub key: String,
    pub outcome: SeedOutcome,
    pub children_inserted: u64,
}

/// Inserts each record unless its natural key is already stored, then adds
/// whichever of its child rows are missing. Safe to run any number of times.
pub async fn seed(
    store: &dyn ReferenceStore,
    records: &[ReferenceRecord],
) -> Result<Vec<SeedReport>, EngineError> {
    let mut reports = Vec::with_capacity(records.len());

    for record in records {
        let outcome = if store.exists(record).await? {
            SeedOutcome::AlreadyPresent
        } else if store.insert(record).await? > 0 {
            SeedOutcome::Inserted
        } else {
            // Someone else inserted it between the check and the insert.
            SeedOutcome::AlreadyPresent
        };

        let mut children_inserted = 0;
        for child in &record.children {
            children_inserted += store.insert_child(record, child).await?;
        }

        info!(
            "{} '{}': {} ({} child row(s) added)",
            record.table, record.key, outcome, children_inserted
        );
        reports.push(SeedReport {
            table: record.table.clone(),
            key: record.key.clone(),
            outcome,
            children_inserted,
        });
    }

    Ok(reports)
}
