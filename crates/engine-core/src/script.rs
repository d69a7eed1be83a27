//! Runs operator-provided `.sql` files batch by batch.

use crate::error::EngineError;
use connectors::sql::base::adapter::SqlAdapter;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptReport {
    pub path: PathBuf,
    pub batches: usize,
    /// The file did not exist; nothing was sent.
    pub skipped: bool,
}

/// Splits on lines that hold nothing but `GO`, ignoring case and
/// surrounding whitespace. Empty batches are dropped.
pub fn split_batches(script: &str) -> Vec<String> {
    let mut batches = Vec::new();
    let mut current = String::new();

    for line in script.lines() {
        if line.trim().eq_ignore_ascii_case("go") {
            push_batch(&mut batches, &mut current);
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    push_batch(&mut batches, &mut current);

    batches
}

fn push_batch(batches: &mut Vec<String>, current: &mut String) {
    let batch = current.trim();
    if !batch.is_empty() {
        batches.push(batch.to_string());
    }
    current.clear();
}

/// Executes every batch of the file in order. A missing file is logged and
/// skipped; a failing batch stops the script.
pub async fn run_script(adapter: &dyn SqlAdapter, path: &Path) -> Result<ScriptReport, EngineError> {
    let script = match tokio::fs::read_to_string(path).await {
        Ok(script) => script,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!("SQL file {} not found; skipping", path.display());
            return Ok(ScriptReport {
                path: path.to_path_buf(),
                batches: 0,
                skipped: true,
            });
        }
        Err(err) => return Err(EngineError::File(err.into())),
    };

    let batches = split_batches(&script);
    for (i, batch) in batches.iter().enumerate() {
        adapter.exec(batch).await?;
        info!("{}: batch {}/{} done", path.display(), i + 1, batches.len());
    }

    Ok(ScriptReport {
        path: path.to_path_buf(),
        batches: batches.len(),
        skipped: false,
    })
}
