//! The individual steps behind each subcommand and the `run` sequence that
//! chains them.

use crate::{
    error::CliError,
    output::print_result,
    settings::{AppConfig, CsvImport},
};
use connectors::{file::csv::error::FileError, sql::base::adapter::SqlAdapter};
use engine_core::{
    error::EngineError,
    mapping::mapper::{ColumnMapper, describe},
    migrate::{analysis::migrate_analysis, products::migrate_products},
    reference::{
        catalog,
        seed::{SeedReport, seed},
        store::SqlReferenceStore,
    },
    schema::bootstrap::bootstrap,
    script::{ScriptReport, run_script},
    staging::import_csv,
    verify::report::{COUNTED_TABLES, TableCount, row_counts},
};
use model::{catalog::reference::ReferenceRecord, records::result::MigrationResult};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub bootstrap: Vec<SeedReport>,
    pub scripts: Vec<ScriptReport>,
    pub imports: Vec<MigrationResult>,
    pub mapping: Vec<String>,
    pub products: Option<MigrationResult>,
    pub analysis: Option<MigrationResult>,
    pub reference: Vec<SeedReport>,
    pub counts: Vec<TableCount>,
}

pub fn print_seed(reports: &[SeedReport]) {
    for report in reports {
        println!(
            "{:<12} {:<28} {}",
            report.table, report.key, report.outcome
        );
    }
}

pub async fn run_bootstrap(adapter: &dyn SqlAdapter) -> Result<Vec<SeedReport>, CliError> {
    let reports = bootstrap(adapter).await?;
    print_seed(&reports);
    Ok(reports)
}

pub async fn run_scripts(
    adapter: &dyn SqlAdapter,
    files: &[PathBuf],
) -> Result<Vec<ScriptReport>, CliError> {
    let mut reports = Vec::with_capacity(files.len());
    for file in files {
        let report = run_script(adapter, file).await?;
        if report.skipped {
            println!("{:<40} not found, skipped", file.display());
        } else {
            println!("{:<40} {} batch(es)", file.display(), report.batches);
        }
        reports.push(report);
    }
    Ok(reports)
}

/// Staging name for a CSV given without one: the lower-cased file stem.
pub fn default_staging_name(path: &Path) -> Result<String, CliError> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_lowercase)
        .ok_or_else(|| CliError::Config(format!("cannot derive a name from {}", path.display())))
}

pub async fn run_import(
    adapter: &dyn SqlAdapter,
    path: &Path,
    name: &str,
) -> Result<MigrationResult, CliError> {
    let result = import_csv(adapter, path, name).await?;
    print_result(&result);
    Ok(result)
}

/// Imports every configured file; a file that does not exist is reported
/// and skipped.
pub async fn run_imports(
    adapter: &dyn SqlAdapter,
    files: &[CsvImport],
) -> Result<Vec<MigrationResult>, CliError> {
    let mut results = Vec::with_capacity(files.len());
    for file in files {
        match import_csv(adapter, &file.path, &file.name).await {
            Ok(result) => {
                print_result(&result);
                results.push(result);
            }
            Err(EngineError::File(FileError::NotFound(path))) => {
                warn!("CSV {} not found; skipping", path);
                let mut result = MigrationResult::new(&file.name);
                result.warn(format!("{path} not found"));
                print_result(&result);
                results.push(result);
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(results)
}

/// Products first, then the analysis rows that join onto them.
pub async fn run_migrate(
    adapter: &dyn SqlAdapter,
    mapper: &ColumnMapper,
    products_staging: &str,
    analysis_staging: Option<&str>,
) -> Result<(Vec<String>, MigrationResult, Option<MigrationResult>), CliError> {
    let migration = migrate_products(adapter, products_staging, mapper).await?;
    let mapping = describe(&migration.mapping);
    println!("Mapping from {products_staging}:");
    for line in &mapping {
        println!("  {line}");
    }
    print_result(&migration.result);

    let analysis = match analysis_staging {
        Some(staging) => {
            let result = migrate_analysis(adapter, staging).await?;
            print_result(&result);
            Some(result)
        }
        None => None,
    };

    Ok((mapping, migration.result, analysis))
}

pub async fn run_seed(
    adapter: &dyn SqlAdapter,
    records: &[ReferenceRecord],
) -> Result<Vec<SeedReport>, CliError> {
    let store = SqlReferenceStore::new(adapter);
    let reports = seed(&store, records).await?;
    print_seed(&reports);
    Ok(reports)
}

pub async fn run_all(adapter: &dyn SqlAdapter, config: &AppConfig) -> Result<RunReport, CliError> {
    let mut report = RunReport::default();

    info!("Step 1/6: reference tables");
    report.bootstrap = run_bootstrap(adapter).await?;

    info!("Step 2/6: SQL scripts");
    report.scripts = run_scripts(adapter, &config.pipeline.sql_files).await?;

    info!("Step 3/6: CSV staging");
    report.imports = run_imports(adapter, &config.pipeline.csv_files).await?;

    info!("Step 4/6: products and analysis");
    let (mapping, products, analysis) = run_migrate(
        adapter,
        &config.mapper(),
        &config.pipeline.products_staging,
        Some(&config.pipeline.analysis_staging),
    )
    .await?;
    report.mapping = mapping;
    report.products = Some(products);
    report.analysis = analysis;

    info!("Step 5/6: reference product");
    report.reference = run_seed(adapter, &[catalog::reference_product()]).await?;

    info!("Step 6/6: summary");
    report.counts = row_counts(adapter, &COUNTED_TABLES).await;
    for count in &report.counts {
        match count.rows {
            Some(rows) => println!("{:<24} {}", count.table, rows),
            None => println!("{:<24} n/a", count.table),
        }
    }

    Ok(report)
}
