use crate::error::CliError;
use engine_core::verify::{
    report::{TableCount, VerifyReport},
    users::UserSummary,
};
use model::records::result::MigrationResult;
use serde::Serialize;
use std::path::Path;

fn report_json<T: Serialize>(report: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(report).map_err(CliError::JsonSerialize)
}

/// Writes the JSON report to `path`, or to stdout when no path is given.
pub async fn emit_report<T: Serialize>(report: &T, path: Option<&Path>) -> Result<(), CliError> {
    let json = report_json(report)?;
    match path {
        Some(path) => tokio::fs::write(path, json).await?,
        None => println!("{json}"),
    }
    Ok(())
}

pub fn print_result(result: &MigrationResult) {
    println!("{:<20} {} row(s)", result.table, result.rows_written);
    for warning in &result.warnings {
        println!("  warning: {warning}");
    }
    for error in &result.errors {
        println!("  error: {error}");
    }
}

fn print_counts(title: &str, counts: &[TableCount]) {
    println!("{title}");
    println!("-----------------------------");
    for count in counts {
        match (count.rows, &count.error) {
            (Some(rows), _) => println!("{:<24} {}", count.table, rows),
            (None, Some(error)) => println!("{:<24} error: {}", count.table, error),
            (None, None) => println!("{:<24} n/a", count.table),
        }
    }
}

pub fn print_verify(report: &VerifyReport) {
    println!("Server:   {}", report.server.version.lines().next().unwrap_or_default());
    println!("Database: {}", report.server.database);
    println!("Time:     {}", report.server.server_time);
    println!();

    println!("Tables ({}):", report.tables.len());
    for table in &report.tables {
        println!("  {table}");
    }
    println!();

    if report.has_required_tables() {
        println!("All required tables are present.");
    } else {
        println!("Missing required tables:");
        for table in &report.missing {
            println!("  {table}");
        }
        println!("Run the table creation scripts (exec-sql) before importing.");
    }
    println!();

    print_counts("Row counts:", &report.counts);
    if !report.staging.is_empty() {
        println!();
        print_counts("Staging tables:", &report.staging);
    }
}

pub fn print_users(users: &[UserSummary]) {
    println!("{:<6} {:<24} {:<32} {:<16} {}", "Id", "Name", "Email", "Password", "Length");
    for user in users {
        println!(
            "{:<6} {:<24} {:<32} {:<16} {}",
            user.id.map(|id| id.to_string()).unwrap_or_default(),
            user.name.as_deref().unwrap_or("-"),
            user.email.as_deref().unwrap_or("-"),
            user.masked_password,
            user.password_length
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_report_written_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        let mut result = MigrationResult::new("Products").with_rows(42);
        result.warn("No source column for Brand; using NULL");

        emit_report(&result, Some(&path)).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["table"], "Products");
        assert_eq!(written["rows_written"], 42);
        assert_eq!(written["warnings"][0], "No source column for Brand; using NULL");
    }
}
