use crate::{
    commands::{Commands, CredentialSource},
    credentials::{ConsoleProvider, CredentialProvider, EnvProvider},
    env::EnvManager,
    error::CliError,
    settings::{AppConfig, OVERRIDE_VARS},
};
use clap::Parser;
use connectors::sql::base::adapter::SqlAdapter;
use engine_core::{
    migrate::preview::preview_file,
    reference::catalog,
    verify::{report::verify, users},
};
use model::records::{result::MigrationResult, row::RowData};
use serde::Serialize;
use std::{path::Path, process::ExitCode};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod conn;
mod credentials;
mod diagnostics;
mod env;
mod error;
mod output;
mod pipeline;
mod settings;

#[derive(Parser)]
#[command(
    name = "catalog-loader",
    version,
    about = "Sets up and loads the product catalog database"
)]
struct Cli {
    #[arg(long, global = true, help = "JSON settings file")]
    config: Option<std::path::PathBuf>,

    #[arg(long, global = true, help = "KEY=VALUE file loaded over the environment")]
    env_file: Option<std::path::PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = CredentialSource::Console)]
    credentials: CredentialSource,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("{}", diagnostics::describe(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut env = EnvManager::new();
    if let Some(path) = &cli.env_file {
        env.load_from_file(path)?;
    }
    let config = AppConfig::load(cli.config.as_deref())?.apply_env(&env)?;
    for key in OVERRIDE_VARS {
        if let Some(shown) = env.display(key) {
            info!("Setting from environment: {shown}");
        }
    }

    if let Commands::Preview {
        file,
        limit,
        output,
    } = &cli.command
    {
        return run_preview(&config, file, *limit, output.as_deref()).await;
    }

    let mut provider: Box<dyn CredentialProvider> = match cli.credentials {
        CredentialSource::Console => Box::new(ConsoleProvider::new(
            std::io::stdin().lock(),
            std::io::stdout(),
        )),
        CredentialSource::Env => Box::new(EnvProvider::new(env.clone())),
    };

    let adapter = conn::connect(&config.database, provider.as_mut()).await?;
    let outcome = dispatch(&cli.command, adapter.get_sql(), &config, provider.as_mut()).await;
    if let Err(err) = adapter.close().await {
        warn!("Closing the connection failed: {err}");
    }
    outcome
}

async fn dispatch(
    command: &Commands,
    adapter: &dyn SqlAdapter,
    config: &AppConfig,
    provider: &mut dyn CredentialProvider,
) -> Result<(), CliError> {
    match command {
        Commands::TestConn => {
            conn::ping(adapter).await?;
        }
        Commands::Bootstrap => {
            pipeline::run_bootstrap(adapter).await?;
        }
        Commands::Import { file, name } => match file {
            Some(file) => {
                let name = match name {
                    Some(name) => name.clone(),
                    None => pipeline::default_staging_name(file)?,
                };
                pipeline::run_import(adapter, file, &name).await?;
            }
            None => {
                pipeline::run_imports(adapter, &config.pipeline.csv_files).await?;
            }
        },
        Commands::ExecSql { files } => {
            let files = if files.is_empty() {
                &config.pipeline.sql_files
            } else {
                files
            };
            pipeline::run_scripts(adapter, files).await?;
        }
        Commands::Migrate {
            staging,
            skip_analysis,
        } => {
            let products_staging = staging
                .as_deref()
                .unwrap_or(&config.pipeline.products_staging);
            let analysis_staging =
                (!skip_analysis).then_some(config.pipeline.analysis_staging.as_str());
            pipeline::run_migrate(adapter, &config.mapper(), products_staging, analysis_staging)
                .await?;
        }
        Commands::Seed => {
            pipeline::run_seed(adapter, &catalog::all()).await?;
        }
        Commands::Verify { output } => {
            let report = verify(adapter).await?;
            match output {
                Some(path) => output::emit_report(&report, Some(path.as_path())).await?,
                None => output::print_verify(&report),
            }
            if !report.has_required_tables() {
                return Err(CliError::MissingTables(report.missing));
            }
        }
        Commands::Users { check_login } => {
            let users = users::list_users(adapter).await?;
            output::print_users(&users);
            if *check_login {
                let login = provider.test_login()?;
                let outcome = users::check_login(adapter, &login.email, &login.password).await?;
                println!("Login check for {}: {}", login.email, outcome);
            }
        }
        Commands::Run { output } => {
            let report = pipeline::run_all(adapter, config).await?;
            if let Some(path) = output {
                output::emit_report(&report, Some(path.as_path())).await?;
            }
        }
        Commands::Preview { .. } => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct PreviewReport<'a> {
    mapping: Vec<String>,
    result: &'a MigrationResult,
    cast_warnings: usize,
    excluded: usize,
    rows: &'a [RowData],
}

async fn run_preview(
    config: &AppConfig,
    file: &Path,
    limit: usize,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let preview = preview_file(file, &config.mapper())?;
    let mapping = engine_core::mapping::mapper::describe(&preview.mapping);

    println!("Mapping for {}:", file.display());
    for line in &mapping {
        println!("  {line}");
    }
    output::print_result(&preview.result);
    println!(
        "{} row(s) excluded, {} value(s) set to NULL",
        preview.excluded, preview.cast_warnings
    );
    for row in preview.rows.iter().take(limit) {
        let cells: Vec<String> = row
            .field_values
            .iter()
            .map(|f| format!("{}={}", f.name, f.value))
            .collect();
        println!("  {}", cells.join(", "));
    }

    if let Some(path) = output {
        let report = PreviewReport {
            mapping,
            result: &preview.result,
            cast_warnings: preview.cast_warnings,
            excluded: preview.excluded,
            rows: &preview.rows,
        };
        output::emit_report(&report, Some(path)).await?;
    }
    Ok(())
}
