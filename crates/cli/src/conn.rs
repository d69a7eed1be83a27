use crate::{credentials::CredentialProvider, error::CliError};
use connectors::{
    adapter::Adapter,
    settings::ConnectionSettings,
    sql::base::adapter::{ServerInfo, SqlAdapter},
};
use tracing::{error, info};

/// Asks the provider for credentials and opens the run's only connection.
pub async fn connect(
    settings: &ConnectionSettings,
    provider: &mut dyn CredentialProvider,
) -> Result<Adapter, CliError> {
    let credentials = provider.credentials()?;
    println!("Connecting with {}", settings.display_string(&credentials));

    let adapter = Adapter::connect(settings, &credentials).await.map_err(|e| {
        error!(
            "Connection to {}:{} failed: {}",
            settings.host, settings.port, e
        );
        e
    })?;

    info!("Connected to '{}'", settings.database);
    Ok(adapter)
}

/// Round-trips one query and prints what the server reports about itself.
pub async fn ping(adapter: &dyn SqlAdapter) -> Result<ServerInfo, CliError> {
    let server = adapter.server_info().await?;
    let tables = adapter.list_tables().await?;

    println!("Connection OK");
    println!("-----------------------------");
    println!("{:<16} {}", "Database", server.database);
    println!("{:<16} {}", "Server time", server.server_time);
    println!("{:<16} {}", "Tables", tables.len());
    println!(
        "{:<16} {}",
        "Version",
        server.version.lines().next().unwrap_or_default()
    );
    Ok(server)
}
