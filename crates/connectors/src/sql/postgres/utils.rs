use crate::{
    settings::{ConnectionSettings, Credentials},
    sql::base::error::ConnectorError,
};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tokio_postgres::{Client, Config, NoTls, config::SslMode};
use tracing::error;

pub(crate) fn build_config(settings: &ConnectionSettings, credentials: &Credentials) -> Config {
    let mut config = Config::new();
    config
        .host(&settings.host)
        .port(settings.port)
        .dbname(&settings.database)
        .user(&credentials.username)
        .password(&credentials.password)
        .connect_timeout(settings.connect_timeout())
        .ssl_mode(if settings.encrypt {
            SslMode::Require
        } else {
            SslMode::Disable
        });
    config
}

pub(crate) async fn connect_client(
    settings: &ConnectionSettings,
    credentials: &Credentials,
) -> Result<Client, ConnectorError> {
    let config = build_config(settings, credentials);
    match config.get_ssl_mode() {
        SslMode::Disable => connect_without_tls(config).await,
        _ => connect_with_tls(config, settings.trust_server_certificate).await,
    }
}

pub(crate) async fn connect_with_tls(
    config: Config,
    trust_server_certificate: bool,
) -> Result<Client, ConnectorError> {
    let connector = TlsConnector::builder()
        .danger_accept_invalid_certs(trust_server_certificate)
        .build()?;
    let tls = MakeTlsConnector::new(connector);
    let (client, connection) = config.connect(tls).await?;
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            error!(%err, "Postgres connection error");
        }
    });
    Ok(client)
}

pub(crate) async fn connect_without_tls(config: Config) -> Result<Client, ConnectorError> {
    let (client, connection) = config.connect(NoTls).await?;
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            error!(%err, "Postgres connection error");
        }
    });
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_config_follows_settings() {
        let settings = ConnectionSettings {
            host: "db.internal".into(),
            port: 5432,
            encrypt: false,
            ..Default::default()
        };
        let config = build_config(&settings, &Credentials::new("loader", "pw"));
        assert_eq!(config.get_ports(), &[5432]);
        assert_eq!(config.get_dbname(), Some("proteo"));
        assert_eq!(config.get_user(), Some("loader"));
        assert_eq!(config.get_ssl_mode(), SslMode::Disable);
    }
}
