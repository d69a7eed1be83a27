//! Connection parameters and operator credentials.

use crate::error::AdapterError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    MsSql,
    Postgres,
}

impl FromStr for Driver {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mssql" | "sqlserver" | "sql-server" => Ok(Driver::MsSql),
            "postgres" | "postgresql" | "pg" => Ok(Driver::Postgres),
            other => Err(AdapterError::UnsupportedDriver(other.to_string())),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Driver::MsSql => write!(f, "mssql"),
            Driver::Postgres => write!(f, "postgres"),
        }
    }
}

/// Everything needed to reach the server except the credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub database: String,
    /// Kept as text so an unknown value is reported as a missing driver
    /// at connect time rather than as a config parse error.
    pub driver: String,
    pub encrypt: bool,
    pub trust_server_certificate: bool,
    pub connect_timeout_secs: u64,
    pub command_timeout_secs: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1433,
            database: "proteo".to_string(),
            driver: "mssql".to_string(),
            encrypt: true,
            trust_server_certificate: false,
            connect_timeout_secs: 30,
            command_timeout_secs: 300,
        }
    }
}

impl ConnectionSettings {
    pub fn driver(&self) -> Result<Driver, AdapterError> {
        self.driver.parse()
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// Connection string for display. The password is always masked.
    pub fn display_string(&self, credentials: &Credentials) -> String {
        let yes_no = |b: bool| if b { "yes" } else { "no" };
        format!(
            "Driver={};Server={},{};Database={};UID={};PWD={};Encrypt={};TrustServerCertificate={};Connection Timeout={}",
            self.driver,
            self.host,
            self.port,
            self.database,
            credentials.username,
            MASK,
            yes_no(self.encrypt),
            yes_no(self.trust_server_certificate),
            self.connect_timeout_secs
        )
    }
}

const MASK: &str = "********";

/// SQL authentication credentials. The password never appears in `Debug`
/// output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &MASK)
            .finish()
    }
}
