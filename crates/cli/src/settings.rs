//! JSON settings file with environment overrides.

use crate::{env::EnvManager, error::CliError};
use connectors::settings::ConnectionSettings;
use engine_core::{
    mapping::{
        mapper::ColumnMapper,
        rules::{MatchRule, RuleSet},
    },
    migrate::analysis::ANALYSIS_STAGING_TABLE,
    staging::staging_table_name,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const HOST_VAR: &str = "CATALOG_DB_HOST";
pub const PORT_VAR: &str = "CATALOG_DB_PORT";
pub const NAME_VAR: &str = "CATALOG_DB_NAME";
pub const DRIVER_VAR: &str = "CATALOG_DB_DRIVER";

pub const OVERRIDE_VARS: [&str; 4] = [HOST_VAR, PORT_VAR, NAME_VAR, DRIVER_VAR];

/// A CSV file and the staging table (`temp_<name>`) it is loaded into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvImport {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub csv_files: Vec<CsvImport>,
    pub sql_files: Vec<PathBuf>,
    pub products_staging: String,
    pub analysis_staging: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            csv_files: vec![
                CsvImport {
                    name: "products_market".to_string(),
                    path: PathBuf::from("data/Products_market.csv"),
                },
                CsvImport {
                    name: "selected_analysis".to_string(),
                    path: PathBuf::from("figma/data/Selected_Products_AI.csv"),
                },
            ],
            sql_files: vec![
                PathBuf::from("database/01_create_tables.sql"),
                PathBuf::from("database/02_initial_data.sql"),
                PathBuf::from("database/04_user_integration.sql"),
            ],
            products_staging: staging_table_name("products_market"),
            analysis_staging: ANALYSIS_STAGING_TABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: ConnectionSettings,
    pub pipeline: PipelineConfig,
    /// Extra mapping rules, tried after the built-in ones.
    pub rules: Vec<MatchRule>,
}

impl AppConfig {
    /// Reads `path` when given. A missing file leaves the defaults in place.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            warn!("Settings file {} not found; using defaults", path.display());
            return Ok(Self::default());
        }

        let source = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&source)?;
        info!("Loaded settings from {}", path.display());
        Ok(config)
    }

    pub fn apply_env(mut self, env: &EnvManager) -> Result<Self, CliError> {
        if let Some(host) = env.get(HOST_VAR) {
            self.database.host = host.to_string();
        }
        if let Some(port) = env.get(PORT_VAR) {
            self.database.port = port
                .parse()
                .map_err(|_| CliError::Config(format!("{PORT_VAR} is not a port number: {port}")))?;
        }
        if let Some(name) = env.get(NAME_VAR) {
            self.database.database = name.to_string();
        }
        if let Some(driver) = env.get(DRIVER_VAR) {
            self.database.driver = driver.to_string();
        }
        Ok(self)
    }

    pub fn mapper(&self) -> ColumnMapper {
        ColumnMapper::new(RuleSet::default().extend(self.rules.iter().cloned()))
    }
}
