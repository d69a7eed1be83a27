use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::CliError;

const MASK: &str = "********";

/// Process environment plus any `.env` file loaded on top of it.
#[derive(Debug, Clone)]
pub struct EnvManager {
    vars: HashMap<String, String>,
    sensitive_patterns: Vec<String>,
}

impl EnvManager {
    pub fn new() -> Self {
        Self::from_vars(std::env::vars().collect())
    }

    pub fn from_vars(vars: HashMap<String, String>) -> Self {
        Self {
            vars,
            sensitive_patterns: Self::default_sensitive_patterns(),
        }
    }

    /// Values from the file win over the process environment.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CliError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read env file {}: {}", path.display(), e))
        })?;

        self.parse_env_content(&content)
    }

    /// The trimmed value, `None` when unset or blank.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn is_sensitive(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.sensitive_patterns.iter().any(|p| key.contains(p))
    }

    /// `KEY=value` for printing, with secrets replaced.
    pub fn display(&self, key: &str) -> Option<String> {
        self.get(key).map(|value| {
            if self.is_sensitive(key) {
                format!("{key}={MASK}")
            } else {
                format!("{key}={value}")
            }
        })
    }

    fn parse_env_content(&mut self, content: &str) -> Result<(), CliError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line = line.strip_prefix("export ").unwrap_or(line);

            let Some((key, value)) = line.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid env file: malformed line {} (expected KEY=VALUE)",
                    line_num + 1
                )));
            };

            let key = key.trim();
            if key.is_empty() {
                return Err(CliError::Config(format!(
                    "Invalid env file: empty key at line {}",
                    line_num + 1
                )));
            }

            self.vars.insert(key.to_string(), Self::unquote_value(value));
        }

        Ok(())
    }

    fn unquote_value(value: &str) -> String {
        let value = value.trim();

        for quote in ['"', '\''] {
            if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
                return value[1..value.len() - 1].to_string();
            }
        }

        value.to_string()
    }

    fn default_sensitive_patterns() -> Vec<String> {
        ["password", "passwd", "pwd", "secret", "token", "credential", "user"]
            .into_iter()
            .map(String::from)
            .collect()
    }
}

impl Default for EnvManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn empty() -> EnvManager {
        EnvManager::from_vars(HashMap::new())
    }

    #[test]
    fn test_parse_basic_env() {
        let mut env = empty();
        let content = r#"
# Comment
CATALOG_DB_HOST=db.internal
export CATALOG_DB_PORT=1434
        "#;

        env.parse_env_content(content).unwrap();
        assert_eq!(env.get("CATALOG_DB_HOST"), Some("db.internal"));
        assert_eq!(env.get("CATALOG_DB_PORT"), Some("1434"));
    }

    #[test]
    fn test_parse_quoted_values() {
        let mut env = empty();
        let content = r#"
QUOTED="value with spaces"
SINGLE='single quoted'
UNQUOTED=no_spaces
EMPTY=
        "#;

        env.parse_env_content(content).unwrap();
        assert_eq!(env.get("QUOTED"), Some("value with spaces"));
        assert_eq!(env.get("SINGLE"), Some("single quoted"));
        assert_eq!(env.get("UNQUOTED"), Some("no_spaces"));
        assert_eq!(env.get("EMPTY"), None);
    }

    #[test]
    fn test_invalid_env_format() {
        let mut env = empty();
        assert!(env.parse_env_content("INVALID LINE WITHOUT EQUALS").is_err());
        assert!(env.parse_env_content("=value").is_err());
    }

    #[test]
    fn test_file_overrides_process_values() {
        let mut env = EnvManager::from_vars(HashMap::from([(
            "CATALOG_DB_NAME".to_string(),
            "proteo".to_string(),
        )]));
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "CATALOG_DB_NAME=proteo_staging").unwrap();

        env.load_from_file(file.path()).unwrap();
        assert_eq!(env.get("CATALOG_DB_NAME"), Some("proteo_staging"));
        assert!(env.load_from_file("/nonexistent/.env").is_err());
    }

    #[test]
    fn test_sensitive_values_are_masked() {
        let mut env = empty();
        env.parse_env_content("CATALOG_DB_PASSWORD=hunter22\nCATALOG_DB_HOST=db")
            .unwrap();
        assert_eq!(
            env.display("CATALOG_DB_PASSWORD").unwrap(),
            "CATALOG_DB_PASSWORD=********"
        );
        assert_eq!(env.display("CATALOG_DB_HOST").unwrap(), "CATALOG_DB_HOST=db");
        assert_eq!(env.display("CATALOG_DB_DRIVER"), None);
    }
}
