//! Where the database login and the test-user login come from.

use crate::{env::EnvManager, error::CliError};
use connectors::settings::Credentials;
use std::io::{BufRead, Write};

pub const USER_VAR: &str = "CATALOG_DB_USER";
pub const PASSWORD_VAR: &str = "CATALOG_DB_PASSWORD";
pub const TEST_EMAIL_VAR: &str = "CATALOG_TEST_EMAIL";
pub const TEST_PASSWORD_VAR: &str = "CATALOG_TEST_PASSWORD";

/// An application login to check against `config.users`.
#[derive(Clone, PartialEq, Eq)]
pub struct TestLogin {
    pub email: String,
    pub password: String,
}

pub trait CredentialProvider {
    fn credentials(&mut self) -> Result<Credentials, CliError>;

    fn test_login(&mut self) -> Result<TestLogin, CliError>;
}

/// Asks on the terminal.
pub struct ConsoleProvider<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleProvider<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn prompt(&mut self, label: &str) -> Result<String, CliError> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(CliError::Credentials(format!("no input for {label}")));
        }
        let value = line.trim_end_matches(['\r', '\n']).to_string();
        if value.trim().is_empty() {
            return Err(CliError::Credentials(format!("{label} is empty")));
        }
        Ok(value)
    }
}

impl<R: BufRead, W: Write> CredentialProvider for ConsoleProvider<R, W> {
    fn credentials(&mut self) -> Result<Credentials, CliError> {
        let username = self.prompt("Database user")?;
        let password = self.prompt("Database password")?;
        Ok(Credentials::new(username, password))
    }

    fn test_login(&mut self) -> Result<TestLogin, CliError> {
        Ok(TestLogin {
            email: self.prompt("Test user email")?,
            password: self.prompt("Test user password")?,
        })
    }
}

/// Reads `CATALOG_DB_USER` / `CATALOG_DB_PASSWORD` and the test login
/// variables.
pub struct EnvProvider {
    env: EnvManager,
}

impl EnvProvider {
    pub fn new(env: EnvManager) -> Self {
        Self { env }
    }

    fn require(&self, key: &str) -> Result<String, CliError> {
        self.env
            .get(key)
            .map(str::to_string)
            .ok_or_else(|| CliError::Credentials(format!("{key} is not set")))
    }
}

impl CredentialProvider for EnvProvider {
    fn credentials(&mut self) -> Result<Credentials, CliError> {
        Ok(Credentials::new(
            self.require(USER_VAR)?,
            self.require(PASSWORD_VAR)?,
        ))
    }

    fn test_login(&mut self) -> Result<TestLogin, CliError> {
        Ok(TestLogin {
            email: self.require(TEST_EMAIL_VAR)?,
            password: self.require(TEST_PASSWORD_VAR)?,
        })
    }
}

#[cfg(test)]
pub struct FixedProvider {
    pub credentials: Credentials,
    pub login: TestLogin,
}

#[cfg(test)]
impl CredentialProvider for FixedProvider {
    fn credentials(&mut self) -> Result<Credentials, CliError> {
        Ok(self.credentials.clone())
    }

    fn test_login(&mut self) -> Result<TestLogin, CliError> {
        Ok(self.login.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Cursor;

    fn login(provider: &mut dyn CredentialProvider) -> (Credentials, TestLogin) {
        (
            provider.credentials().unwrap(),
            provider.test_login().unwrap(),
        )
    }

    #[test]
    fn test_console_prompts_in_order() {
        let input = Cursor::new("loader\nP@ss word\r\nana@proteo.test\nsecret\n");
        let mut output = Vec::new();
        let mut provider = ConsoleProvider::new(input, &mut output);

        let (creds, test) = login(&mut provider);
        assert_eq!(creds, Credentials::new("loader", "P@ss word"));
        assert_eq!(test.email, "ana@proteo.test");
        assert_eq!(test.password, "secret");

        let shown = String::from_utf8(output).unwrap();
        assert!(shown.starts_with("Database user: Database password: "));
        assert!(!shown.contains("P@ss word"));
    }

    #[test]
    fn test_console_rejects_missing_input() {
        let mut provider = ConsoleProvider::new(Cursor::new("loader\n\n"), Vec::new());
        assert!(matches!(
            provider.credentials(),
            Err(CliError::Credentials(msg)) if msg.contains("password is empty")
        ));

        let mut provider = ConsoleProvider::new(Cursor::new(""), Vec::new());
        assert!(provider.credentials().is_err());
    }

    #[test]
    fn test_env_provider() {
        let env = EnvManager::from_vars(HashMap::from([
            (USER_VAR.to_string(), "loader".to_string()),
            (PASSWORD_VAR.to_string(), "from-env".to_string()),
        ]));
        let mut provider = EnvProvider::new(env);

        assert_eq!(
            provider.credentials().unwrap(),
            Credentials::new("loader", "from-env")
        );
        assert!(matches!(
            provider.test_login(),
            Err(CliError::Credentials(msg)) if msg == "CATALOG_TEST_EMAIL is not set"
        ));
    }

    #[test]
    fn test_fixed_provider() {
        let mut provider = FixedProvider {
            credentials: Credentials::new("u", "p"),
            login: TestLogin {
                email: "e@x".into(),
                password: "pw".into(),
            },
        };
        let (creds, test) = login(&mut provider);
        assert_eq!(creds.username, "u");
        assert_eq!(test.email, "e@x");
    }
}
