use clap::{Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CredentialSource {
    /// Prompt on the terminal
    Console,
    /// CATALOG_DB_USER / CATALOG_DB_PASSWORD (and CATALOG_TEST_EMAIL /
    /// CATALOG_TEST_PASSWORD for the login check)
    Env,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Connect, print the server details and disconnect
    TestConn,

    /// Create the Categories and Brands tables if needed and seed them
    Bootstrap,

    /// Load CSV files into temp_<name> staging tables
    Import {
        #[arg(long, help = "CSV file; defaults to the files listed in the settings")]
        file: Option<PathBuf>,

        #[arg(long, help = "Staging name; defaults to the file stem")]
        name: Option<String>,
    },

    /// Run .sql files batch by batch (batches are separated by GO lines)
    ExecSql {
        #[arg(help = "SQL files; defaults to the files listed in the settings")]
        files: Vec<PathBuf>,
    },

    /// Map a staging table onto Products and copy it in one statement
    Migrate {
        #[arg(long, help = "Staging table; defaults to the configured one")]
        staging: Option<String>,

        #[arg(long, help = "Do not migrate the product analysis staging table")]
        skip_analysis: bool,
    },

    /// Show the mapping and the converted rows for a CSV without connecting
    Preview {
        #[arg(long)]
        file: PathBuf,

        #[arg(long, default_value_t = 10, help = "Rows to print")]
        limit: usize,

        #[arg(long, help = "Write the full JSON report to this file")]
        output: Option<PathBuf>,
    },

    /// Insert the reference categories, brands and product when missing
    Seed,

    /// Print the table inventory, required tables and row counts
    Verify {
        #[arg(long, help = "Write the JSON report to this file instead of a table")]
        output: Option<PathBuf>,
    },

    /// List application users with masked passwords
    Users {
        #[arg(long, help = "Also check a test login from the credential provider")]
        check_login: bool,
    },

    /// Bootstrap, run scripts, import, migrate, seed and verify in one go
    Run {
        #[arg(long, help = "Write the JSON report to this file")]
        output: Option<PathBuf>,
    },
}
