// Settings are read from an optional probsql.{toml,json,yaml} file and
// PROBSQL_* environment variables, in that order of precedence (lowest first).

use config::{Config, Environment, File};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::error::{ProbsqlError, Result};

pub const CONDITION_COLUMN: &str = "__condition";

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").unwrap();
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name of the reserved per-row condition column.
    pub condition_column: String,
    /// Directive for the log filter, e.g. "info" or "probsql=debug".
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            condition_column: CONDITION_COLUMN.to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from `file` (without extension, may be missing) and the
    /// environment.
    pub fn load(file: &str) -> Result<Settings> {
        let settings: Settings = Config::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(Environment::with_prefix("PROBSQL"))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !IDENTIFIER.is_match(&self.condition_column) {
            return Err(ProbsqlError::Config(format!(
                "'{}' is not a valid column name",
                self.condition_column
            )));
        }
        EnvFilter::try_new(&self.log_filter).map_err(|e| {
            ProbsqlError::Config(format!("bad log filter '{}': {}", self.log_filter, e))
        })?;
        Ok(())
    }
}

/// Installs the fmt subscriber. Only the first call has any effect.
pub fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
