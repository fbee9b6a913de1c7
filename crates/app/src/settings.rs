//! Handles settings for the application.
//!
//! Sources, later ones win: the TOML file (`config/expense_tracker.toml` or
//! `--config`), `EXPENSE_TRACKER_*` environment variables, command line flags.
use clap::Parser;
use ledger::{Argon2Verifier, DEFAULT_DATA_FILE};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/expense_tracker.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data_file: String,
    pub log_level: String,
    pub currency_symbol: String,
    pub argon2_memory_kib: Option<u32>,
    pub argon2_iterations: Option<u32>,
    pub argon2_parallelism: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: DEFAULT_DATA_FILE.to_string(),
            log_level: "info".to_string(),
            currency_symbol: "₹".to_string(),
            argon2_memory_kib: None,
            argon2_iterations: None,
            argon2_parallelism: None,
        }
    }
}

impl Settings {
    /// Password verifier built from the configured Argon2 cost, falling back
    /// to the library default for anything unset.
    pub fn verifier(&self) -> Result<Argon2Verifier> {
        if self.argon2_memory_kib.is_none()
            && self.argon2_iterations.is_none()
            && self.argon2_parallelism.is_none()
        {
            return Ok(Argon2Verifier::default());
        }
        Ok(Argon2Verifier::with_params(
            self.argon2_memory_kib
                .unwrap_or(Argon2Verifier::DEFAULT_MEMORY_KIB),
            self.argon2_iterations
                .unwrap_or(Argon2Verifier::DEFAULT_ITERATIONS),
            self.argon2_parallelism
                .unwrap_or(Argon2Verifier::DEFAULT_PARALLELISM),
        )?)
    }
}

#[derive(Debug, Default, Parser)]
#[command(name = "expense_tracker", about = "Personal income and expense tracker")]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the data file location.
    #[arg(long)]
    data_file: Option<String>,
    /// Override the log level (e.g. info, debug, warn).
    #[arg(long)]
    log_level: Option<String>,
}

pub fn load() -> Result<Settings> {
    load_from(Args::parse())
}

fn load_from(args: Args) -> Result<Settings> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("EXPENSE_TRACKER"));
    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if let Some(data_file) = args.data_file {
        settings.data_file = data_file;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args {
            config: Some(dir.path().join("absent.toml").display().to_string()),
            ..Args::default()
        };

        let settings = load_from(args).unwrap();
        assert_eq!(settings.data_file, DEFAULT_DATA_FILE);
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.currency_symbol, "₹");
        assert_eq!(settings.argon2_memory_kib, None);
    }

    #[test]
    fn file_values_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.toml");
        std::fs::write(
            &path,
            "data_file = \"ledger.json\"\nlog_level = \"debug\"\ncurrency_symbol = \"$\"\nargon2_iterations = 3\n",
        )
        .unwrap();

        let args = Args {
            config: Some(path.display().to_string()),
            data_file: Some("override.json".to_string()),
            log_level: None,
        };
        let settings = load_from(args).unwrap();

        assert_eq!(settings.data_file, "override.json");
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.argon2_iterations, Some(3));
    }

    #[test]
    fn verifier_rejects_bad_cost() {
        let settings = Settings {
            argon2_memory_kib: Some(1),
            ..Settings::default()
        };
        assert!(settings.verifier().is_err());

        let settings = Settings {
            argon2_memory_kib: Some(64),
            argon2_iterations: Some(1),
            ..Settings::default()
        };
        assert!(settings.verifier().is_ok());
    }
}
