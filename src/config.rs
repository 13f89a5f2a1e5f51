//! Centralized configuration management for steelbazaar-leads

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::schema::{NotesLimit, ValidationPolicy};

const DEFAULT_LOG_FILE: &str = "steelbazaar-leads.log";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// File receiving the application log
    pub log_file: PathBuf,
    /// Rules the product owner can switch on or off
    pub policy: ValidationPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            policy: ValidationPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let log_file = std::env::var("LEADS_LOG_FILE")
            .unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string())
            .into();

        let policy = ValidationPolicy {
            notes_limit: parse_env_var::<NotesLimit>("LEADS_NOTES_LIMIT")?.unwrap_or_default(),
            require_other_product_type: parse_env_var("LEADS_REQUIRE_OTHER_CATEGORY")?.unwrap_or(false),
            require_attachment: parse_env_var("LEADS_REQUIRE_ATTACHMENT")?.unwrap_or(false),
            clear_hidden_fields: parse_env_var("LEADS_CLEAR_HIDDEN_FIELDS")?.unwrap_or(false),
        };

        Ok(Config { log_file, policy })
    }

    /// Directory the log file lives in
    pub fn log_dir(&self) -> &Path {
        match self.log_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Log file name without its directory
    pub fn log_file_name(&self) -> &str {
        self.log_file
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(DEFAULT_LOG_FILE)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let dir = self.log_dir();
        if !dir.is_dir() {
            return Err(anyhow::anyhow!(
                "Log directory does not exist: {}",
                dir.display()
            ));
        }
        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(var_name) {
        Ok(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("Failed to parse environment variable {} = '{}'", var_name, val)),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.log_file_name(), "steelbazaar-leads.log");
        assert_eq!(config.log_dir(), Path::new("."));
        assert_eq!(config.policy, ValidationPolicy::default());
        assert_eq!(config.policy.notes_limit, NotesLimit::Characters);
    }

    #[test]
    fn test_config_validation() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            log_file: dir.path().join("leads.log"),
            ..Config::default()
        };
        config.validate().unwrap();

        let missing = Config {
            log_file: dir.path().join("missing").join("leads.log"),
            ..Config::default()
        };
        assert!(missing.validate().is_err());
    }

    #[test]
    fn test_parse_env_var_reports_variable() {
        std::env::set_var("LEADS_TEST_BOOL", "maybe");
        let error = parse_env_var::<bool>("LEADS_TEST_BOOL").unwrap_err();
        assert!(error.to_string().contains("LEADS_TEST_BOOL"));

        std::env::set_var("LEADS_TEST_LIMIT", "words");
        assert_eq!(
            parse_env_var::<NotesLimit>("LEADS_TEST_LIMIT").unwrap(),
            Some(NotesLimit::Words)
        );
        assert_eq!(parse_env_var::<bool>("LEADS_TEST_UNSET").unwrap(), None);
    }
}
