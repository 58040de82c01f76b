//! Configuration management for Duochain

use crate::error::ChainError;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_CONFIG_PATH: &str = "duochain.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub miner: MinerConfig,
    pub parties: PartyConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MinerConfig {
    pub threads: usize,
    /// Nonces scanned per batch before checking for cancellation.
    pub batch_size: u64,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            batch_size: 1 << 16,
        }
    }
}

/// Display names for the two ledger participants.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PartyConfig {
    pub first: String,
    pub second: String,
}

impl Default for PartyConfig {
    fn default() -> Self {
        Self {
            first: "Alice".to_string(),
            second: "Bob".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn max_level(&self) -> Result<tracing::Level, ChainError> {
        tracing::Level::from_str(&self.level)
            .map_err(|_| ChainError::Config(format!("unknown logging.level '{}'", self.level)))
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ChainError> {
        if self.miner.threads == 0 {
            return Err(ChainError::Config("miner.threads must be at least 1".into()));
        }
        if self.miner.batch_size == 0 {
            return Err(ChainError::Config("miner.batch_size must be at least 1".into()));
        }
        if self.parties.first.trim().is_empty() || self.parties.second.trim().is_empty() {
            return Err(ChainError::Config("party names must not be empty".into()));
        }
        if self.parties.first == self.parties.second {
            return Err(ChainError::Config("party names must differ".into()));
        }
        self.logging.max_level()?;
        Ok(())
    }
}

pub fn parse_config(config_str: &str) -> Result<Config, ChainError> {
    let config: Config = toml::from_str(config_str)?;
    config.validate()?;
    Ok(config)
}

/// Loads `path`, falling back to defaults when the file does not exist.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ChainError> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(config_str) => parse_config(&config_str),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(ChainError::Config(format!("{}: {}", path.display(), e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.miner.threads, 1);
        assert_eq!(config.parties.first, "Alice");
        assert_eq!(config.parties.second, "Bob");
        assert_eq!(config.logging.max_level().unwrap(), tracing::Level::WARN);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = parse_config("[miner]\nthreads = 4\n").unwrap();
        assert_eq!(config.miner.threads, 4);
        assert_eq!(config.miner.batch_size, MinerConfig::default().batch_size);
        assert_eq!(config.parties, PartyConfig::default());
    }

    #[test]
    fn test_full_file() {
        let config = parse_config(
            r#"
            [miner]
            threads = 2
            batch_size = 1024

            [parties]
            first = "Anna"
            second = "Ben"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.miner, MinerConfig { threads: 2, batch_size: 1024 });
        assert_eq!(config.parties.first, "Anna");
        assert_eq!(config.logging.max_level().unwrap(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(parse_config("[miner]\nthreads = 0\n").is_err());
        assert!(parse_config("[miner]\nbatch_size = 0\n").is_err());
        assert!(parse_config("[parties]\nfirst = \"\"\n").is_err());
        assert!(parse_config("[parties]\nfirst = \"Bob\"\n").is_err());
        assert!(parse_config("[logging]\nlevel = \"loud\"\n").is_err());
        assert!(matches!(parse_config("miner = ["), Err(ChainError::Config(_))));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[parties]\nsecond = \"Carol\"").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.parties.second, "Carol");
        assert_eq!(config.parties.first, "Alice");
    }
}
