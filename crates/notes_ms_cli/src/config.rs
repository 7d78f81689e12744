//! Process configuration resolved from arguments and environment.
//!
//! # Invariants
//! - A resolved config always names a store, a supported log level and a
//!   non-empty service name.
//! - `log_dir`, when present, is absolute.

use crate::cli::{
    ARG_DB_PATH, ARG_LOG_DIR, ARG_LOG_LEVEL, ARG_SERVICE_NAME, DEFAULT_DB_PATH,
    DEFAULT_SERVICE_NAME,
};
use clap::ArgMatches;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const IN_MEMORY_DB: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    InMemory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub store: StoreLocation,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub service_name: String,
    pub compact_output: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyDbPath,
    InvalidLogLevel(String),
    RelativeLogDir(PathBuf),
    EmptyServiceName,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDbPath => write!(f, "db path cannot be empty"),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::RelativeLogDir(path) => {
                write!(f, "log dir must be an absolute path, got `{}`", path.display())
            }
            Self::EmptyServiceName => write!(f, "service name cannot be empty"),
        }
    }
}

impl Error for ConfigError {}

impl ServiceConfig {
    /// Resolves configuration from parsed top-level matches.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, ConfigError> {
        let db_path = matches
            .get_one::<String>(ARG_DB_PATH)
            .map(String::as_str)
            .unwrap_or(DEFAULT_DB_PATH)
            .trim();
        let store = match db_path {
            "" => return Err(ConfigError::EmptyDbPath),
            IN_MEMORY_DB => StoreLocation::InMemory,
            path => StoreLocation::File(PathBuf::from(path)),
        };

        let log_level = matches
            .get_one::<String>(ARG_LOG_LEVEL)
            .map(String::as_str)
            .unwrap_or_else(|| notes_ms_core::default_log_level());
        let log_level = notes_ms_core::normalize_level(log_level)
            .map_err(ConfigError::InvalidLogLevel)?
            .to_string();

        let log_dir = match matches.get_one::<String>(ARG_LOG_DIR).map(|dir| dir.trim()) {
            None | Some("") => None,
            Some(dir) if Path::new(dir).is_absolute() => Some(PathBuf::from(dir)),
            Some(dir) => return Err(ConfigError::RelativeLogDir(PathBuf::from(dir))),
        };

        let service_name = matches
            .get_one::<String>(ARG_SERVICE_NAME)
            .map(String::as_str)
            .unwrap_or(DEFAULT_SERVICE_NAME)
            .trim()
            .to_string();
        if service_name.is_empty() {
            return Err(ConfigError::EmptyServiceName);
        }

        Ok(Self {
            store,
            log_level,
            log_dir,
            service_name,
            compact_output: matches.get_flag("compact"),
        })
    }

    /// Short store description for startup logs.
    pub fn store_label(&self) -> String {
        match &self.store {
            StoreLocation::File(path) => format!("file:{}", path.display()),
            StoreLocation::InMemory => "memory".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ServiceConfig, StoreLocation};
    use crate::cli::build_clap_command;
    use std::path::PathBuf;

    fn resolve(args: &[&str]) -> Result<ServiceConfig, ConfigError> {
        let mut argv = vec!["notes-ms"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["get", "--patient-id", "42"]);
        let matches = build_clap_command().try_get_matches_from(argv).unwrap();
        ServiceConfig::from_matches(&matches)
    }

    #[test]
    fn memory_marker_selects_in_memory_store() {
        let config = resolve(&["--db-path", ":memory:"]).unwrap();
        assert_eq!(config.store, StoreLocation::InMemory);
        assert_eq!(config.store_label(), "memory");
    }

    #[test]
    fn explicit_values_are_kept() {
        let config = resolve(&[
            "--db-path",
            "/var/lib/notes.sqlite3",
            "--log-level",
            "warn",
            "--service-name",
            "notes-ms-2",
            "--compact",
        ])
        .unwrap();
        assert_eq!(
            config.store,
            StoreLocation::File(PathBuf::from("/var/lib/notes.sqlite3"))
        );
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.service_name, "notes-ms-2");
        assert!(config.compact_output);
    }

    #[test]
    fn log_level_is_normalized() {
        let config = resolve(&["--log-level", " WARNING "]).unwrap();
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn unsupported_log_level_is_rejected_without_log_dir() {
        let err = resolve(&["--log-level", "bogus"]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel(message) if message.contains("bogus")));
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let err = resolve(&["--log-dir", "logs/dev"]).unwrap_err();
        assert_eq!(err, ConfigError::RelativeLogDir(PathBuf::from("logs/dev")));
    }

    #[test]
    fn blank_service_name_is_rejected() {
        let err = resolve(&["--service-name", "  "]).unwrap_err();
        assert_eq!(err, ConfigError::EmptyServiceName);
    }

    #[test]
    fn blank_db_path_is_rejected() {
        let err = resolve(&["--db-path", " "]).unwrap_err();
        assert_eq!(err, ConfigError::EmptyDbPath);
    }
}
