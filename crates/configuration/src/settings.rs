use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
}

/// Where the single database connection goes, and with which credential.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    /// The database name (e.g. "student_projects").
    pub name: String,
    pub user: String,
    pub password: String,
    /// How long to wait for the initial connection before giving up.
    pub connect_timeout_secs: u64,
}

/// The diagnostic side channel. Full failure detail goes here, never to the console.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
    /// An `EnvFilter` directive, e.g. "info" or "error".
    pub level: String,
}

impl LoggingSettings {
    /// The full path of the log file, as shown in console hints.
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file)
    }
}

impl Settings {
    /// Rejects settings that cannot possibly work, before anything is opened.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let db = &self.database;
        if db.host.trim().is_empty() {
            return Err(ConfigError::ValidationError("database.host must not be empty".into()));
        }
        if db.port == 0 {
            return Err(ConfigError::ValidationError("database.port must be > 0".into()));
        }
        if db.name.trim().is_empty() {
            return Err(ConfigError::ValidationError("database.name must not be empty".into()));
        }
        if db.user.trim().is_empty() {
            return Err(ConfigError::ValidationError("database.user must not be empty".into()));
        }
        if db.connect_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "database.connect_timeout_secs must be > 0".into(),
            ));
        }
        if self.logging.file.trim().is_empty() {
            return Err(ConfigError::ValidationError("logging.file must not be empty".into()));
        }
        Ok(())
    }
}
