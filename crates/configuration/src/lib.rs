use crate::error::ConfigError;
use std::path::{Path, PathBuf};

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::build_log_dispatch;
pub use settings::{DatabaseSettings, LoggingSettings, Settings};

/// The file looked up when no `--config` path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix for environment overrides, e.g. `ACADEMIC__DATABASE__PASSWORD`.
pub const ENV_PREFIX: &str = "ACADEMIC";

/// Command-line flags that feed configuration loading.
#[cfg(feature = "clap")]
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Path to a TOML configuration file (default: ./config.toml, optional).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Loads the application configuration.
///
/// Layers, lowest priority first: built-in defaults, the TOML file, then
/// `ACADEMIC__*` environment variables (a `.env` file is read into the
/// environment beforehand if one exists). An explicitly given file must exist;
/// the default `config.toml` is optional.
pub fn load_config(path: Option<&Path>) -> Result<Settings, ConfigError> {
    // A missing .env file is not an error.
    let _ = dotenvy::dotenv();

    let (file, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let builder = config::Config::builder()
        .set_default("database.host", "localhost")?
        .set_default("database.port", 5432)?
        .set_default("database.name", "student_projects")?
        .set_default("database.user", "postgres")?
        .set_default("database.password", "postgres")?
        .set_default("database.connect_timeout_secs", 5)?
        .set_default("logging.directory", ".")?
        .set_default("logging.file", "db_errors.log")?
        .set_default("logging.level", "info")?
        .add_source(config::File::from(file).required(required))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[database]\nname = \"records_test\"\nport = 6543\n\n[logging]\nlevel = \"error\""
        )
        .unwrap();

        let settings = load_config(Some(file.path())).unwrap();
        assert_eq!(settings.database.name, "records_test");
        assert_eq!(settings.database.port, 6543);
        assert_eq!(settings.logging.level, "error");
        // Untouched keys keep their defaults.
        assert_eq!(settings.database.user, "postgres");
        assert_eq!(settings.logging.file, "db_errors.log");
        assert_eq!(settings.logging.path(), PathBuf::from("./db_errors.log"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result = load_config(Some(Path::new("/definitely/not/here/records.toml")));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[database]\nconnect_timeout_secs = 0").unwrap();

        let result = load_config(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
