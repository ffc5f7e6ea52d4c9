use crate::error::ConfigError;
use crate::settings::LoggingSettings;
use tracing::Dispatch;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Builds the append-only diagnostic log as a `Dispatch`.
///
/// Nothing is installed globally: the caller hands the dispatch to whoever
/// needs to log, and they emit inside `tracing::dispatcher::with_default`.
pub fn build_log_dispatch(settings: &LoggingSettings) -> Result<Dispatch, ConfigError> {
    std::fs::create_dir_all(&settings.directory)
        .map_err(|e| ConfigError::LogSinkError(format!("{}: {e}", settings.directory.display())))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(settings.file.as_str())
        .build(&settings.directory)
        .map_err(|e| ConfigError::LogSinkError(e.to_string()))?;

    let filter = EnvFilter::try_new(&settings.level).map_err(|e| {
        ConfigError::ValidationError(format!("invalid logging.level '{}': {e}", settings.level))
    })?;

    let subscriber = tracing_subscriber::fmt()
        .with_writer(appender)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(filter)
        .finish();

    Ok(Dispatch::new(subscriber))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_in(dir: &std::path::Path, level: &str) -> LoggingSettings {
        LoggingSettings {
            directory: dir.to_path_buf(),
            file: "db_errors.log".to_string(),
            level: level.to_string(),
        }
    }

    #[test]
    fn events_land_in_the_log_file_with_level() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path(), "info");
        let dispatch = build_log_dispatch(&settings).unwrap();

        tracing::dispatcher::with_default(&dispatch, || {
            tracing::error!("ForeignKeyViolation: project_student_id_fkey");
        });

        let contents = std::fs::read_to_string(settings.path()).unwrap();
        assert!(contents.contains("ERROR"));
        assert!(contents.contains("project_student_id_fkey"));
    }

    #[test]
    fn events_below_the_level_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path(), "error");
        let dispatch = build_log_dispatch(&settings).unwrap();

        tracing::dispatcher::with_default(&dispatch, || {
            tracing::info!("sequence already in sync");
        });

        let contents = std::fs::read_to_string(settings.path()).unwrap_or_default();
        assert!(!contents.contains("sequence already in sync"));
    }

    #[test]
    fn invalid_level_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path(), "not a [valid directive");
        assert!(matches!(
            build_log_dispatch(&settings),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
