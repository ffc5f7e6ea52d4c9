use std::path::{Path, PathBuf};
use tracing::Dispatch;

/// The diagnostic side channel the gateway writes full failure detail to.
///
/// Wraps an injected `Dispatch` plus the path shown in console hints. Events
/// are emitted with that dispatch as the scoped default, so nothing depends on
/// a global subscriber.
#[derive(Clone)]
pub struct DiagnosticLog {
    dispatch: Dispatch,
    path: PathBuf,
}

impl DiagnosticLog {
    pub fn new(dispatch: Dispatch, path: impl Into<PathBuf>) -> Self {
        Self {
            dispatch,
            path: path.into(),
        }
    }

    /// A log that drops every event.
    pub fn disabled() -> Self {
        Self::new(Dispatch::none(), "db_errors.log")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `f` with this log as the current subscriber.
    pub fn emit<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

impl std::fmt::Debug for DiagnosticLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticLog").field("path", &self.path).finish()
    }
}
