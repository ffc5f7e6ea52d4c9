use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use std::time::Duration;

/// Translates the configured target into driver connect options.
pub fn connect_options(settings: &DatabaseSettings) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .database(&settings.name)
        .username(&settings.user)
        .password(&settings.password)
}

/// Opens the single connection the application holds for its lifetime.
///
/// There is no pool and no reconnect. The attempt is bounded by
/// `connect_timeout_secs` so a dead host does not hang the console.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgConnection, DbError> {
    let options = connect_options(settings);
    let timeout = Duration::from_secs(settings.connect_timeout_secs);

    let conn = tokio::time::timeout(timeout, PgConnection::connect_with(&options))
        .await
        .map_err(|_| DbError::ConnectTimeout(timeout))?
        .map_err(DbError::ConnectionError)?;

    Ok(conn)
}
