use crate::connection;
use crate::diagnostics::DiagnosticLog;
use crate::error::DbError;
use chrono::NaiveDate;
use configuration::DatabaseSettings;
use sqlx::postgres::{PgArguments, PgConnection, PgRow, Postgres};
use sqlx::query::Query;
use sqlx::{Connection, Decode, FromRow, Row, Type};
use std::time::{Duration, Instant};

/// A positional statement parameter, bound as `$1..$n`.
///
/// Values never become part of the SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Int(i32),
    OptInt(Option<i32>),
    Text(String),
    TextList(Vec<String>),
    Date(NaiveDate),
}

impl From<i32> for Param {
    fn from(value: i32) -> Self {
        Param::Int(value)
    }
}

impl From<Option<i32>> for Param {
    fn from(value: Option<i32>) -> Self {
        Param::OptInt(value)
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Text(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Text(value)
    }
}

impl From<NaiveDate> for Param {
    fn from(value: NaiveDate) -> Self {
        Param::Date(value)
    }
}

impl From<&[&str]> for Param {
    fn from(values: &[&str]) -> Self {
        Param::TextList(values.iter().map(|v| v.to_string()).collect())
    }
}

/// What the caller wants back from a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exec {
    pub fetch: bool,
    pub timed: bool,
}

impl Exec {
    /// Run the statement, keep only the affected-row count.
    pub const RUN: Exec = Exec { fetch: false, timed: false };
    /// Run and collect all result rows.
    pub const FETCH: Exec = Exec { fetch: true, timed: false };
    /// Collect all result rows and measure wall-clock latency.
    pub const FETCH_TIMED: Exec = Exec { fetch: true, timed: true };
}

/// The outcome of a statement as seen above the gateway boundary.
///
/// Failures are already logged and reported by the time this is returned;
/// they show up here only as the empty shape.
#[derive(Default)]
pub struct Executed {
    /// `Some` whenever rows were requested (empty on failure), `None` otherwise.
    pub rows: Option<Vec<PgRow>>,
    pub rows_affected: u64,
    /// `Some` only for a timed statement that succeeded.
    pub elapsed: Option<Duration>,
}

impl Executed {
    pub fn empty(mode: Exec) -> Self {
        Self {
            rows: mode.fetch.then(Vec::new),
            rows_affected: 0,
            elapsed: None,
        }
    }
}

/// Statements whose leading keyword is one of these run outside a transaction.
const READ_ONLY_KEYWORDS: [&str; 2] = ["SELECT", "WITH"];

/// Returns true when the statement's leading keyword is read-only.
pub fn is_read_only(sql: &str) -> bool {
    sql.split_whitespace()
        .next()
        .map(|word| {
            READ_ONLY_KEYWORDS
                .iter()
                .any(|kw| word.eq_ignore_ascii_case(kw))
        })
        .unwrap_or(false)
}

/// The single owner of the database connection.
///
/// Every statement goes through [`StorageGateway::execute`], which is also the
/// only place transactions are committed or rolled back. A gateway whose
/// connection could not be opened stays usable: every operation reports the
/// missing connection and returns an empty result.
pub struct StorageGateway {
    conn: Option<PgConnection>,
    log: DiagnosticLog,
}

impl std::fmt::Debug for StorageGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageGateway")
            .field("connected", &self.is_connected())
            .field("log", &self.log)
            .finish()
    }
}

impl StorageGateway {
    /// Opens the connection described by `settings`.
    ///
    /// Never fails: on error the detail goes to `log`, a one-line notice goes
    /// to the console, and the gateway starts out disconnected.
    pub async fn connect(settings: &DatabaseSettings, log: DiagnosticLog) -> Self {
        match connection::connect(settings).await {
            Ok(conn) => {
                log.emit(|| {
                    tracing::info!(host = %settings.host, database = %settings.name, "Connected to PostgreSQL")
                });
                println!("Connected to PostgreSQL successfully!");
                Self::from_connection(conn, log)
            }
            Err(err) => {
                log.emit(|| {
                    tracing::error!(
                        host = %settings.host,
                        port = settings.port,
                        database = %settings.name,
                        error = ?err,
                        "Error connecting to PostgreSQL"
                    )
                });
                println!(
                    "Error: Failed to connect to database (details in {}).",
                    log.path().display()
                );
                Self::disconnected(log)
            }
        }
    }

    /// Wraps an already open connection.
    pub fn from_connection(conn: PgConnection, log: DiagnosticLog) -> Self {
        Self {
            conn: Some(conn),
            log,
        }
    }

    /// A gateway in the degraded state, as left behind by a failed connect.
    pub fn disconnected(log: DiagnosticLog) -> Self {
        Self { conn: None, log }
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    pub fn log(&self) -> &DiagnosticLog {
        &self.log
    }

    /// Releases the connection, if one is held. Idempotent.
    pub async fn close(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };
        match conn.close().await {
            Ok(()) => {
                self.log.emit(|| tracing::info!("Database connection closed"));
                println!("Database connection closed.");
            }
            Err(err) => {
                self.log
                    .emit(|| tracing::error!(error = ?err, "Error closing the database connection"));
            }
        }
    }

    /// Runs one parameterized statement and absorbs any failure.
    ///
    /// On failure the detail is logged, one classified line is printed, the
    /// transaction is rolled back and the empty shape for `mode` is returned.
    pub async fn execute(&mut self, sql: &str, params: &[Param], mode: Exec) -> Executed {
        match self.try_execute(sql, params, mode).await {
            Ok(done) => done,
            Err(err) => {
                self.report(&err, sql, params);
                Executed::empty(mode)
            }
        }
    }

    /// Like [`execute`](Self::execute) but hands the failure back instead of
    /// reporting it. Rollback has already happened when `Err` is returned.
    pub(crate) async fn try_execute(
        &mut self,
        sql: &str,
        params: &[Param],
        mode: Exec,
    ) -> Result<Executed, DbError> {
        let conn = self.conn.as_mut().ok_or(DbError::NotConnected)?;
        let started = mode.timed.then(Instant::now);

        let (rows, rows_affected) = if is_read_only(sql) {
            run(conn, sql, params, mode.fetch)
                .await
                .map_err(DbError::classify)?
        } else {
            let mut tx = conn.begin().await.map_err(DbError::classify)?;
            match run(&mut *tx, sql, params, mode.fetch).await {
                Ok(out) => {
                    tx.commit().await.map_err(DbError::classify)?;
                    out
                }
                Err(err) => {
                    if let Err(rollback_err) = tx.rollback().await {
                        self.log.emit(|| {
                            tracing::error!(error = ?rollback_err, "Rollback failed")
                        });
                    }
                    return Err(DbError::classify(err));
                }
            }
        };

        Ok(Executed {
            rows: mode.fetch.then_some(rows),
            rows_affected,
            elapsed: started.map(|s| s.elapsed()),
        })
    }

    /// Logs a failure in full and prints its short console form.
    pub(crate) fn report(&self, err: &DbError, sql: &str, params: &[Param]) {
        if let DbError::NotConnected = err {
            println!("Error: Database connection is not established.");
            return;
        }

        let kind = err.failure_kind();
        self.log.emit(|| {
            tracing::error!(
                sql = sql.trim(),
                params = ?params,
                error = ?err,
                "{}",
                kind.log_label()
            )
        });
        println!(
            "{} (details in {}).",
            kind.console_message().trim_end_matches('.'),
            self.log.path().display()
        );
    }

    /// Decodes every fetched row as `T`. A row that does not decode is
    /// reported like any other failure and yields an empty result.
    pub(crate) fn decode_rows<T>(&self, executed: Executed, sql: &str) -> Vec<T>
    where
        T: for<'r> FromRow<'r, PgRow>,
    {
        let rows = executed.rows.unwrap_or_default();
        rows.iter()
            .map(T::from_row)
            .collect::<Result<Vec<T>, _>>()
            .unwrap_or_else(|err| {
                self.report(&DbError::classify(err), sql, &[]);
                Vec::new()
            })
    }

    /// The first column of the first row, if there is one.
    pub(crate) fn decode_scalar<T>(&self, executed: &Executed, sql: &str) -> Option<T>
    where
        T: for<'r> Decode<'r, Postgres> + Type<Postgres>,
    {
        match first_value(executed) {
            Ok(value) => value,
            Err(err) => {
                self.report(&DbError::classify(err), sql, &[]);
                None
            }
        }
    }
}

pub(crate) fn first_value<T>(executed: &Executed) -> Result<Option<T>, sqlx::Error>
where
    T: for<'r> Decode<'r, Postgres> + Type<Postgres>,
{
    executed
        .rows
        .as_ref()
        .and_then(|rows| rows.first())
        .map(|row| row.try_get::<T, _>(0))
        .transpose()
}

async fn run(
    conn: &mut PgConnection,
    sql: &str,
    params: &[Param],
    fetch: bool,
) -> Result<(Vec<PgRow>, u64), sqlx::Error> {
    let query = bind_params(sqlx::query(sql), params);
    if fetch {
        let rows = query.fetch_all(&mut *conn).await?;
        let count = rows.len() as u64;
        Ok((rows, count))
    } else {
        let result = query.execute(&mut *conn).await?;
        Ok((Vec::new(), result.rows_affected()))
    }
}

fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &[Param],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            Param::Int(v) => query.bind(*v),
            Param::OptInt(v) => query.bind(*v),
            Param::Text(v) => query.bind(v.clone()),
            Param::TextList(v) => query.bind(v.clone()),
            Param::Date(v) => query.bind(*v),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_and_with_are_read_only() {
        assert!(is_read_only("SELECT 1"));
        assert!(is_read_only("\n    select student_id FROM public.student"));
        assert!(is_read_only("WITH t AS (SELECT 1) SELECT * FROM t"));
    }

    #[test]
    fn writes_are_not_read_only() {
        assert!(!is_read_only("INSERT INTO public.student (name) VALUES ($1)"));
        assert!(!is_read_only("  UPDATE public.project SET grade = $1"));
        assert!(!is_read_only("TRUNCATE public.project RESTART IDENTITY CASCADE"));
        assert!(!is_read_only("SELECTED"));
        assert!(!is_read_only(""));
    }

    #[test]
    fn empty_shape_follows_the_mode() {
        let fetched = Executed::empty(Exec::FETCH_TIMED);
        assert_eq!(fetched.rows.map(|r| r.len()), Some(0));
        assert!(fetched.elapsed.is_none());

        let run = Executed::empty(Exec::RUN);
        assert!(run.rows.is_none());
        assert_eq!(run.rows_affected, 0);
    }

    #[test]
    fn params_convert_from_plain_values() {
        assert_eq!(Param::from(7), Param::Int(7));
        assert_eq!(Param::from(None::<i32>), Param::OptInt(None));
        assert_eq!(Param::from("%Ivan%"), Param::Text("%Ivan%".to_string()));
        let pool: &[&str] = &["FIOT", "FPM"];
        assert_eq!(
            Param::from(pool),
            Param::TextList(vec!["FIOT".to_string(), "FPM".to_string()])
        );
    }

    #[tokio::test]
    async fn disconnected_gateway_returns_the_empty_shape() {
        let mut gateway = StorageGateway::disconnected(DiagnosticLog::disabled());
        assert!(!gateway.is_connected());

        let fetched = gateway
            .execute("SELECT 1", &[], Exec::FETCH_TIMED)
            .await;
        assert_eq!(fetched.rows.map(|r| r.len()), Some(0));
        assert!(fetched.elapsed.is_none());

        let written = gateway
            .execute("DELETE FROM public.project WHERE project_id = $1", &[1.into()], Exec::RUN)
            .await;
        assert!(written.rows.is_none());
        assert_eq!(written.rows_affected, 0);
    }

    #[tokio::test]
    async fn try_execute_reports_not_connected() {
        let mut gateway = StorageGateway::disconnected(DiagnosticLog::disabled());
        let result = gateway.try_execute("SELECT 1", &[], Exec::FETCH).await;
        assert!(matches!(result, Err(DbError::NotConnected)));
    }

    #[tokio::test]
    async fn close_on_disconnected_gateway_is_a_no_op() {
        let mut gateway = StorageGateway::disconnected(DiagnosticLog::disabled());
        gateway.close().await;
        gateway.close().await;
        assert!(!gateway.is_connected());
    }
}
