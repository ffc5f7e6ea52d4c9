use crate::error::DbError;
use crate::gateway::{Exec, Param, StorageGateway, first_value};
use crate::schema::Table;
use chrono::NaiveDate;
use core_types::ProjectStatus;

pub const STUDENT_NAMES: [&str; 5] = [
    "Ivan Lapin",
    "Taras Shevchenko",
    "Anastasiia Pshonna",
    "Mykhailo Kobzar",
    "Maryna Starovoit",
];
pub const STUDENT_GROUPS: [&str; 5] = ["КВ-31", "КВ-32", "КВ-33", "КВ-34", "КВ-35"];
pub const SUPERVISOR_NAMES: [&str; 5] = [
    "Ivan Ivanov",
    "Petro Petrenko",
    "Oleg Sydorenko",
    "Anna Bondar",
    "Olena Kovalenko",
];
pub const DEPARTMENTS: [&str; 5] = ["FIOT", "FPM", "FMM", "FEAM", "FSP"];

/// Generated start dates fall in `[DEMO_EPOCH, DEMO_EPOCH + DEMO_WINDOW_DAYS)`.
pub const DEMO_WINDOW_DAYS: i32 = 180;
pub const DEMO_MIN_GRADE: i32 = 60;
pub const DEMO_MAX_GRADE: i32 = 100;

pub fn demo_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default()
}

const TRUNCATE_ALL: &str =
    "TRUNCATE public.project, public.supervisor, public.student RESTART IDENTITY CASCADE";

// $1 names, $2 groups, $3 row count
const INSERT_DEMO_STUDENTS: &str = r#"
    INSERT INTO public.student (name, email, "group")
    SELECT name,
           lower(replace(name, ' ', '.')) || '@lll.kpi.ua',
           ($2::text[])[1 + floor(random() * cardinality($2::text[]))::int]
    FROM (
        SELECT ($1::text[])[1 + floor(random() * cardinality($1::text[]))::int] AS name
        FROM generate_series(1, $3)
    ) AS picked
"#;

// $1 names, $2 departments, $3 row count
const INSERT_DEMO_SUPERVISORS: &str = r#"
    INSERT INTO public.supervisor (name, department, email)
    SELECT name,
           department,
           lower(replace(name, ' ', '.')) || '@lll.kpi.ua'
    FROM (
        SELECT ($1::text[])[1 + floor(random() * cardinality($1::text[]))::int] AS name,
               ($2::text[])[1 + floor(random() * cardinality($2::text[]))::int] AS department
        FROM generate_series(1, $3)
    ) AS picked
"#;

// $1 row count, $2 statuses, $3 the status that carries a grade,
// $4 epoch, $5 window in days, $6..$7 grade range
const INSERT_DEMO_PROJECTS: &str = r#"
    INSERT INTO public.project (title, start_date, status, grade, supervisor_id, student_id)
    SELECT 'Project #' || gs::text,
           start_date,
           status,
           CASE WHEN status = $3 THEN $6 + floor(random() * ($7 - $6 + 1))::int END,
           supervisor_id,
           student_id
    FROM (
        SELECT gs,
               $4::date + floor(random() * $5)::int AS start_date,
               ($2::text[])[1 + floor(random() * cardinality($2::text[]))::int] AS status,
               s.supervisor_id,
               st.student_id
        FROM generate_series(1, $1) AS gs
        JOIN (
            SELECT supervisor_id, ROW_NUMBER() OVER (ORDER BY random()) AS rn
            FROM public.supervisor
        ) s ON s.rn = gs
        JOIN (
            SELECT student_id, ROW_NUMBER() OVER (ORDER BY random()) AS rn
            FROM public.student
        ) st ON st.rn = gs
    ) AS paired
"#;

const LOOKUP_SEQUENCE: &str = "SELECT pg_get_serial_sequence($1, $2)";

/// What happened to one table's identity sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceSync {
    /// Set to `MAX(pk) + 1`.
    Synced,
    /// The key column has no backing sequence; nothing to do.
    NoSequence,
    Failed,
}

impl StorageGateway {
    /// Wipes all three tables and fills each with `count` generated rows.
    ///
    /// Destructive and irreversible. Every project gets its own student and
    /// supervisor through a random one-to-one pairing, and is graded only when
    /// completed. Returns false if any step failed (already reported).
    pub async fn generate_demo_data(&mut self, count: i32) -> bool {
        match self.try_generate_demo_data(count).await {
            Ok(()) => {
                for table in Table::ALL {
                    self.sync_sequence(table).await;
                }
                println!("Data generation completed successfully.");
                true
            }
            Err((err, sql)) => {
                self.report(&err, sql, &[]);
                println!("Data generation aborted.");
                false
            }
        }
    }

    async fn try_generate_demo_data(&mut self, count: i32) -> Result<(), (DbError, &'static str)> {
        if !self.is_connected() {
            return Err((DbError::NotConnected, TRUNCATE_ALL));
        }

        println!("Clearing tables...");
        self.step(TRUNCATE_ALL, &[]).await?;

        println!("Generating {count} rows...");
        let students = [
            Param::from(&STUDENT_NAMES[..]),
            Param::from(&STUDENT_GROUPS[..]),
            Param::from(count),
        ];
        self.step(INSERT_DEMO_STUDENTS, &students).await?;

        let supervisors = [
            Param::from(&SUPERVISOR_NAMES[..]),
            Param::from(&DEPARTMENTS[..]),
            Param::from(count),
        ];
        self.step(INSERT_DEMO_SUPERVISORS, &supervisors).await?;

        let statuses: Vec<&str> = ProjectStatus::ALL.iter().map(|s| s.as_str()).collect();
        let projects = [
            Param::from(count),
            Param::from(statuses.as_slice()),
            Param::from(ProjectStatus::Completed.as_str()),
            Param::from(demo_epoch()),
            Param::from(DEMO_WINDOW_DAYS),
            Param::from(DEMO_MIN_GRADE),
            Param::from(DEMO_MAX_GRADE),
        ];
        self.step(INSERT_DEMO_PROJECTS, &projects).await?;

        Ok(())
    }

    async fn step(
        &mut self,
        sql: &'static str,
        params: &[Param],
    ) -> Result<(), (DbError, &'static str)> {
        self.try_execute(sql, params, Exec::RUN)
            .await
            .map(|_| ())
            .map_err(|err| (err, sql))
    }

    /// Moves a table's identity sequence to one past the current maximum key.
    ///
    /// A table without a sequence is left alone and noted in the log.
    pub async fn sync_sequence(&mut self, table: Table) -> SequenceSync {
        match self.try_sync_sequence(table).await {
            Ok(SequenceSync::Synced) => {
                self.log().emit(|| {
                    tracing::info!(table = table.name(), key = table.primary_key(), "Sequence synced to MAX+1")
                });
                println!(
                    "Sequence for {}.{} synced to MAX+1.",
                    table.name(),
                    table.primary_key()
                );
                SequenceSync::Synced
            }
            Ok(_) => {
                self.log().emit(|| {
                    tracing::info!(table = table.name(), key = table.primary_key(), "No serial sequence detected")
                });
                println!(
                    "No serial sequence detected for {}.{}.",
                    table.name(),
                    table.primary_key()
                );
                SequenceSync::NoSequence
            }
            Err(DbError::NotConnected) => {
                println!("Error: Database connection is not established.");
                SequenceSync::Failed
            }
            Err(err) => {
                self.log().emit(|| {
                    tracing::error!(table = table.name(), error = ?err, "Error syncing sequence")
                });
                println!(
                    "Warning: failed to synchronize the sequence for {} (details in {}).",
                    table.name(),
                    self.log().path().display()
                );
                SequenceSync::Failed
            }
        }
    }

    async fn try_sync_sequence(&mut self, table: Table) -> Result<SequenceSync, DbError> {
        let params = [
            Param::from(table.name()),
            Param::from(table.primary_key()),
        ];
        let found = self.try_execute(LOOKUP_SEQUENCE, &params, Exec::FETCH).await?;
        let sequence = first_value::<Option<String>>(&found)
            .map_err(DbError::classify)?
            .flatten();

        let Some(sequence) = sequence else {
            return Ok(SequenceSync::NoSequence);
        };

        self.try_execute(&setval_sql(table), &[Param::from(sequence)], Exec::RUN)
            .await?;
        Ok(SequenceSync::Synced)
    }
}

/// `setval` for `table`. Only the closed `Table` names are spliced in; the
/// sequence name itself is bound.
fn setval_sql(table: Table) -> String {
    format!(
        "SELECT setval($1::regclass, COALESCE((SELECT MAX({key}) FROM {name}), 0) + 1, false)",
        key = table.primary_key(),
        name = table.name(),
    )
}
