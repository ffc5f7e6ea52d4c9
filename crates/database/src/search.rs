use crate::gateway::{Exec, Param, StorageGateway};
use chrono::NaiveDate;
use core_types::{DateSearchRow, GradeSearchRow, StudentStatsRow};
use std::time::Duration;

const SEARCH_BY_GRADE_AND_STUDENT: &str = r#"
    SELECT p.project_id, p.title, p.grade, s.name AS student_name, s."group"
    FROM public.project p
    JOIN public.student s ON p.student_id = s.student_id
    WHERE p.grade BETWEEN $1 AND $2
      AND s.name ILIKE $3
    ORDER BY p.grade DESC
"#;

const SEARCH_BY_DATE_AND_DEPARTMENT: &str = r#"
    SELECT p.project_id, p.title, p.start_date, p.status,
           sup.name AS supervisor_name, sup.department
    FROM public.project p
    JOIN public.supervisor sup ON p.supervisor_id = sup.supervisor_id
    WHERE p.start_date BETWEEN $1 AND $2
      AND sup.department ILIKE $3
    ORDER BY p.start_date
"#;

// COUNT includes ungraded projects; AVG skips them, so an all-NULL group has a
// NULL average and fails the HAVING.
const STUDENT_STATS_BY_STATUS: &str = r#"
    SELECT st.student_id,
           st.name AS student_name,
           st."group",
           COUNT(p.project_id) AS total_projects,
           AVG(p.grade) AS avg_grade
    FROM public.student st
    JOIN public.project p ON p.student_id = st.student_id
    WHERE p.status ILIKE $1
    GROUP BY st.student_id, st.name, st."group"
    HAVING AVG(p.grade) >= $2
    ORDER BY avg_grade DESC
"#;

/// Rows from one of the analytical searches plus how long the query took.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<T> {
    pub rows: Vec<T>,
    /// `None` when the query failed or there was no connection.
    pub elapsed: Option<Duration>,
}

impl<T> SearchResult<T> {
    pub fn elapsed_ms(&self) -> Option<f64> {
        self.elapsed.map(|d| d.as_secs_f64() * 1000.0)
    }
}

impl StorageGateway {
    /// Projects graded within `[min_grade, max_grade]` whose student's name
    /// matches `name_pattern` (ILIKE), best grade first.
    pub async fn search_projects_by_grade_and_student(
        &mut self,
        min_grade: i32,
        max_grade: i32,
        name_pattern: &str,
    ) -> SearchResult<GradeSearchRow> {
        let params = [
            Param::from(min_grade),
            Param::from(max_grade),
            Param::from(name_pattern),
        ];
        self.timed_search(SEARCH_BY_GRADE_AND_STUDENT, &params).await
    }

    /// Projects started within `[start, end]` whose supervisor's department
    /// matches `department_pattern` (ILIKE), earliest first.
    pub async fn search_projects_by_date_and_department(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        department_pattern: &str,
    ) -> SearchResult<DateSearchRow> {
        let params = [
            Param::from(start),
            Param::from(end),
            Param::from(department_pattern),
        ];
        self.timed_search(SEARCH_BY_DATE_AND_DEPARTMENT, &params)
            .await
    }

    /// Per-student project count and average grade over projects whose status
    /// matches `status_pattern` (ILIKE), keeping averages `>= min_avg_grade`.
    pub async fn search_student_stats_by_status(
        &mut self,
        status_pattern: &str,
        min_avg_grade: i32,
    ) -> SearchResult<StudentStatsRow> {
        let params = [Param::from(status_pattern), Param::from(min_avg_grade)];
        self.timed_search(STUDENT_STATS_BY_STATUS, &params).await
    }

    async fn timed_search<T>(&mut self, sql: &str, params: &[Param]) -> SearchResult<T>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>,
    {
        let executed = self.execute(sql, params, Exec::FETCH_TIMED).await;
        let elapsed = executed.elapsed;
        SearchResult {
            rows: self.decode_rows(executed, sql),
            elapsed,
        }
    }
}
