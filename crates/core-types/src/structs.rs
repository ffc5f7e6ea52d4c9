use crate::record::{Record, opt_cell};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ==============================================================================
// Persisted Entities
// ==============================================================================

/// A row of the `student` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Student {
    pub student_id: i32,
    pub name: String,
    pub email: String,
    /// Stored in the `"group"` column (a reserved word in SQL).
    #[sqlx(rename = "group")]
    #[serde(rename = "group")]
    pub group_name: String,
}

/// A row of the `supervisor` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Supervisor {
    pub supervisor_id: i32,
    pub name: String,
    pub department: String,
    pub email: String,
}

/// A row of the `project` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Project {
    pub project_id: i32,
    pub title: String,
    pub start_date: NaiveDate,
    pub status: String,
    /// Only present when `status` is `completed`.
    pub grade: Option<i32>,
    pub supervisor_id: i32,
    pub student_id: i32,
}

// ==============================================================================
// Input Forms (full-record values for insert and update)
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentForm {
    pub name: String,
    pub email: String,
    pub group_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorForm {
    pub name: String,
    pub department: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectForm {
    pub title: String,
    pub start_date: NaiveDate,
    pub status: String,
    pub grade: Option<i32>,
    pub supervisor_id: i32,
    pub student_id: i32,
}

// ==============================================================================
// Search Results
// ==============================================================================

/// A project joined to its student, as returned by the grade/name search.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct GradeSearchRow {
    pub project_id: i32,
    pub title: String,
    pub grade: i32,
    pub student_name: String,
    #[sqlx(rename = "group")]
    #[serde(rename = "group")]
    pub group_name: String,
}

/// A project joined to its supervisor, as returned by the date/department search.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct DateSearchRow {
    pub project_id: i32,
    pub title: String,
    pub start_date: NaiveDate,
    pub status: String,
    pub supervisor_name: String,
    pub department: String,
}

/// Per-student aggregate over the projects matching a status pattern.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct StudentStatsRow {
    pub student_id: i32,
    pub student_name: String,
    #[sqlx(rename = "group")]
    #[serde(rename = "group")]
    pub group_name: String,
    /// Counts every matching project, including those without a grade.
    pub total_projects: i64,
    /// Averaged over graded projects only.
    pub avg_grade: Decimal,
}

// ==============================================================================
// Column Order
// ==============================================================================

impl Record for Student {
    const COLUMNS: &'static [&'static str] = &["student_id", "name", "email", "group"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.student_id.to_string(),
            self.name.clone(),
            self.email.clone(),
            self.group_name.clone(),
        ]
    }
}

impl Record for Supervisor {
    const COLUMNS: &'static [&'static str] = &["supervisor_id", "name", "department", "email"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.supervisor_id.to_string(),
            self.name.clone(),
            self.department.clone(),
            self.email.clone(),
        ]
    }
}

impl Record for Project {
    const COLUMNS: &'static [&'static str] = &[
        "project_id",
        "title",
        "start_date",
        "status",
        "grade",
        "supervisor_id",
        "student_id",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.project_id.to_string(),
            self.title.clone(),
            self.start_date.to_string(),
            self.status.clone(),
            opt_cell(&self.grade),
            self.supervisor_id.to_string(),
            self.student_id.to_string(),
        ]
    }
}

impl Record for GradeSearchRow {
    const COLUMNS: &'static [&'static str] =
        &["project_id", "title", "grade", "student_name", "group"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.project_id.to_string(),
            self.title.clone(),
            self.grade.to_string(),
            self.student_name.clone(),
            self.group_name.clone(),
        ]
    }
}

impl Record for DateSearchRow {
    const COLUMNS: &'static [&'static str] = &[
        "project_id",
        "title",
        "start_date",
        "status",
        "supervisor_name",
        "department",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.project_id.to_string(),
            self.title.clone(),
            self.start_date.to_string(),
            self.status.clone(),
            self.supervisor_name.clone(),
            self.department.clone(),
        ]
    }
}

impl Record for StudentStatsRow {
    const COLUMNS: &'static [&'static str] = &[
        "student_id",
        "student_name",
        "group",
        "total_projects",
        "avg_grade",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.student_id.to_string(),
            self.student_name.clone(),
            self.group_name.clone(),
            self.total_projects.to_string(),
            self.avg_grade.round_dp(2).to_string(),
        ]
    }
}
