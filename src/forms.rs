//! Prompt sequences that collect a full record for insert or update.

use crate::input::{GRADE, IDENTITY, InputError, Prompter};
use core_types::{ProjectForm, ProjectStatus, StudentForm, SupervisorForm};
use std::io::{BufRead, Write};

/// Whether a form fills a new record or replaces an existing one. Only the
/// prompt wording differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

impl FormMode {
    fn label(&self, create: &'static str, edit: &'static str) -> &'static str {
        match self {
            FormMode::Create => create,
            FormMode::Edit => edit,
        }
    }
}

pub fn read_student<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    mode: FormMode,
) -> Result<StudentForm, InputError> {
    Ok(StudentForm {
        name: p.text(mode.label("Student name: ", "New name: "))?,
        email: p.text(mode.label("Student email: ", "New email: "))?,
        group_name: p.text(mode.label("Group (e.g. КВ-31): ", "New group: "))?,
    })
}

pub fn read_supervisor<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    mode: FormMode,
) -> Result<SupervisorForm, InputError> {
    Ok(SupervisorForm {
        name: p.text(mode.label("Supervisor name: ", "New name: "))?,
        department: p.text(mode.label("Department: ", "New department: "))?,
        email: p.text(mode.label("Email: ", "New email: "))?,
    })
}

/// Collects a project. The grade is asked for only when the status is
/// `completed`; for any other status it is skipped and left empty.
pub fn read_project<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    mode: FormMode,
) -> Result<ProjectForm, InputError> {
    let title = p.text(mode.label("Project title: ", "New title: "))?;
    let start_date = p.date(mode.label(
        "Start date (YYYY-MM-DD): ",
        "New start date (YYYY-MM-DD): ",
    ))?;
    let status = ProjectStatus::normalize(&p.text(mode.label(
        "Status (active/completed): ",
        "New status (active/completed): ",
    ))?);

    let grade = if ProjectStatus::carries_grade(&status) {
        Some(p.int(mode.label("Grade (0-100): ", "New grade (0-100): "), GRADE)?)
    } else {
        p.say("Project is not completed yet, grade will be set to NULL.")?;
        None
    };

    let supervisor_id = p.int("Supervisor ID: ", IDENTITY)?;
    let student_id = p.int("Student ID: ", IDENTITY)?;

    Ok(ProjectForm {
        title,
        start_date,
        status,
        grade,
        supervisor_id,
        student_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::tests::{output, scripted};
    use chrono::NaiveDate;

    #[test]
    fn completed_project_asks_for_a_bounded_grade() {
        let mut p = scripted("Thesis\n2025-01-01\n Completed \n150\n85\n1\n2\n");
        let form = read_project(&mut p, FormMode::Create).unwrap();

        assert_eq!(form.title, "Thesis");
        assert_eq!(form.start_date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(form.status, "completed");
        assert_eq!(form.grade, Some(85));
        assert_eq!(form.supervisor_id, 1);
        assert_eq!(form.student_id, 2);
        assert!(output(&p).contains("Value must be <= 100"));
    }

    #[test]
    fn other_statuses_skip_the_grade_prompt() {
        let mut p = scripted("Draft\n2025-03-14\nactive\n3\n4\n");
        let form = read_project(&mut p, FormMode::Edit).unwrap();

        assert_eq!(form.status, "active");
        assert_eq!(form.grade, None);
        assert_eq!(form.supervisor_id, 3);
        assert_eq!(form.student_id, 4);

        let out = output(&p);
        assert!(out.contains("grade will be set to NULL"));
        assert!(!out.contains("grade (0-100)"));
        assert!(out.contains("New title: "));
    }

    #[test]
    fn project_ids_must_be_positive() {
        let mut p = scripted("T\n2025-01-01\nactive\n0\n1\n1\n");
        let form = read_project(&mut p, FormMode::Create).unwrap();
        assert_eq!(form.supervisor_id, 1);
        assert_eq!(form.student_id, 1);
        assert!(output(&p).contains("Value must be >= 1"));
    }

    #[test]
    fn student_form_trims_fields() {
        let mut p = scripted(" Ivan Lapin \nivan@x.com\nКВ-31\n");
        let form = read_student(&mut p, FormMode::Create).unwrap();
        assert_eq!(
            form,
            StudentForm {
                name: "Ivan Lapin".to_string(),
                email: "ivan@x.com".to_string(),
                group_name: "КВ-31".to_string(),
            }
        );
    }

    #[test]
    fn supervisor_form_uses_edit_wording() {
        let mut p = scripted("Ivan Ivanov\nFIOT\nii@x.com\n");
        let form = read_supervisor(&mut p, FormMode::Edit).unwrap();
        assert_eq!(form.department, "FIOT");
        assert!(output(&p).contains("New department: "));
    }
}
