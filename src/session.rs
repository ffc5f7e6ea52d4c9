//! The interactive menu loop.

use crate::command::Command;
use crate::forms::{self, FormMode};
use crate::input::{GRADE, IDENTITY, InputError, Prompter};
use crate::view;
use database::StorageGateway;
use std::io::{BufRead, Write};

const CHOICE_PROMPT: &str = "\nYour choice: ";

enum Flow {
    Continue,
    Exit,
}

/// Owns the gateway and the console for the lifetime of the program.
pub struct Session<R, W> {
    gateway: StorageGateway,
    prompter: Prompter<R, W>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(gateway: StorageGateway, prompter: Prompter<R, W>) -> Self {
        Self { gateway, prompter }
    }

    pub fn prompter(&self) -> &Prompter<R, W> {
        &self.prompter
    }

    /// Shows the menu and runs commands until `0` or end of input.
    ///
    /// Data errors never end the loop; only a broken console does.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match self.step().await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) | Err(InputError::Closed) => break,
                Err(err) => {
                    self.gateway.close().await;
                    return Err(err.into());
                }
            }
        }
        self.gateway.close().await;
        Ok(())
    }

    async fn step(&mut self) -> Result<Flow, InputError> {
        self.prompter.say(view::MENU)?;
        let choice = self.prompter.line(CHOICE_PROMPT)?;
        match Command::parse(&choice) {
            Some(Command::Exit) => {
                self.prompter.say("Exit...")?;
                Ok(Flow::Exit)
            }
            Some(cmd) => {
                self.dispatch(cmd).await?;
                Ok(Flow::Continue)
            }
            None => {
                self.prompter.say("Wrong choice! Try again.")?;
                Ok(Flow::Continue)
            }
        }
    }

    async fn dispatch(&mut self, cmd: Command) -> Result<(), InputError> {
        let p = &mut self.prompter;
        let db = &mut self.gateway;

        match cmd {
            Command::Exit => {}
            Command::ListStudents => {
                let rows = db.list_students().await;
                p.say(&view::render_rows(&rows))?;
            }
            Command::ListSupervisors => {
                let rows = db.list_supervisors().await;
                p.say(&view::render_rows(&rows))?;
            }
            Command::ListProjects => {
                let rows = db.list_projects().await;
                p.say(&view::render_rows(&rows))?;
            }
            Command::AddStudent => {
                let form = forms::read_student(p, FormMode::Create)?;
                db.add_student(&form).await;
            }
            Command::AddSupervisor => {
                let form = forms::read_supervisor(p, FormMode::Create)?;
                db.add_supervisor(&form).await;
            }
            Command::AddProject => {
                let form = forms::read_project(p, FormMode::Create)?;
                db.add_project(&form).await;
            }
            Command::EditStudent => {
                let id = p.int("Student ID: ", IDENTITY)?;
                let form = forms::read_student(p, FormMode::Edit)?;
                db.edit_student(id, &form).await;
            }
            Command::EditSupervisor => {
                let id = p.int("Supervisor ID: ", IDENTITY)?;
                let form = forms::read_supervisor(p, FormMode::Edit)?;
                db.edit_supervisor(id, &form).await;
            }
            Command::EditProject => {
                let id = p.int("Project ID: ", IDENTITY)?;
                let form = forms::read_project(p, FormMode::Edit)?;
                db.edit_project(id, &form).await;
            }
            Command::DeleteStudent => {
                let id = p.int("Student ID: ", IDENTITY)?;
                db.delete_student(id).await;
            }
            Command::DeleteSupervisor => {
                let id = p.int("Supervisor ID: ", IDENTITY)?;
                db.delete_supervisor(id).await;
            }
            Command::DeleteProject => {
                let id = p.int("Project ID: ", IDENTITY)?;
                db.delete_project(id).await;
            }
            Command::GenerateDemoData => {
                p.say("Warning: this deletes ALL students, supervisors and projects.")?;
                let count = p.int("How many rows to generate?: ", IDENTITY)?;
                db.generate_demo_data(count).await;
            }
            Command::SearchByGrade => {
                let min = p.int("Min grade: ", GRADE)?;
                let max = p.int("Max grade: ", GRADE)?;
                let pattern = p.line("Student name pattern (use % for LIKE): ")?;
                let found = db
                    .search_projects_by_grade_and_student(min, max, &pattern)
                    .await;
                p.say(&view::grade_search_header(min, max, &pattern))?;
                p.say(&view::render_rows(&found.rows))?;
                p.say(&view::render_elapsed(found.elapsed_ms()))?;
            }
            Command::SearchByDate => {
                let start = p.date("Start date (YYYY-MM-DD): ")?;
                let end = p.date("End date (YYYY-MM-DD): ")?;
                let pattern = p.line("Department pattern (use % for LIKE): ")?;
                let found = db
                    .search_projects_by_date_and_department(start, end, &pattern)
                    .await;
                p.say(&view::date_search_header(start, end, &pattern))?;
                p.say(&view::render_rows(&found.rows))?;
                p.say(&view::render_elapsed(found.elapsed_ms()))?;
            }
            Command::SearchStudentStats => {
                let pattern = p.line("Project status pattern (use % for LIKE): ")?;
                let min_avg = p.int("Min average grade: ", GRADE)?;
                let found = db.search_student_stats_by_status(&pattern, min_avg).await;
                p.say(&view::stats_search_header(&pattern, min_avg))?;
                p.say(&view::render_rows(&found.rows))?;
                p.say(&view::render_elapsed(found.elapsed_ms()))?;
            }
        }
        Ok(())
    }
}
