use crate::gateway::{Exec, Param, StorageGateway};
use crate::schema::Table;
use core_types::{Project, ProjectForm, Student, StudentForm, Supervisor, SupervisorForm};

const INSERT_STUDENT: &str = r#"
    INSERT INTO public.student (name, email, "group")
    VALUES ($1, $2, $3)
    RETURNING student_id
"#;

const UPDATE_STUDENT: &str = r#"
    UPDATE public.student
    SET name = $1, email = $2, "group" = $3
    WHERE student_id = $4
"#;

const SELECT_STUDENTS: &str =
    r#"SELECT student_id, name, email, "group" FROM public.student ORDER BY student_id"#;

const COUNT_STUDENT_PROJECTS: &str = "SELECT COUNT(*) FROM public.project WHERE student_id = $1";
const DELETE_STUDENT: &str = "DELETE FROM public.student WHERE student_id = $1";

const INSERT_SUPERVISOR: &str = r#"
    INSERT INTO public.supervisor (name, department, email)
    VALUES ($1, $2, $3)
    RETURNING supervisor_id
"#;

const UPDATE_SUPERVISOR: &str = r#"
    UPDATE public.supervisor
    SET name = $1, department = $2, email = $3
    WHERE supervisor_id = $4
"#;

const SELECT_SUPERVISORS: &str = "SELECT supervisor_id, name, department, email FROM public.supervisor ORDER BY supervisor_id";

const COUNT_SUPERVISOR_PROJECTS: &str =
    "SELECT COUNT(*) FROM public.project WHERE supervisor_id = $1";
const DELETE_SUPERVISOR: &str = "DELETE FROM public.supervisor WHERE supervisor_id = $1";

const INSERT_PROJECT: &str = r#"
    INSERT INTO public.project (title, start_date, status, grade, supervisor_id, student_id)
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING project_id
"#;

const UPDATE_PROJECT: &str = r#"
    UPDATE public.project
    SET title = $1, start_date = $2, status = $3, grade = $4,
        supervisor_id = $5, student_id = $6
    WHERE project_id = $7
"#;

const SELECT_PROJECTS: &str = r#"
    SELECT project_id, title, start_date, status, grade, supervisor_id, student_id
    FROM public.project
    ORDER BY project_id
"#;

const DELETE_PROJECT: &str = "DELETE FROM public.project WHERE project_id = $1";

/// Entity CRUD. Each method issues one statement (two for the guarded
/// deletes), and failures are reported before they get back here.
impl StorageGateway {
    // --- Students ---

    /// Inserts a student and returns the new identity.
    pub async fn add_student(&mut self, form: &StudentForm) -> Option<i32> {
        let params = [
            Param::from(form.name.as_str()),
            Param::from(form.email.as_str()),
            Param::from(form.group_name.as_str()),
        ];
        self.insert_returning_id(Table::Student, INSERT_STUDENT, &params)
            .await
    }

    /// Overwrites every field of a student. Returns false if nothing was updated.
    pub async fn edit_student(&mut self, student_id: i32, form: &StudentForm) -> bool {
        let params = [
            Param::from(form.name.as_str()),
            Param::from(form.email.as_str()),
            Param::from(form.group_name.as_str()),
            Param::from(student_id),
        ];
        self.change(Table::Student, UPDATE_STUDENT, &params, student_id, "Updated")
            .await
    }

    /// Deletes a student unless a project still references it.
    pub async fn delete_student(&mut self, student_id: i32) -> bool {
        self.delete_guarded(
            Table::Student,
            COUNT_STUDENT_PROJECTS,
            DELETE_STUDENT,
            student_id,
        )
        .await
    }

    pub async fn list_students(&mut self) -> Vec<Student> {
        let executed = self.execute(SELECT_STUDENTS, &[], Exec::FETCH).await;
        self.decode_rows(executed, SELECT_STUDENTS)
    }

    // --- Supervisors ---

    pub async fn add_supervisor(&mut self, form: &SupervisorForm) -> Option<i32> {
        let params = [
            Param::from(form.name.as_str()),
            Param::from(form.department.as_str()),
            Param::from(form.email.as_str()),
        ];
        self.insert_returning_id(Table::Supervisor, INSERT_SUPERVISOR, &params)
            .await
    }

    pub async fn edit_supervisor(&mut self, supervisor_id: i32, form: &SupervisorForm) -> bool {
        let params = [
            Param::from(form.name.as_str()),
            Param::from(form.department.as_str()),
            Param::from(form.email.as_str()),
            Param::from(supervisor_id),
        ];
        self.change(
            Table::Supervisor,
            UPDATE_SUPERVISOR,
            &params,
            supervisor_id,
            "Updated",
        )
        .await
    }

    pub async fn delete_supervisor(&mut self, supervisor_id: i32) -> bool {
        self.delete_guarded(
            Table::Supervisor,
            COUNT_SUPERVISOR_PROJECTS,
            DELETE_SUPERVISOR,
            supervisor_id,
        )
        .await
    }

    pub async fn list_supervisors(&mut self) -> Vec<Supervisor> {
        let executed = self.execute(SELECT_SUPERVISORS, &[], Exec::FETCH).await;
        self.decode_rows(executed, SELECT_SUPERVISORS)
    }

    // --- Projects ---

    /// Inserts a project. The grade is stored as given; the caller has already
    /// cleared it for any status other than `completed`.
    pub async fn add_project(&mut self, form: &ProjectForm) -> Option<i32> {
        let params = project_params(form);
        self.insert_returning_id(Table::Project, INSERT_PROJECT, &params)
            .await
    }

    pub async fn edit_project(&mut self, project_id: i32, form: &ProjectForm) -> bool {
        let mut params = project_params(form);
        params.push(Param::from(project_id));
        self.change(Table::Project, UPDATE_PROJECT, &params, project_id, "Updated")
            .await
    }

    /// Projects have no dependents, so this is a plain delete.
    pub async fn delete_project(&mut self, project_id: i32) -> bool {
        self.change(
            Table::Project,
            DELETE_PROJECT,
            &[Param::from(project_id)],
            project_id,
            "Deleted",
        )
        .await
    }

    pub async fn list_projects(&mut self) -> Vec<Project> {
        let executed = self.execute(SELECT_PROJECTS, &[], Exec::FETCH).await;
        self.decode_rows(executed, SELECT_PROJECTS)
    }

    // --- Shared plumbing ---

    async fn insert_returning_id(
        &mut self,
        table: Table,
        sql: &str,
        params: &[Param],
    ) -> Option<i32> {
        let executed = self.execute(sql, params, Exec::FETCH).await;
        let new_id = self.decode_scalar::<i32>(&executed, sql)?;
        println!("Added {} id={new_id}", table.label());
        Some(new_id)
    }

    /// Runs an UPDATE or DELETE by identity and reports whether a row was hit.
    async fn change(
        &mut self,
        table: Table,
        sql: &str,
        params: &[Param],
        id: i32,
        verb: &str,
    ) -> bool {
        match self.try_execute(sql, params, Exec::RUN).await {
            Ok(done) if done.rows_affected > 0 => {
                println!("{verb} {} id={id}", table.label());
                true
            }
            Ok(_) => {
                println!("{} id={id} not found", capitalize(table.label()));
                false
            }
            Err(err) => {
                self.report(&err, sql, params);
                false
            }
        }
    }

    /// Refuses to delete a row that projects still reference.
    async fn delete_guarded(
        &mut self,
        table: Table,
        count_sql: &str,
        delete_sql: &str,
        id: i32,
    ) -> bool {
        let counted = self
            .execute(count_sql, &[Param::from(id)], Exec::FETCH)
            .await;
        let Some(dependents) = self.decode_scalar::<i64>(&counted, count_sql) else {
            // Already reported by execute (failure or no connection).
            return false;
        };

        if dependents > 0 {
            println!("{}", dependency_refusal(table, id, dependents));
            return false;
        }

        self.change(table, delete_sql, &[Param::from(id)], id, "Deleted")
            .await
    }
}

fn project_params(form: &ProjectForm) -> Vec<Param> {
    vec![
        Param::from(form.title.as_str()),
        Param::from(form.start_date),
        Param::from(form.status.as_str()),
        Param::from(form.grade),
        Param::from(form.supervisor_id),
        Param::from(form.student_id),
    ]
}

fn dependency_refusal(table: Table, id: i32, dependents: i64) -> String {
    format!(
        "Error: Unable to delete {} (ID: {id}). It has {dependents} related projects.",
        table.label()
    )
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
