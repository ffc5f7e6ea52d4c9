/// The three tables the application manages.
///
/// Table and key names are the only identifiers ever spliced into SQL text,
/// and they only come from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Student,
    Supervisor,
    Project,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::Student, Table::Supervisor, Table::Project];

    /// Schema-qualified table name.
    pub fn name(&self) -> &'static str {
        match self {
            Table::Student => "public.student",
            Table::Supervisor => "public.supervisor",
            Table::Project => "public.project",
        }
    }

    pub fn primary_key(&self) -> &'static str {
        match self {
            Table::Student => "student_id",
            Table::Supervisor => "supervisor_id",
            Table::Project => "project_id",
        }
    }

    /// Singular noun used in console messages.
    pub fn label(&self) -> &'static str {
        match self {
            Table::Student => "student",
            Table::Supervisor => "supervisor",
            Table::Project => "project",
        }
    }
}
