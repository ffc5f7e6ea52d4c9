/// The numbered menu commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    ListStudents,
    ListSupervisors,
    ListProjects,
    AddStudent,
    AddSupervisor,
    AddProject,
    EditStudent,
    EditSupervisor,
    EditProject,
    DeleteStudent,
    DeleteSupervisor,
    DeleteProject,
    GenerateDemoData,
    SearchByGrade,
    SearchByDate,
    SearchStudentStats,
}

impl Command {
    pub const ALL: [Command; 17] = [
        Command::Exit,
        Command::ListStudents,
        Command::ListSupervisors,
        Command::ListProjects,
        Command::AddStudent,
        Command::AddSupervisor,
        Command::AddProject,
        Command::EditStudent,
        Command::EditSupervisor,
        Command::EditProject,
        Command::DeleteStudent,
        Command::DeleteSupervisor,
        Command::DeleteProject,
        Command::GenerateDemoData,
        Command::SearchByGrade,
        Command::SearchByDate,
        Command::SearchStudentStats,
    ];

    /// The menu code; also the position in `ALL`.
    pub fn code(&self) -> usize {
        *self as usize
    }

    /// Matches a typed choice against the literal codes "0".."16".
    pub fn parse(choice: &str) -> Option<Self> {
        let choice = choice.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|cmd| cmd.code().to_string() == choice)
    }
}
