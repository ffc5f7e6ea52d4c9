pub mod enums;
pub mod record;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::ProjectStatus;
pub use record::Record;
pub use structs::{
    DateSearchRow, GradeSearchRow, Project, ProjectForm, Student, StudentForm, StudentStatsRow,
    Supervisor, SupervisorForm,
};
