use serde::{Deserialize, Serialize};

/// The two conventional project statuses.
///
/// The `status` column itself is free text; this enum only names the values
/// the application gives special meaning to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Completed,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 2] = [ProjectStatus::Active, ProjectStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
        }
    }

    /// Trims and lowercases a status as typed by the user.
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_lowercase()
    }

    /// A grade may only be stored for a project whose status is `completed`.
    pub fn carries_grade(status: &str) -> bool {
        Self::normalize(status) == ProjectStatus::Completed.as_str()
    }
}
