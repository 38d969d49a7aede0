//! Profile model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Student submitting records
    Student,
    /// Faculty member reviewing records
    Faculty,
    /// Institution administrator
    Admin,
}

impl Role {
    /// Wire value of the role
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Faculty => "faculty",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Seniority of a faculty member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacultyLevel {
    /// Reviews only assigned students
    Junior,
    /// Reviews every student and sees analytics
    Senior,
    /// Faculty administrator, same visibility as senior
    Admin,
}

impl FacultyLevel {
    /// Wire value of the level
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Junior => "junior",
            Self::Senior => "senior",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for FacultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Identity record stored in the `profiles` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Profile id (referenced by `student_id` on records)
    pub id: String,

    /// Authentication user id; storage paths are keyed by it
    #[serde(default)]
    pub user_id: String,

    /// Display name
    pub full_name: String,

    /// Contact email
    pub email: String,

    /// Account role
    pub role: Role,

    /// Faculty seniority (faculty only)
    #[serde(default)]
    pub faculty_level: Option<FacultyLevel>,

    /// Institutional student number, immutable after provisioning
    #[serde(default, rename = "student_id", alias = "student_id_number")]
    pub student_id_number: Option<String>,

    /// Faculty member who reviews this student
    #[serde(default)]
    pub assigned_faculty_id: Option<String>,
}

impl Profile {
    /// Whether this profile may review every student's records and view
    /// institution-wide analytics.
    #[must_use]
    pub fn sees_all_students(&self) -> bool {
        match self.role {
            Role::Admin => true,
            Role::Faculty => matches!(
                self.faculty_level,
                Some(FacultyLevel::Senior | FacultyLevel::Admin)
            ),
            Role::Student => false,
        }
    }

    /// Whether this profile may decide on certificates at all
    #[must_use]
    pub const fn is_reviewer(&self) -> bool {
        matches!(self.role, Role::Faculty | Role::Admin)
    }

    /// Up to two upper-cased initials from the full name ("Alice Johnson" -> "AJ")
    #[must_use]
    pub fn initials(&self) -> String {
        self.full_name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// Student identity attached to a joined record
///
/// Records whose student profile cannot be resolved carry
/// [`StudentRef::unknown`] instead of failing the whole view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentRef {
    /// Profile id, empty when unknown
    pub id: String,
    /// Display name
    pub full_name: String,
    /// Contact email
    pub email: String,
    /// Institutional student number
    pub student_id_number: Option<String>,
}

impl StudentRef {
    /// Placeholder for a record whose student profile is missing
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            id: String::new(),
            full_name: "Unknown".to_string(),
            email: "Unknown".to_string(),
            student_id_number: None,
        }
    }
}

impl From<&Profile> for StudentRef {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id.clone(),
            full_name: profile.full_name.clone(),
            email: profile.email.clone(),
            student_id_number: profile.student_id_number.clone(),
        }
    }
}
