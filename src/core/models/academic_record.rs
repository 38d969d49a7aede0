//! Academic record model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Graded subject from the `academic_records` table (read-only for students)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicRecord {
    /// Record id
    pub id: String,
    /// Owning student's profile id
    pub student_id: String,
    /// Semester label (e.g. "Fall 2023")
    pub semester: String,
    /// Subject code (e.g. "CS101")
    pub subject_code: String,
    /// Subject name
    pub subject_name: String,
    /// Credit hours (can be fractional)
    pub credits: f64,
    /// Letter grade
    pub grade: String,
    /// Grade points for this subject
    #[serde(default)]
    pub grade_points: Option<f64>,
    /// Cumulative GPA as of this record
    #[serde(default)]
    pub cgpa: Option<f64>,
    /// Academic year label (e.g. "2023-24")
    pub academic_year: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Band of a letter grade, used to colour transcripts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeBand {
    /// A, A-, A+
    Excellent,
    /// B range
    Good,
    /// C range
    Average,
    /// D range
    Poor,
    /// F and anything unrecognised
    Failing,
}

impl AcademicRecord {
    /// Band of this record's letter grade
    #[must_use]
    pub fn grade_band(&self) -> GradeBand {
        match self.grade.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('A') => GradeBand::Excellent,
            Some('B') => GradeBand::Good,
            Some('C') => GradeBand::Average,
            Some('D') => GradeBand::Poor,
            _ => GradeBand::Failing,
        }
    }
}
