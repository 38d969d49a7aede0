//! Student achievement summary model

use serde::{Deserialize, Serialize};

/// Row of the read-only `student_achievements_summary` view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementSummary {
    /// Student profile id
    pub student_id: String,
    /// Display name
    pub full_name: String,
    /// Institutional student number
    #[serde(default)]
    pub student_id_number: Option<String>,
    /// Certificates uploaded
    #[serde(default)]
    pub total_certificates: u32,
    /// Certificates approved
    #[serde(default)]
    pub approved_certificates: u32,
    /// Activities recorded
    #[serde(default)]
    pub total_activities: u32,
    /// Activities approved
    #[serde(default)]
    pub approved_activities: u32,
    /// Credits from approved activities; null counts as zero
    #[serde(default)]
    pub total_credits: Option<u32>,
    /// Latest cumulative GPA
    #[serde(default)]
    pub current_cgpa: Option<f64>,
}

impl AchievementSummary {
    /// Credits, zero when the view reports null
    #[must_use]
    pub fn credits(&self) -> u32 {
        self.total_credits.unwrap_or(0)
    }
}
