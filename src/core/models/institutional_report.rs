//! Institutional report model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Accreditation or reporting framework a report targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    /// National Assessment and Accreditation Council
    Naac,
    /// All India Council for Technical Education
    Aicte,
    /// National Institutional Ranking Framework
    Nirf,
    /// Internal review
    Internal,
    /// Ad-hoc report
    Custom,
}

impl ReportType {
    /// Wire value of the type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Naac => "naac",
            Self::Aicte => "aicte",
            Self::Nirf => "nirf",
            Self::Internal => "internal",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "naac" => Ok(Self::Naac),
            "aicte" => Ok(Self::Aicte),
            "nirf" => Ok(Self::Nirf),
            "internal" => Ok(Self::Internal),
            "custom" => Ok(Self::Custom),
            _ => Err(format!("Unknown report type: {s}")),
        }
    }
}

/// Generation state; completion happens outside this application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Requested, not finished
    Generating,
    /// File available
    Completed,
    /// Generation failed
    Failed,
    /// Any state this client does not know about
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Generating => "generating",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Row of the `institutional_reports` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionalReport {
    /// Report id
    pub id: String,
    /// Title
    pub title: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Target framework
    pub report_type: ReportType,
    /// Requesting profile id
    #[serde(default)]
    pub generated_by: Option<String>,
    /// Free-form generation parameters
    #[serde(default)]
    pub parameters: serde_json::Value,
    /// Generated file, once complete
    #[serde(default)]
    pub file_url: Option<String>,
    /// Generation state
    pub status: ReportStatus,
    /// Request time
    pub created_at: DateTime<Utc>,
    /// Completion time
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}
