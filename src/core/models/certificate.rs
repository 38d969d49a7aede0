//! Certificate model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of achievement a certificate or activity records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Coursework, degrees, academic certifications
    Academic,
    /// Clubs, sports, volunteering, events
    CoCurricular,
}

impl Category {
    /// Wire value of the category
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Academic => "academic",
            Self::CoCurricular => "co_curricular",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "academic" => Ok(Self::Academic),
            "co_curricular" | "cocurricular" => Ok(Self::CoCurricular),
            _ => Err(format!("Unknown category: {s}")),
        }
    }
}

/// Verification state of a certificate
///
/// Only `Pending -> Approved` and `Pending -> Rejected` are ever applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateStatus {
    /// Awaiting a faculty decision
    Pending,
    /// Verified by faculty
    Approved,
    /// Declined by faculty
    Rejected,
}

impl CertificateStatus {
    /// Wire value of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Student-uploaded certificate stored in the `certificates` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    /// Certificate id
    pub id: String,
    /// Owning student's profile id
    pub student_id: String,
    /// Title entered at upload
    pub title: String,
    /// Optional free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Academic or co-curricular
    pub category: Category,
    /// Verification state
    pub status: CertificateStatus,
    /// Public URL of the uploaded file
    pub file_url: String,
    /// Original file name
    pub file_name: String,
    /// Upload time
    pub uploaded_at: DateTime<Utc>,
    /// Deciding faculty profile id
    #[serde(default)]
    pub verified_by: Option<String>,
    /// Decision time
    #[serde(default)]
    pub verified_at: Option<DateTime<Utc>>,
    /// Remark given with the decision
    #[serde(default)]
    pub remark: Option<String>,
    /// Reason shown to the student on rejection
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

impl Certificate {
    /// Whether the certificate still awaits a decision
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.status, CertificateStatus::Pending)
    }
}

/// Fields inserted for a new certificate; the store fills id, status and
/// upload time.
#[derive(Debug, Clone, Serialize)]
pub struct NewCertificate {
    /// Owning student's profile id
    pub student_id: String,
    /// Title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Category
    pub category: Category,
    /// Public URL returned by the file upload
    pub file_url: String,
    /// Original file name
    pub file_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_category_spellings() {
        assert_eq!("academic".parse::<Category>(), Ok(Category::Academic));
        assert_eq!("co-curricular".parse::<Category>(), Ok(Category::CoCurricular));
        assert_eq!("CO_CURRICULAR".parse::<Category>(), Ok(Category::CoCurricular));
        assert!("sports".parse::<Category>().is_err());
    }

    #[test]
    fn deserializes_nullable_decision_fields() {
        let json = serde_json::json!({
            "id": "c1",
            "student_id": "stu-1",
            "title": "Python Programming Certificate",
            "description": null,
            "category": "academic",
            "status": "pending",
            "file_url": "https://example.com/cert1.pdf",
            "file_name": "python_cert.pdf",
            "uploaded_at": "2024-01-05T10:00:00+00:00",
            "verified_by": null,
            "verified_at": null
        });
        let cert: Certificate = serde_json::from_value(json).expect("certificate");
        assert!(cert.is_pending());
        assert!(cert.remark.is_none());
        assert!(cert.rejection_reason.is_none());
    }

    #[test]
    fn display_honours_column_width() {
        assert_eq!(format!("{:<9}|", CertificateStatus::Pending), "pending  |");
        assert_eq!(format!("{:>14}", Category::CoCurricular), format!("{:>14}", "co_curricular"));
        assert_eq!(CertificateStatus::Approved.to_string(), "approved");
    }
}
