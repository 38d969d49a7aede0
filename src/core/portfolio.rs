//! Portfolio composition
//!
//! Merges a profile, the user's own portfolio details, and the computed
//! statistics into one printable view.

use crate::core::analytics::{AcademicStats, StatusBreakdown};
use crate::core::error::{ValidationError, WorkflowResult};
use crate::core::models::{
    AcademicRecord, Activity, ActivityStatus, Certificate, CertificateStatus, Profile,
};
use crate::core::store::{Gateway, Query, Table};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Link with a display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Display label
    pub label: String,
    /// Target URL
    pub url: String,
}

/// User-entered portfolio fields, read from a TOML file
///
/// List fields accept either a TOML array or a comma-separated string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PortfolioDetails {
    /// Phone number
    pub phone: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// Date of birth as entered
    pub date_of_birth: Option<String>,
    /// Short biography
    pub bio: Option<String>,
    /// Skills
    #[serde(deserialize_with = "comma_list")]
    pub skills: Vec<String>,
    /// Spoken languages
    #[serde(deserialize_with = "comma_list")]
    pub languages: Vec<String>,
    /// Interests
    #[serde(deserialize_with = "comma_list")]
    pub interests: Vec<String>,
    /// GitHub profile
    pub github: Option<String>,
    /// LinkedIn profile
    pub linkedin: Option<String>,
    /// Personal site
    pub portfolio: Option<String>,
    /// Extra labelled links
    pub custom_links: Vec<Link>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListField {
    Text(String),
    Items(Vec<String>),
}

/// Split a comma list, trimming entries and dropping blanks
#[must_use]
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn comma_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match ListField::deserialize(deserializer)? {
        ListField::Text(text) => split_list(&text),
        ListField::Items(items) => items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

impl PortfolioDetails {
    /// Parse details from TOML text
    ///
    /// # Errors
    /// Returns an error string if the TOML is malformed.
    pub fn from_toml(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| format!("Failed to parse portfolio details: {e}"))
    }

    /// Read details from a TOML file
    ///
    /// # Errors
    /// Returns an error string if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        Self::from_toml(&text)
    }

    /// Platform links followed by custom links, normalized, blanks dropped
    ///
    /// # Errors
    /// `InvalidLink` for a link containing whitespace.
    pub fn links(&self) -> Result<Vec<Link>, ValidationError> {
        let platforms = [
            ("GitHub", &self.github),
            ("LinkedIn", &self.linkedin),
            ("Portfolio", &self.portfolio),
        ];
        let mut links = Vec::new();
        for (label, raw) in platforms {
            if let Some(url) = raw.as_deref().map(normalize_url).transpose()?.flatten() {
                links.push(Link { label: label.to_string(), url });
            }
        }
        for custom in &self.custom_links {
            if let Some(url) = normalize_url(&custom.url)? {
                let label = custom.label.trim();
                let label = if label.is_empty() { url.clone() } else { label.to_string() };
                links.push(Link { label, url });
            }
        }
        Ok(links)
    }
}

/// Prefix `https://` when the link has no scheme
///
/// Returns `Ok(None)` for a blank link.
///
/// # Errors
/// `InvalidLink` when the link contains whitespace.
pub fn normalize_url(raw: &str) -> Result<Option<String>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidLink(trimmed.to_string()));
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.contains("://") || lower.starts_with("mailto:") {
        Ok(Some(trimmed.to_string()))
    } else {
        Ok(Some(format!("https://{trimmed}")))
    }
}

/// Everything a printed portfolio shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Portfolio {
    /// Identity
    pub profile: Profile,
    /// User-entered fields
    #[serde(skip)]
    pub details: PortfolioDetails,
    /// Normalized links
    pub links: Vec<Link>,
    /// Certificate counts
    pub certificates: StatusBreakdown,
    /// Approval rate in percent
    pub progress: u32,
    /// Approved activities
    pub approved_activities: usize,
    /// Credits from approved activities
    pub activity_credits: u32,
    /// Transcript totals
    pub academic: AcademicStats,
    /// Approved certificates, newest first
    pub approved_certificates: Vec<Certificate>,
    /// Composition time
    pub generated_at: DateTime<Utc>,
}

impl Portfolio {
    /// Merge identity, details and statistics
    ///
    /// `records` must be ordered newest first.
    ///
    /// # Errors
    /// `InvalidLink` for a malformed link.
    pub fn compose(
        profile: &Profile,
        details: PortfolioDetails,
        certificates: &[Certificate],
        activities: &[Activity],
        records: &[AcademicRecord],
    ) -> Result<Self, ValidationError> {
        let links = details.links()?;
        let breakdown = StatusBreakdown::of_certificates(certificates);
        let approved: Vec<&Activity> = activities
            .iter()
            .filter(|a| a.status == ActivityStatus::Approved)
            .collect();
        let mut approved_certificates: Vec<Certificate> = certificates
            .iter()
            .filter(|c| c.status == CertificateStatus::Approved)
            .cloned()
            .collect();
        approved_certificates.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));

        Ok(Self {
            profile: profile.clone(),
            details,
            links,
            progress: breakdown.approval_rate(),
            certificates: breakdown,
            approved_activities: approved.len(),
            activity_credits: approved.iter().map(|a| a.credits()).sum(),
            academic: AcademicStats::compute(records),
            approved_certificates,
            generated_at: Utc::now(),
        })
    }
}

/// Fetch a student's records and compose their portfolio
///
/// # Errors
/// `InvalidLink` for malformed details; store failures.
pub async fn load_portfolio(
    gateway: &Gateway,
    profile: &Profile,
    details: PortfolioDetails,
) -> WorkflowResult<Portfolio> {
    let own = || Query::new().eq("student_id", profile.id.as_str());
    let certificates: Vec<Certificate> = gateway
        .fetch_collection(Table::Certificates, &own().order_desc("uploaded_at"))
        .await?;
    let activities: Vec<Activity> = gateway.fetch_collection(Table::Activities, &own()).await?;
    let records: Vec<AcademicRecord> = gateway
        .fetch_collection(
            Table::AcademicRecords,
            &own().order_desc("academic_year").order_desc("semester"),
        )
        .await?;
    Ok(Portfolio::compose(profile, details, &certificates, &activities, &records)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_schemes_and_blanks() {
        let github = normalize_url("github.com/alice");
        assert_eq!(github, Ok(Some("https://github.com/alice".to_string())));
        assert_eq!(normalize_url("http://a.dev"), Ok(Some("http://a.dev".to_string())));
        assert_eq!(normalize_url("   "), Ok(None));
        assert!(normalize_url("not a link").is_err());
    }

    #[test]
    fn parses_lists_from_text_or_arrays() {
        let details = PortfolioDetails::from_toml(
            r#"
            skills = "Rust, Python ,, SQL"
            languages = ["English", " Hindi "]
            github = "github.com/alice"
            linkedin = ""

            [[custom_links]]
            label = "Blog"
            url = "myblog.com"
            "#,
        )
        .expect("details");
        assert_eq!(details.skills, vec!["Rust", "Python", "SQL"]);
        assert_eq!(details.languages, vec!["English", "Hindi"]);
        assert!(details.interests.is_empty());

        let links = details.links().expect("links");
        assert_eq!(
            links,
            vec![
                Link { label: "GitHub".to_string(), url: "https://github.com/alice".to_string() },
                Link { label: "Blog".to_string(), url: "https://myblog.com".to_string() },
            ]
        );
    }
}
