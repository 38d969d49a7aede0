//! Portfolio report rendering
//!
//! A composed [`Portfolio`] is flattened into a [`ReportContext`] of display
//! strings and rendered to Markdown or HTML. PDF output is handed off to a
//! headless browser's print facility.

pub mod formats;

use crate::core::models::Category;
use crate::core::portfolio::{Link, Portfolio};
use std::error::Error;
use std::path::Path;

pub use formats::{HtmlReporter, MarkdownReporter, PdfReporter, ReportFormat};

/// Label and value pair shown in a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Row label
    pub label: String,
    /// Row value
    pub value: String,
}

impl Field {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self { label: label.to_string(), value: value.into() }
    }
}

/// Approved certificate row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRow {
    /// Title
    pub title: String,
    /// "Academic" or "Co-curricular"
    pub category: String,
    /// Upload date (YYYY-MM-DD)
    pub date: String,
    /// Reviewer remark, empty when none
    pub remark: String,
}

/// Display-ready data for report templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    /// Student name
    pub name: String,
    /// Two-letter initials
    pub initials: String,
    /// Contact email
    pub email: String,
    /// Institutional student number, empty when none
    pub student_number: String,
    /// Generation date
    pub generated: String,
    /// Phone, address and date of birth rows that are filled in
    pub contact: Vec<Field>,
    /// Biography, empty when none
    pub bio: String,
    /// Skills, languages and interests rows that are filled in
    pub lists: Vec<Field>,
    /// Normalized links
    pub links: Vec<Link>,
    /// Headline statistics
    pub stats: Vec<Field>,
    /// Overall approval progress in percent
    pub progress: u32,
    /// Approved certificates
    pub certificates: Vec<CertificateRow>,
}

fn category_label(category: Category) -> &'static str {
    match category {
        Category::Academic => "Academic",
        Category::CoCurricular => "Co-curricular",
    }
}

impl ReportContext {
    /// Flatten a composed portfolio
    #[must_use]
    pub fn new(portfolio: &Portfolio) -> Self {
        let profile = &portfolio.profile;
        let details = &portfolio.details;

        let contact = [
            ("Phone", &details.phone),
            ("Address", &details.address),
            ("Date of birth", &details.date_of_birth),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| Field::new(label, v))
        })
        .collect();

        let lists = [
            ("Skills", &details.skills),
            ("Languages", &details.languages),
            ("Interests", &details.interests),
        ]
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(label, items)| Field::new(label, items.join(", ")))
        .collect();

        let academic = &portfolio.academic;
        let stats = vec![
            Field::new("Certificates", portfolio.certificates.total.to_string()),
            Field::new("Approved", portfolio.certificates.approved.to_string()),
            Field::new("Pending", portfolio.certificates.pending.to_string()),
            Field::new("Rejected", portfolio.certificates.rejected.to_string()),
            Field::new("Approval rate", format!("{}%", portfolio.progress)),
            Field::new("Approved activities", portfolio.approved_activities.to_string()),
            Field::new("Activity credits", portfolio.activity_credits.to_string()),
            Field::new("Current CGPA", format!("{:.2}", academic.current_cgpa)),
            Field::new("Subjects", academic.total_subjects.to_string()),
            Field::new("Academic credits", format!("{:.1}", academic.total_credits)),
        ];

        let certificates = portfolio
            .approved_certificates
            .iter()
            .map(|c| CertificateRow {
                title: c.title.clone(),
                category: category_label(c.category).to_string(),
                date: c.uploaded_at.format("%Y-%m-%d").to_string(),
                remark: c.remark.clone().unwrap_or_default(),
            })
            .collect();

        Self {
            name: profile.full_name.clone(),
            initials: profile.initials(),
            email: profile.email.clone(),
            student_number: profile.student_id_number.clone().unwrap_or_default(),
            generated: portfolio.generated_at.format("%Y-%m-%d").to_string(),
            contact,
            bio: details.bio.clone().unwrap_or_default().trim().to_string(),
            lists,
            links: portfolio.links.clone(),
            stats,
            progress: portfolio.progress,
            certificates,
        }
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report to a file
    ///
    /// # Errors
    /// Returns an error if rendering or file writing fails
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>>;

    /// Generate report content as a string
    ///
    /// # Errors
    /// Returns an error if rendering fails
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>>;
}
