//! Institutional report requests
//!
//! Senior faculty and admins request accreditation reports. Generation
//! happens elsewhere; this side only records the request.

use crate::core::error::{ValidationError, WorkflowError, WorkflowResult};
use crate::core::models::{InstitutionalReport, Profile, ReportStatus, ReportType};
use crate::core::store::{Gateway, Query, Table};
use crate::info;
use serde::Serialize;
use serde_json::Value;

/// New report request
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    /// Title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Target framework
    pub report_type: ReportType,
    /// Free-form parameters
    pub parameters: Value,
}

#[derive(Serialize)]
struct NewReport<'a> {
    title: &'a str,
    description: Option<&'a str>,
    report_type: ReportType,
    generated_by: &'a str,
    parameters: &'a Value,
    status: ReportStatus,
}

fn ensure_senior(viewer: &Profile) -> WorkflowResult<()> {
    if viewer.sees_all_students() {
        Ok(())
    } else {
        Err(WorkflowError::AccessDenied(
            "institutional reports are available to senior faculty and admins".to_string(),
        ))
    }
}

/// Record a report request with status `generating`
///
/// # Errors
/// `MissingTitle`; `AccessDenied`; store failures.
pub async fn request_report(
    gateway: &Gateway,
    viewer: &Profile,
    request: &ReportRequest,
) -> WorkflowResult<InstitutionalReport> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(ValidationError::MissingTitle.into());
    }
    ensure_senior(viewer)?;
    let row = NewReport {
        title,
        description: request.description.as_deref().map(str::trim).filter(|d| !d.is_empty()),
        report_type: request.report_type,
        generated_by: &viewer.id,
        parameters: &request.parameters,
        status: ReportStatus::Generating,
    };
    let report: InstitutionalReport = gateway.insert(Table::InstitutionalReports, &row).await?;
    info!("Requested {} report '{}'", report.report_type, report.title);
    Ok(report)
}

/// All report requests, newest first
///
/// # Errors
/// `AccessDenied`; store failures.
pub async fn list_reports(
    gateway: &Gateway,
    viewer: &Profile,
) -> WorkflowResult<Vec<InstitutionalReport>> {
    ensure_senior(viewer)?;
    let query = Query::new().order_desc("created_at");
    Ok(gateway.fetch_collection(Table::InstitutionalReports, &query).await?)
}

/// Remove a report request
///
/// # Errors
/// `AccessDenied`; store failures.
pub async fn delete_report(gateway: &Gateway, viewer: &Profile, id: &str) -> WorkflowResult<()> {
    ensure_senior(viewer)?;
    gateway.delete(Table::InstitutionalReports, id).await?;
    Ok(())
}
