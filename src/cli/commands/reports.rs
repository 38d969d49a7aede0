//! Institutional report command handlers

use crate::args::ReportsSubcommand;
use crate::commands::{short_date, CommandResult};
use campus_records::core::institutional::{
    delete_report, list_reports, request_report, ReportRequest,
};
use campus_records::core::session::AppState;
use serde_json::json;

/// Dispatch report subcommands
pub async fn run(subcommand: Option<ReportsSubcommand>, state: &AppState) -> CommandResult {
    let viewer = state.require_profile()?;
    match subcommand {
        None | Some(ReportsSubcommand::List) => {
            let reports = list_reports(state.gateway(), viewer).await?;
            println!("\n=== Institutional Reports ({}) ===\n", reports.len());
            for report in reports {
                println!(
                    "{:<10} {:<8} {:<10} {}  {}",
                    report.id,
                    report.report_type,
                    report.status,
                    short_date(report.created_at),
                    report.title
                );
                if let Some(url) = &report.file_url {
                    println!("           {url}");
                }
            }
        }
        Some(ReportsSubcommand::Generate { title, report_type, description }) => {
            let request = ReportRequest { title, description, report_type, parameters: json!({}) };
            let report = request_report(state.gateway(), viewer, &request).await?;
            println!(
                "✓ Requested {} report '{}' ({})",
                report.report_type, report.title, report.id
            );
        }
        Some(ReportsSubcommand::Delete { id }) => {
            delete_report(state.gateway(), viewer, &id).await?;
            println!("✓ Deleted report {id}");
        }
    }
    Ok(())
}
