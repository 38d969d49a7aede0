//! Student certificate command handlers

use crate::args::CertificatesSubcommand;
use crate::commands::{short_date, CommandResult};
use campus_records::core::models::{Category, Certificate, CertificateStatus};
use campus_records::core::session::AppState;
use campus_records::core::upload::{student_certificates, upload_certificate, CertificateUpload};
use std::path::Path;

/// Dispatch certificate subcommands
pub async fn run(subcommand: Option<CertificatesSubcommand>, state: &AppState) -> CommandResult {
    match subcommand {
        None => handle_list(state, None).await,
        Some(CertificatesSubcommand::List { status }) => {
            handle_list(state, status.map(Into::into)).await
        }
        Some(CertificatesSubcommand::Upload { file, title, category, description }) => {
            handle_upload(state, &file, &title, category, description).await
        }
    }
}

async fn handle_list(state: &AppState, status: Option<CertificateStatus>) -> CommandResult {
    let profile = state.require_profile()?;
    let list = student_certificates(state.gateway(), &profile.id).await?;
    let shown: Vec<&Certificate> = match status {
        Some(status) => list.with_status(status),
        None => list.all.iter().collect(),
    };

    println!(
        "\n=== Certificates ({} pending, {} approved, {} rejected) ===\n",
        list.with_status(CertificateStatus::Pending).len(),
        list.with_status(CertificateStatus::Approved).len(),
        list.with_status(CertificateStatus::Rejected).len()
    );
    if shown.is_empty() {
        println!("No certificates to show.");
        return Ok(());
    }
    for certificate in shown {
        print_certificate(certificate);
    }
    Ok(())
}

pub(crate) fn print_certificate(certificate: &Certificate) {
    println!(
        "{:<10} {:<9} {:<14} {}  [{}]",
        certificate.id,
        certificate.status,
        certificate.category,
        short_date(certificate.uploaded_at),
        certificate.title
    );
    if let Some(remark) = &certificate.remark {
        println!("           remark: {remark}");
    }
    if let Some(reason) = &certificate.rejection_reason {
        println!("           rejection reason: {reason}");
    }
}

async fn handle_upload(
    state: &AppState,
    file: &Path,
    title: &str,
    category: Category,
    description: Option<String>,
) -> CommandResult {
    let profile = state.require_profile()?;
    let upload = CertificateUpload::from_file(file, title, category, description)?;
    let certificate = upload_certificate(state.gateway(), profile, upload).await?;
    println!("✓ Uploaded '{}' ({}) - awaiting review", certificate.title, certificate.id);
    Ok(())
}
