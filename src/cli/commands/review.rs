//! Faculty review command handlers

use crate::args::ReviewSubcommand;
use crate::commands::{short_date, CommandResult};
use campus_records::core::analytics::load_student_progress;
use campus_records::core::session::AppState;
use campus_records::core::workflow::{CertificateWorkflow, DecisionAction, ReviewItem};

/// Dispatch review subcommands
pub async fn run(subcommand: ReviewSubcommand, state: &AppState) -> CommandResult {
    let reviewer = state.require_profile()?;
    let workflow = CertificateWorkflow::new(state.gateway().clone());
    match subcommand {
        ReviewSubcommand::Queue => {
            let queue = workflow.review_queue(reviewer).await?;
            println!("\n=== Pending ({}) ===\n", queue.pending.len());
            queue.pending.iter().for_each(print_item);
            println!("\n=== Processed ({}) ===\n", queue.processed.len());
            queue.processed.iter().for_each(print_item);
        }
        ReviewSubcommand::Students => {
            let standings = workflow.student_standings(reviewer).await?;
            println!("\n=== Students ({}) ===\n", standings.len());
            for standing in standings {
                let student = &standing.student;
                println!(
                    "{:<8} {:<22} {:<16} {:>3}/{:<3} {:>3}%  {}",
                    student.id,
                    student.full_name,
                    student.student_id_number.as_deref().unwrap_or("-"),
                    standing.certificates.approved,
                    standing.certificates.total,
                    standing.progress(),
                    student.email
                );
            }
        }
        ReviewSubcommand::Approve { id, remark } => {
            let certificate =
                workflow.decide(reviewer, &id, DecisionAction::Approve, &remark).await?;
            println!("✓ Approved '{}'", certificate.title);
        }
        ReviewSubcommand::Reject { id, remark } => {
            let certificate =
                workflow.decide(reviewer, &id, DecisionAction::Reject, &remark).await?;
            println!("✓ Rejected '{}'", certificate.title);
        }
    }
    Ok(())
}

fn print_item(item: &ReviewItem) {
    let certificate = &item.certificate;
    println!(
        "{:<10} {:<9} {:<14} {}  {} - {}",
        certificate.id,
        certificate.status,
        certificate.category,
        short_date(certificate.uploaded_at),
        item.student.full_name,
        certificate.title
    );
}

/// Show one student's certificate progress
pub async fn run_student(student_id: &str, state: &AppState) -> CommandResult {
    let viewer = state.require_profile()?;
    let progress = load_student_progress(state.gateway(), viewer, student_id).await?;

    println!("\n=== {} ===\n", progress.student.full_name);
    if let Some(number) = &progress.student.student_id_number {
        println!("Student number: {number}");
    }
    println!("Email:          {}", progress.student.email);
    let breakdown = &progress.breakdown;
    println!(
        "Certificates:   {} total, {} approved, {} pending, {} rejected",
        breakdown.total, breakdown.approved, breakdown.pending, breakdown.rejected
    );
    println!("Progress:       {}%", progress.progress);

    if !progress.timeline.is_empty() {
        println!("\nMonth     Uploads  Approved");
        for point in &progress.timeline {
            println!("{:<9} {:>7}  {:>8}", point.month, point.uploads, point.approved);
        }
    }
    if !progress.category_timeline.is_empty() {
        println!("\nMonth     Academic  Co-curricular");
        for point in &progress.category_timeline {
            println!("{:<9} {:>8}  {:>13}", point.month, point.academic, point.co_curricular);
        }
    }

    println!("\nBy status:");
    for (status, count) in &progress.status_counts {
        println!("  {status:<14} {count}");
    }
    println!("By category:");
    for (category, count) in &progress.category_counts {
        println!("  {category:<14} {count}");
    }
    Ok(())
}
