//! Analytics, records and recommendation command handlers

use crate::args::{AcademicGrouping, ActivityGrouping, RecordsSubcommand};
use crate::commands::CommandResult;
use campus_records::core::analytics::{
    group_by_academic_year, group_by_activity_type, group_by_semester, group_by_start_year,
    load_academic_records, load_co_curricular, load_dashboard, recommendations, AcademicStats,
    CoCurricularStats, MAX_RECOMMENDATIONS,
};
use campus_records::core::models::{GradeBand, Role};
use campus_records::core::session::AppState;
use campus_records::core::upload::student_certificates;

/// Institution-wide dashboard
pub async fn run_dashboard(top: usize, state: &AppState) -> CommandResult {
    let viewer = state.require_profile()?;
    let dashboard = load_dashboard(state.gateway(), viewer, top).await?;
    let overview = &dashboard.overview;

    println!("\n=== Analytics ===\n");
    println!("Students:               {}", overview.total_students);
    println!("Faculty:                {}", overview.total_faculty);
    println!(
        "Certificates:           {} total, {} approved, {} pending, {} rejected ({}% approved)",
        overview.certificates.total,
        overview.certificates.approved,
        overview.certificates.pending,
        overview.certificates.rejected,
        overview.certificates.approval_rate()
    );
    println!(
        "Activities:             {} total, {} approved, {} pending, {} rejected",
        overview.activities.total,
        overview.activities.approved,
        overview.activities.pending,
        overview.activities.rejected
    );
    println!("Total credits:          {}", overview.total_credits);
    println!("Avg credits / student:  {:.1}", overview.average_credits_per_student);

    println!("\n=== Top performers ===\n");
    for summary in &dashboard.top_performers {
        println!("  ★ {} ({} credits)", summary.full_name, summary.credits());
    }

    println!("\n=== Top {} students by credits ===\n", dashboard.leaderboard.len());
    for (rank, summary) in dashboard.leaderboard.iter().enumerate() {
        println!(
            "{:>2}. {:<22} {:>4} credits  {:>3}/{:<3} certificates approved",
            rank + 1,
            summary.full_name,
            summary.credits(),
            summary.approved_certificates,
            summary.total_certificates
        );
    }
    Ok(())
}

/// Academic transcript or co-curricular record of the signed-in student
pub async fn run_records(subcommand: RecordsSubcommand, state: &AppState) -> CommandResult {
    let profile = state.require_profile()?;
    if profile.role != Role::Student {
        return Err("records are kept for student profiles only".into());
    }
    match subcommand {
        RecordsSubcommand::Academic { by } => {
            let records = load_academic_records(state.gateway(), &profile.id).await?;
            let stats = AcademicStats::compute(&records);
            println!("\n=== Academic Records ===\n");
            println!(
                "CGPA {:.2} | {} subjects | {:.1} credits | avg grade points {:.2}",
                stats.current_cgpa,
                stats.total_subjects,
                stats.total_credits,
                stats.average_grade_points
            );
            let groups = match by {
                AcademicGrouping::Year => group_by_academic_year(&records),
                AcademicGrouping::Semester => group_by_semester(&records),
            };
            for group in groups {
                println!("\n{} ({:.1} credits)", group.key, group.credits());
                for record in group.items {
                    println!(
                        "  {:<8} {:<32} {:>4.1} cr  {:<3}{}",
                        record.subject_code,
                        record.subject_name,
                        record.credits,
                        record.grade,
                        band_marker(record.grade_band())
                    );
                }
            }
        }
        RecordsSubcommand::Activities { by } => {
            let activities = load_co_curricular(state.gateway(), &profile.id).await?;
            let stats = CoCurricularStats::compute(&activities);
            println!("\n=== Co-curricular Activities ===\n");
            println!(
                "{} activities | {} credits | {} types | avg {:.1} credits",
                stats.total_activities,
                stats.total_credits,
                stats.activity_types,
                stats.average_credits
            );
            let groups = match by {
                ActivityGrouping::Type => group_by_activity_type(&activities),
                ActivityGrouping::Year => group_by_start_year(&activities),
            };
            for group in groups {
                println!("\n{} ({} credits)", group.key, group.credits());
                for activity in group.items {
                    println!(
                        "  {:<36} {:<24} {} cr",
                        activity.title,
                        activity.organization.as_deref().unwrap_or("-"),
                        activity.credits()
                    );
                }
            }
        }
    }
    Ok(())
}

const fn band_marker(band: GradeBand) -> &'static str {
    match band {
        GradeBand::Excellent => " ★",
        GradeBand::Poor | GradeBand::Failing => " !",
        GradeBand::Good | GradeBand::Average => "",
    }
}

/// Suggestions from the student's approved certificates
pub async fn run_recommendations(state: &AppState) -> CommandResult {
    let profile = state.require_profile()?;
    let list = student_certificates(state.gateway(), &profile.id).await?;
    println!("\n=== Recommendations ===\n");
    for rec in recommendations(&list.all).into_iter().take(MAX_RECOMMENDATIONS) {
        println!("[{}] {} ({}, {})", rec.priority.as_str(), rec.title, rec.category, rec.kind);
        println!("      {}", rec.description);
        println!("      -> {}", rec.action);
    }
    Ok(())
}
