//! Portfolio export command handler
//!
//! Renders the signed-in student's portfolio as Markdown, HTML or PDF.

use crate::commands::CommandResult;
use campus_records::config::Config;
use campus_records::core::portfolio::{load_portfolio, Portfolio, PortfolioDetails};
use campus_records::core::report::formats::pdf::PdfOutcome;
use campus_records::core::report::{
    HtmlReporter, MarkdownReporter, PdfReporter, ReportContext, ReportFormat, ReportGenerator,
};
use campus_records::core::session::AppState;
use campus_records::{error, info};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Options of the portfolio command
#[derive(Debug)]
pub struct PortfolioOptions {
    /// Optional details TOML file
    pub details: Option<PathBuf>,
    /// Explicit output path
    pub output: Option<PathBuf>,
    /// Requested format name
    pub format: String,
    /// Browser binary for PDF printing
    pub pdf_converter: Option<String>,
}

/// Run the portfolio command.
pub async fn run(options: PortfolioOptions, state: &AppState, config: &Config) -> CommandResult {
    let format = ReportFormat::from_str(&options.format)
        .map_err(|e| format!("{e}. Use: markdown, html, or pdf"))?;
    let details = match &options.details {
        Some(path) => PortfolioDetails::load(path)?,
        None => PortfolioDetails::default(),
    };

    let profile = state.require_profile()?;
    let portfolio = load_portfolio(state.gateway(), profile, details).await?;
    let output_path = match options.output {
        Some(path) => path,
        None => default_output_path(config, &portfolio, format)?,
    };

    let ctx = ReportContext::new(&portfolio);
    write_portfolio(&ctx, format, &output_path, options.pdf_converter.as_deref()).map_err(|e| {
        error!("Portfolio export failed: {e}");
        e
    })?;
    print_summary(&portfolio);
    Ok(())
}

fn default_output_path(
    config: &Config,
    portfolio: &Portfolio,
    format: ReportFormat,
) -> Result<PathBuf, String> {
    let reports_dir = PathBuf::from(&config.paths.reports_dir);
    std::fs::create_dir_all(&reports_dir)
        .map_err(|e| format!("Failed to create reports directory {}: {e}", reports_dir.display()))?;
    let stem: String = portfolio
        .profile
        .full_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    let stem = if stem.trim_matches('_').is_empty() { "student".to_string() } else { stem };
    Ok(reports_dir.join(format!("{stem}_portfolio.{}", format.extension())))
}

fn write_portfolio(
    ctx: &ReportContext,
    format: ReportFormat,
    output_path: &Path,
    converter: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        ReportFormat::Markdown => MarkdownReporter::new().generate(ctx, output_path)?,
        ReportFormat::Html => HtmlReporter::new().generate(ctx, output_path)?,
        ReportFormat::Pdf => {
            let reporter = converter.map_or_else(PdfReporter::new, PdfReporter::with_converter);
            if let PdfOutcome::HtmlFallback(html_path) = reporter.export(ctx, output_path)? {
                println!("ℹ {}", PdfReporter::conversion_advice(&html_path));
                return Ok(());
            }
        }
    }
    println!("✓ Portfolio generated: {}", output_path.display());
    info!("Portfolio exported to: {}", output_path.display());
    Ok(())
}

fn print_summary(portfolio: &Portfolio) {
    println!("\n=== Summary ===");
    println!("Student: {}", portfolio.profile.full_name);
    println!(
        "Certificates: {} approved of {} ({}%)",
        portfolio.certificates.approved, portfolio.certificates.total, portfolio.progress
    );
    println!(
        "Activities: {} approved, {} credits",
        portfolio.approved_activities, portfolio.activity_credits
    );
    println!("CGPA: {:.2}", portfolio.academic.current_cgpa);
}
