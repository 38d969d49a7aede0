//! PDF portfolio via the browser's print facility
//!
//! The HTML report is written first and printed with headless
//! Chrome/Chromium. No PDF encoding happens in-process. Without a browser
//! the HTML file is kept so the user can print it themselves.

use super::html::HtmlReporter;
use crate::core::report::{ReportContext, ReportGenerator};
use crate::{debug, warn};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Result of a PDF export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfOutcome {
    /// PDF written at this path
    Pdf(PathBuf),
    /// No converter found; printable HTML written at this path instead
    HtmlFallback(PathBuf),
}

/// PDF report generator using HTML-to-PDF conversion
pub struct PdfReporter {
    converter: Option<String>,
}

impl PdfReporter {
    /// Create a new PDF reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { converter: None }
    }

    /// Create a PDF reporter with a custom converter
    #[must_use]
    pub fn with_converter(converter: &str) -> Self {
        Self { converter: Some(converter.to_owned()) }
    }

    fn detect_chrome() -> Option<String> {
        let candidates = [
            "google-chrome",
            "chrome",
            "chromium",
            "chromium-browser",
            "google-chrome-stable",
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "C:\\Program Files\\Google\\Chrome\\Application\\chrome.exe",
            "C:\\Program Files (x86)\\Google\\Chrome\\Application\\chrome.exe",
        ];

        candidates.into_iter().find_map(|candidate| {
            Command::new(candidate)
                .arg("--version")
                .output()
                .ok()
                .filter(|output| output.status.success())
                .map(|_| candidate.to_owned())
        })
    }

    fn print_to_pdf(
        chrome_cmd: &str,
        html_path: &Path,
        pdf_path: &Path,
    ) -> Result<(), Box<dyn Error>> {
        debug!("Printing {} with {chrome_cmd}", html_path.display());
        let status = Command::new(chrome_cmd)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--no-pdf-header-footer")
            .arg(format!("--print-to-pdf={}", pdf_path.display()))
            .arg(format!("file://{}", html_path.canonicalize()?.display()))
            .stderr(Stdio::null())
            .stdout(Stdio::null())
            .status()?;

        if !status.success() {
            return Err("Chrome PDF conversion failed".into());
        }
        Ok(())
    }

    /// Print the report to `output_path`, or leave the HTML beside it when
    /// no browser is available
    ///
    /// # Errors
    /// Returns an error if writing the HTML or running the converter fails.
    pub fn export(
        &self,
        ctx: &ReportContext,
        output_path: &Path,
    ) -> Result<PdfOutcome, Box<dyn Error>> {
        let converter = self.converter.clone().or_else(Self::detect_chrome);
        let Some(chrome) = converter else {
            let html_path = output_path.with_extension("html");
            HtmlReporter::new().generate(ctx, &html_path)?;
            warn!("No PDF converter found; wrote {}", html_path.display());
            return Ok(PdfOutcome::HtmlFallback(html_path));
        };

        let html_path = std::env::temp_dir()
            .join(format!("campusrec_portfolio_{}.html", std::process::id()));
        HtmlReporter::new().generate(ctx, &html_path)?;
        let printed = Self::print_to_pdf(&chrome, &html_path, output_path);
        let _ = std::fs::remove_file(&html_path);
        printed?;
        Ok(PdfOutcome::Pdf(output_path.to_path_buf()))
    }

    /// Instructions shown when no converter was found
    #[must_use]
    pub fn conversion_advice(html_path: &Path) -> String {
        format!(
            "Chrome/Chromium not found. The printable HTML was written to {}.\n\
            \n\
            Open it in a browser and use Print > Save as PDF, or install Chrome/Chromium:\n\
            \n\
            • Ubuntu/Debian:  sudo apt install chromium-browser\n\
            • Fedora/RHEL:    sudo dnf install chromium\n\
            • macOS:          brew install --cask google-chrome\n\
            • Windows:        Download from https://www.google.com/chrome/\n\
            \n\
            Alternatively, point at a browser binary with --pdf-converter /path/to/chrome",
            html_path.display()
        )
    }
}

impl Default for PdfReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for PdfReporter {
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        match self.export(ctx, output_path)? {
            PdfOutcome::Pdf(_) => Ok(()),
            PdfOutcome::HtmlFallback(html_path) => Err(Self::conversion_advice(&html_path).into()),
        }
    }

    fn render(&self, _ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        Ok(String::from("PDF reports are printed from the HTML report."))
    }
}
