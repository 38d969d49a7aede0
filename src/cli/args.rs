//! CLI argument definitions for `CampusRecords`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use campus_records::config::ConfigOverrides;
use campus_records::core::analytics::DASHBOARD_LEADERBOARD;
use campus_records::core::models::{Category, CertificateStatus, ReportType};
use campus_records::logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to lowercase
/// strings for config storage and to `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

/// Certificate status filter
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum StatusArg {
    /// Awaiting review
    Pending,
    /// Verified
    Approved,
    /// Declined
    Rejected,
}

impl From<StatusArg> for CertificateStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => Self::Pending,
            StatusArg::Approved => Self::Approved,
            StatusArg::Rejected => Self::Rejected,
        }
    }
}

/// Grouping for the academic transcript
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum AcademicGrouping {
    /// Group by academic year (e.g. 2023-24)
    #[default]
    Year,
    /// Group by semester
    Semester,
}

/// Grouping for co-curricular activities
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ActivityGrouping {
    /// Group by activity type
    #[default]
    Type,
    /// Group by the year the activity started
    Year,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `endpoint`, `profile_id`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum ProfileSubcommand {
    /// Show the signed-in profile.
    Show,
    /// Change display name and/or email.
    Edit {
        /// New display name
        #[arg(long, value_name = "NAME")]
        name: Option<String>,
        /// New contact email
        #[arg(long, value_name = "EMAIL")]
        email: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum CertificatesSubcommand {
    /// List your certificates, newest first.
    List {
        /// Only show certificates with this status
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
    /// Upload a certificate file for review.
    Upload {
        /// Certificate file (PDF or image)
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Title shown to reviewers
        #[arg(long, value_name = "TITLE")]
        title: String,
        /// academic or co-curricular
        #[arg(long, value_name = "CATEGORY", default_value = "academic")]
        category: Category,
        /// Optional description
        #[arg(long, value_name = "TEXT")]
        description: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ReviewSubcommand {
    /// Show pending and processed certificates in your scope.
    Queue,
    /// List the students you review.
    Students,
    /// Approve a pending certificate.
    Approve {
        /// Certificate id
        #[arg(value_name = "ID")]
        id: String,
        /// Remark stored with the decision (required)
        #[arg(long, value_name = "TEXT")]
        remark: String,
    },
    /// Reject a pending certificate.
    Reject {
        /// Certificate id
        #[arg(value_name = "ID")]
        id: String,
        /// Reason stored with the decision (required)
        #[arg(long, value_name = "TEXT")]
        remark: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum NotificationsSubcommand {
    /// Show the latest notifications.
    List {
        /// Number of notifications to load
        #[arg(long, value_name = "N", default_value_t = 10)]
        limit: usize,
    },
    /// Mark one notification as read.
    Read {
        /// Notification id
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Mark every loaded notification as read.
    ReadAll,
}

#[derive(Debug, Subcommand)]
pub enum RecordsSubcommand {
    /// Academic transcript with CGPA and credit totals.
    Academic {
        /// How to group subjects
        #[arg(long, value_enum, default_value_t = AcademicGrouping::Year)]
        by: AcademicGrouping,
    },
    /// Approved co-curricular activities.
    Activities {
        /// How to group activities
        #[arg(long, value_enum, default_value_t = ActivityGrouping::Type)]
        by: ActivityGrouping,
    },
}

#[derive(Debug, Subcommand)]
pub enum ReportsSubcommand {
    /// List institutional report requests.
    List,
    /// Request a new institutional report.
    Generate {
        /// Report title
        #[arg(long, value_name = "TITLE")]
        title: String,
        /// naac, aicte, nirf, internal or custom
        #[arg(long = "type", value_name = "TYPE", default_value = "internal")]
        report_type: ReportType,
        /// Optional description
        #[arg(long, value_name = "TEXT")]
        description: Option<String>,
    },
    /// Delete a report request.
    Delete {
        /// Report id
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Show or edit the signed-in profile.
    Profile {
        #[command(subcommand)]
        subcommand: Option<ProfileSubcommand>,
    },
    /// Upload and list your certificates (students).
    Certificates {
        #[command(subcommand)]
        subcommand: Option<CertificatesSubcommand>,
    },
    /// Review certificates (faculty).
    Review {
        #[command(subcommand)]
        subcommand: ReviewSubcommand,
    },
    /// Show one student's certificate progress (faculty).
    Student {
        /// Student profile id
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Institution-wide analytics dashboard (senior faculty and admins).
    Analytics {
        /// Leaderboard size
        #[arg(long, value_name = "N", default_value_t = DASHBOARD_LEADERBOARD)]
        top: usize,
    },
    /// Read and acknowledge notifications.
    Notifications {
        #[command(subcommand)]
        subcommand: Option<NotificationsSubcommand>,
    },
    /// Academic and co-curricular records (students).
    Records {
        #[command(subcommand)]
        subcommand: RecordsSubcommand,
    },
    /// Suggestions based on your certificates (students).
    Recommendations,
    /// Export your portfolio.
    ///
    /// Combines profile, optional personal details and verified records into
    /// a Markdown, HTML or PDF document.
    Portfolio {
        /// TOML file with phone, bio, skills, links and other details
        #[arg(long, value_name = "FILE")]
        details: Option<PathBuf>,

        /// Output file path (optional; defaults to config `reports_dir`)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Report format: markdown (md), html, or pdf
        #[arg(short, long, value_name = "FORMAT", default_value = "html")]
        format: String,

        /// Browser binary used to print PDFs
        #[arg(long, value_name = "PATH")]
        pdf_converter: Option<String>,
    },
    /// Institutional report requests (senior faculty and admins).
    Reports {
        #[command(subcommand)]
        subcommand: Option<ReportsSubcommand>,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "campusrec",
    about = "CampusRecords command-line interface",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level (stored in config file)
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config database token
    #[arg(long = "db-token", value_name = "TOKEN")]
    pub db_token: Option<String>,

    /// Override config database endpoint
    #[arg(long = "db-endpoint", value_name = "URL")]
    pub db_endpoint: Option<String>,

    /// Override config reports directory
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Act as this profile id for this run
    #[arg(long = "as", value_name = "PROFILE_ID")]
    pub profile_id: Option<String>,

    /// Use the built-in demo data instead of the database
    #[arg(long)]
    pub fixture: bool,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// `--fixture` forces the demo data source; without it the configured
    /// source is kept.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string().to_lowercase()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            db_token: self.db_token.clone(),
            db_endpoint: self.db_endpoint.clone(),
            reports_dir: self
                .reports_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            profile_id: self.profile_id.clone(),
            data_source: self.fixture.then(|| "fixture".to_string()),
        }
    }
}
