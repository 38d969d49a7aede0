//! Data models for `CampusRecords`
//!
//! Field names and enum values match the record store schema.

pub mod academic_record;
pub mod achievement;
pub mod activity;
pub mod certificate;
pub mod institutional_report;
pub mod notification;
pub mod profile;

pub use academic_record::{AcademicRecord, GradeBand};
pub use achievement::AchievementSummary;
pub use activity::{Activity, ActivityStatus, ActivityType};
pub use certificate::{Category, Certificate, CertificateStatus, NewCertificate};
pub use institutional_report::{InstitutionalReport, ReportStatus, ReportType};
pub use notification::{Notification, NotificationCategory};
pub use profile::{FacultyLevel, Profile, Role, StudentRef};
