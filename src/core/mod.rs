//! Core domain for `CampusRecords`
//!
//! Models and the record store seam sit at the bottom; workflow, analytics,
//! notifications and portfolio composition are built on the [`store::Gateway`].

pub mod analytics;
pub mod error;
pub mod institutional;
pub mod models;
pub mod notifications;
pub mod portfolio;
pub mod profile;
pub mod report;
pub mod session;
pub mod store;
pub mod upload;
pub mod workflow;

/// Returns the current version of the `CampusRecords` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
