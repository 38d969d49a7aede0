//! CLI command handlers for `CampusRecords`.
//!
//! Each command is implemented in its own submodule. Everything except
//! `config` runs against an [`AppState`] opened by [`open_session`].

pub mod analytics;
pub mod certificates;
pub mod config;
pub mod notifications;
pub mod portfolio;
pub mod profile;
pub mod reports;
pub mod review;

use campus_records::config::Config;
use campus_records::core::session::AppState;
use campus_records::core::store::fixtures::DEMO_STUDENT_ID;
use campus_records::core::store::DataSource;
use campus_records::{info, verbose};
use std::error::Error;

/// Outcome of a command handler; the error is printed by `main`
pub type CommandResult = Result<(), Box<dyn Error>>;

/// Connect to the configured data source and sign in
///
/// The demo data set signs in as its demo student when no profile is
/// configured.
///
/// # Errors
/// Unknown data source, missing endpoint, or a profile that cannot be loaded.
pub async fn open_session(config: &Config) -> Result<AppState, Box<dyn Error>> {
    let source: DataSource = if config.session.data_source.trim().is_empty() {
        DataSource::default()
    } else {
        config.session.data_source.parse()?
    };
    let mut state = AppState::connect(source, &config.database.endpoint, &config.database.token)?;

    let mut profile_id = config.session.profile_id.trim();
    if profile_id.is_empty() && source == DataSource::Fixture {
        info!("No profile configured; using demo student {DEMO_STUDENT_ID}");
        profile_id = DEMO_STUDENT_ID;
    }
    let profile = state.start(profile_id).await?;
    verbose!("Signed in as {} ({}) via {source} data", profile.full_name, profile.role);
    Ok(state)
}

/// Fixed-width date for listings
pub(crate) fn short_date(timestamp: chrono::DateTime<chrono::Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}
