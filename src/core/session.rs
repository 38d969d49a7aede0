//! Application state
//!
//! One value holds the data source, the gateway and the signed-in profile.
//! It is populated by [`AppState::start`] and cleared by
//! [`AppState::sign_out`].

use crate::core::error::{WorkflowError, WorkflowResult};
use crate::core::models::Profile;
use crate::core::store::{DataSource, Gateway, StoreError, Table};
use crate::info;

/// Session-scoped state shared by every command
#[derive(Debug, Clone)]
pub struct AppState {
    source: DataSource,
    gateway: Gateway,
    profile: Option<Profile>,
}

impl AppState {
    /// State over an existing gateway, signed out
    #[must_use]
    pub const fn new(source: DataSource, gateway: Gateway) -> Self {
        Self { source, gateway, profile: None }
    }

    /// Connect to the configured backend, signed out
    ///
    /// # Errors
    /// [`StoreError::NotConfigured`] for a live source without endpoint.
    pub fn connect(source: DataSource, endpoint: &str, token: &str) -> Result<Self, StoreError> {
        Ok(Self::new(source, Gateway::connect(source, endpoint, token)?))
    }

    /// Sign in as `profile_id`
    ///
    /// # Errors
    /// `NoSession` for a blank id; store failures (including unknown ids).
    pub async fn start(&mut self, profile_id: &str) -> WorkflowResult<&Profile> {
        let profile_id = profile_id.trim();
        if profile_id.is_empty() {
            return Err(WorkflowError::NoSession);
        }
        let profile: Profile = self.gateway.fetch_one(Table::Profiles, profile_id).await?;
        info!("Signed in as {} ({})", profile.full_name, profile.role);
        Ok(self.profile.insert(profile))
    }

    /// Forget the signed-in profile
    pub fn sign_out(&mut self) {
        self.profile = None;
    }

    /// Replace the cached profile after an edit
    pub fn refresh_profile(&mut self, profile: Profile) {
        self.profile = Some(profile);
    }

    /// Signed-in profile
    ///
    /// # Errors
    /// `NoSession` when signed out.
    pub fn require_profile(&self) -> WorkflowResult<&Profile> {
        self.profile.as_ref().ok_or(WorkflowError::NoSession)
    }

    /// Signed-in profile, if any
    #[must_use]
    pub const fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Backend gateway
    #[must_use]
    pub const fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Which backend is in use
    #[must_use]
    pub const fn source(&self) -> DataSource {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lifecycle_populates_and_clears_profile() {
        let mut state = AppState::new(DataSource::Fixture, Gateway::fixture());
        assert!(matches!(state.require_profile(), Err(WorkflowError::NoSession)));

        let name = state.start("fac-2").await.expect("start").full_name.clone();
        assert_eq!(name, "Dr. Grace Hopper");
        assert!(state.require_profile().is_ok());

        state.sign_out();
        assert!(state.profile().is_none());
    }

    #[tokio::test]
    async fn blank_profile_id_is_no_session() {
        let mut state = AppState::new(DataSource::Fixture, Gateway::fixture());
        assert!(matches!(state.start("  ").await, Err(WorkflowError::NoSession)));
    }
}
