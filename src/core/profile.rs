//! Self-service profile edits

use crate::core::error::{ValidationError, WorkflowResult};
use crate::core::models::Profile;
use crate::core::store::{Gateway, StoreError, Table};
use serde::Serialize;

/// The only fields a user may change on their own profile
///
/// The institutional student number is not part of the edit and is never
/// written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileEdit {
    /// New display name
    pub full_name: String,
    /// New contact email
    pub email: String,
}

impl ProfileEdit {
    /// Start from the current values
    #[must_use]
    pub fn from_profile(profile: &Profile) -> Self {
        Self { full_name: profile.full_name.clone(), email: profile.email.clone() }
    }

    /// Trim and check the fields
    ///
    /// # Errors
    /// `EmptyName` or `InvalidEmail`.
    pub fn validated(self) -> Result<Self, ValidationError> {
        let full_name = self.full_name.trim().to_string();
        let email = self.email.trim().to_string();
        if full_name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let valid_email = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
        if !valid_email {
            return Err(ValidationError::InvalidEmail(email));
        }
        Ok(Self { full_name, email })
    }
}

/// Validate and save an edit, returning the refreshed profile
///
/// # Errors
/// Validation before any store call; store failures.
pub async fn update_profile(
    gateway: &Gateway,
    profile: &Profile,
    edit: ProfileEdit,
) -> WorkflowResult<Profile> {
    let edit = edit.validated()?;
    let fields = serde_json::to_value(&edit).map_err(StoreError::from)?;
    gateway.update(Table::Profiles, &profile.id, fields).await?;
    Ok(gateway.fetch_one(Table::Profiles, &profile.id).await?)
}
