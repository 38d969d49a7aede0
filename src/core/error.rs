//! Domain error types

use crate::core::store::StoreError;
use thiserror::Error;

/// Input rejected before any store call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Approve/reject without a remark
    #[error("a remark is required to approve or reject")]
    MissingRemark,
    /// Blank title on an upload or report request
    #[error("a title is required")]
    MissingTitle,
    /// Upload without a file name or with an empty file
    #[error("a non-empty file is required")]
    MissingFile,
    /// Email without an `@`
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    /// Blank display name
    #[error("name cannot be empty")]
    EmptyName,
    /// Link that cannot be turned into a URL
    #[error("'{0}' is not a valid link")]
    InvalidLink(String),
}

/// Failures of workflow, feed and composition operations
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Bad user input; nothing was written
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Backend failure; local state left as it was
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Certificate is no longer pending
    #[error("certificate '{id}' was already {status}")]
    AlreadyDecided {
        /// Certificate id
        id: String,
        /// Current status
        status: String,
    },
    /// Junior reviewer deciding on a student assigned to someone else
    #[error("certificate '{0}' belongs to a student not assigned to you")]
    NotAssigned(String),
    /// Another decision on the same record is still running
    #[error("a decision on '{0}' is already in progress")]
    InFlight(String),
    /// Role or seniority does not allow the operation
    #[error("access denied: {0}")]
    AccessDenied(String),
    /// No signed-in profile
    #[error("no active session (set one with `campusrec config set profile_id <ID>` or pass --as)")]
    NoSession,
}

/// Result alias for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;
